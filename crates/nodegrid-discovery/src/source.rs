//! The discovery capability and the hostfile/dash-host adapters.

use std::path::{Path, PathBuf};

use nodegrid_core::Job;
use tracing::debug;

use crate::dash_host::parse_app_dash_host;
use crate::error::DiscoverResult;
use crate::hostfile::parse_hostfile;
use crate::result::Discovery;

/// A provider of candidate nodes for the initial pool.
pub trait DiscoverySource {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn discover(&self, job: &Job) -> DiscoverResult<Discovery>;
}

/// The launcher-wide hostfile.
#[derive(Debug, Clone)]
pub struct DefaultHostfileSource {
    path: PathBuf,
}

impl DefaultHostfileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DiscoverySource for DefaultHostfileSource {
    fn name(&self) -> &'static str {
        "default-hostfile"
    }

    fn discover(&self, _job: &Job) -> DiscoverResult<Discovery> {
        debug!(path = %self.path.display(), "parsing default hostfile");
        parse_hostfile(&self.path)
    }
}

/// Union of the hostfiles named by each application.
///
/// When several applications carry hostfiles, the hint of the last one
/// parsed wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerAppHostfileSource;

impl DiscoverySource for PerAppHostfileSource {
    fn name(&self) -> &'static str {
        "app-hostfile"
    }

    fn discover(&self, job: &Job) -> DiscoverResult<Discovery> {
        let mut found = Discovery::empty();
        for app in &job.apps {
            let Some(path) = &app.hostfile else { continue };
            debug!(app = %app.name, path = %path.display(), "checking app hostfile");
            found.merge(parse_hostfile(path)?);
        }
        Ok(found)
    }
}

/// Union of every application's dash-host list, same hint rule as
/// [`PerAppHostfileSource`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DashHostSource;

impl DiscoverySource for DashHostSource {
    fn name(&self) -> &'static str {
        "dash-host"
    }

    fn discover(&self, job: &Job) -> DiscoverResult<Discovery> {
        let mut found = Discovery::empty();
        for app in job.apps.iter().filter(|a| a.has_dash_host()) {
            found.merge(parse_app_dash_host(app)?);
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use nodegrid_core::AppContext;

    use super::*;
    use crate::error::DiscoveryError;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn per_app_hostfiles_union() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a", "n1\nn2\n");
        let b = write(dir.path(), "b", "n2\nn3\n");
        let job = Job::new(
            "j",
            vec![
                AppContext::new("a").with_hostfile(a),
                AppContext::new("idle"),
                AppContext::new("b").with_hostfile(b),
            ],
        );

        let d = PerAppHostfileSource.discover(&job).unwrap();
        assert_eq!(d.nodes.names(), vec!["n1", "n2", "n3"]);
    }

    #[test]
    fn per_app_last_hint_wins() {
        let dir = tempfile::tempdir().unwrap();
        let implied = write(dir.path(), "implied", "n1\n");
        let explicit = write(dir.path(), "explicit", "n2 slots=2\n");

        let job = Job::new(
            "j",
            vec![
                AppContext::new("a").with_hostfile(&implied),
                AppContext::new("b").with_hostfile(&explicit),
            ],
        );
        let d = PerAppHostfileSource.discover(&job).unwrap();
        assert_eq!(d.oversubscribe_hint, Some(false));

        let job = Job::new(
            "j",
            vec![
                AppContext::new("b").with_hostfile(&explicit),
                AppContext::new("a").with_hostfile(&implied),
            ],
        );
        let d = PerAppHostfileSource.discover(&job).unwrap();
        assert_eq!(d.oversubscribe_hint, Some(true));
    }

    #[test]
    fn per_app_failure_aborts_whole_pass() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good", "n1\n");
        let job = Job::new(
            "j",
            vec![
                AppContext::new("a").with_hostfile(good),
                AppContext::new("b").with_hostfile(dir.path().join("missing")),
            ],
        );
        let e = PerAppHostfileSource.discover(&job).unwrap_err();
        assert!(matches!(e, DiscoveryError::Io { .. }));
    }

    #[test]
    fn no_hostfiles_is_empty_without_hint() {
        let job = Job::new("j", vec![AppContext::new("a")]);
        let d = PerAppHostfileSource.discover(&job).unwrap();
        assert!(d.is_empty());
        assert_eq!(d.oversubscribe_hint, None);
    }

    #[test]
    fn dash_host_union_across_apps() {
        let job = Job::new(
            "j",
            vec![
                AppContext::new("a").with_dash_host("x,y"),
                AppContext::new("b"),
                AppContext::new("c").with_dash_host("y:2,z:2"),
            ],
        );
        let d = DashHostSource.discover(&job).unwrap();
        assert_eq!(d.nodes.names(), vec!["x", "y", "z"]);
        assert_eq!(d.oversubscribe_hint, Some(false));
    }

    #[test]
    fn default_hostfile_reads_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "hosts", "h1 slots=8\n");
        let source = DefaultHostfileSource::new(&path);
        assert_eq!(source.path(), path.as_path());

        let d = source.discover(&Job::new("j", vec![])).unwrap();
        assert_eq!(d.nodes.names(), vec!["h1"]);
        assert_eq!(d.oversubscribe_hint, Some(false));
    }
}
