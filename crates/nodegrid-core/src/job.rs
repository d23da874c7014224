//! Job file loading.
//!
//! A job file is TOML:
//!
//! ```toml
//! id = "cfd-run"
//! oversubscribe_override = false
//!
//! [[apps]]
//! name = "solver"
//! hostfile = "hosts.solver"
//!
//! [[apps]]
//! name = "monitor"
//! dash_host = ["head-0:1"]
//! ```
//!
//! Relative hostfile paths resolve against the directory holding the job file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{AppContext, Job};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    pub id: String,
    #[serde(default)]
    pub oversubscribe_override: bool,
    #[serde(default)]
    pub apps: Vec<AppContext>,
}

impl JobSpec {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut spec: JobSpec = toml::from_str(&content)?;
        if let Some(base) = path.parent() {
            spec.resolve_paths(base);
        }
        Ok(spec)
    }

    /// Make relative per-app hostfile paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for app in &mut self.apps {
            if let Some(hostfile) = &app.hostfile {
                if hostfile.is_relative() {
                    app.hostfile = Some(base.join(hostfile));
                }
            }
        }
    }

    pub fn into_job(self) -> Job {
        Job {
            id: self.id,
            apps: self.apps,
            oversubscribe_override: self.oversubscribe_override,
        }
    }
}
