//! Hostfile parser.
//!
//! One node per line, `#` starts a comment:
//!
//! ```text
//! # rack 1
//! node01 slots=4 max_slots=8
//! node02 slots=4
//! node03            # one slot
//! node03            # ...now two
//! ```
//!
//! `cpu=` and `count=` are accepted as aliases for `slots=`. Listing a host
//! more than once adds its slots together.

use std::collections::HashMap;
use std::path::Path;

use nodegrid_core::Node;
use tracing::debug;

use crate::error::{DiscoverResult, DiscoveryError};
use crate::result::{Discovery, DiscoveryResult};

/// Per-source accumulator: repeated hosts add slots.
///
/// The oversubscription hint is `true` unless every entry carried an
/// explicit slot count.
#[derive(Debug, Default)]
pub(crate) struct HostTally {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    all_explicit: bool,
}

impl HostTally {
    pub(crate) fn new() -> Self {
        Self {
            all_explicit: true,
            ..Self::default()
        }
    }

    /// Fails when the accumulated slot count would exceed a bounded
    /// ceiling; the message is meant to be attached to the offending entry.
    pub(crate) fn add(
        &mut self,
        host: &str,
        slots: Option<u32>,
        slots_max: Option<u32>,
    ) -> Result<(), String> {
        if slots.is_none() {
            self.all_explicit = false;
        }
        let slots = slots.unwrap_or(1);
        let i = match self.index.get(host) {
            Some(&i) => {
                let node = &mut self.nodes[i];
                node.slots = node.slots.saturating_add(slots);
                if let Some(max) = slots_max {
                    node.slots_max = node.slots_max.max(max);
                }
                i
            }
            None => {
                self.index.insert(host.to_string(), self.nodes.len());
                self.nodes
                    .push(Node::new(host, slots).with_slots_max(slots_max.unwrap_or(0)));
                self.nodes.len() - 1
            }
        };

        let node = &self.nodes[i];
        if node.is_bounded() && node.slots_max < node.slots {
            return Err(format!(
                "max_slots ({}) is less than slots ({}) for {host}",
                node.slots_max, node.slots
            ));
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> Discovery {
        let hint = self.nodes.is_empty() || !self.all_explicit;
        Discovery::new(self.nodes.into_iter().collect::<DiscoveryResult>(), Some(hint))
    }
}

/// Read and parse a hostfile from disk.
pub fn parse_hostfile(path: &Path) -> DiscoverResult<Discovery> {
    let content = std::fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let discovery = parse_hostfile_str(&content, path)?;
    debug!(
        path = %path.display(),
        nodes = discovery.nodes.len(),
        oversubscribe = ?discovery.oversubscribe_hint,
        "parsed hostfile"
    );
    Ok(discovery)
}

/// Parse hostfile text. `origin` is only used in error messages.
pub fn parse_hostfile_str(content: &str, origin: &Path) -> DiscoverResult<Discovery> {
    let mut tally = HostTally::new();

    for (i, raw) in content.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let err = |reason: String| DiscoveryError::Hostfile {
            path: origin.to_path_buf(),
            line: i + 1,
            reason,
        };

        let mut tokens = line.split_whitespace();
        let Some(host) = tokens.next() else { continue };
        if host.contains('=') {
            return Err(err(format!("expected a host name, found {host:?}")));
        }

        let mut slots = None;
        let mut slots_max = None;
        for token in tokens {
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| err(format!("expected key=value, found {token:?}")))?;
            let value: u32 = value
                .parse()
                .map_err(|_| err(format!("invalid count for {key}: {value:?}")))?;
            match key {
                "slots" | "cpu" | "count" => {
                    if value == 0 {
                        return Err(err(format!("{key} must be at least 1")));
                    }
                    slots = Some(value);
                }
                "max_slots" | "max-slots" => slots_max = Some(value),
                other => return Err(err(format!("unknown key {other:?}"))),
            }
        }

        tally.add(host, slots, slots_max).map_err(err)?;
    }

    Ok(tally.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> DiscoverResult<Discovery> {
        parse_hostfile_str(content, Path::new("hosts"))
    }

    #[test]
    fn parses_slots_and_max_slots() {
        let d = parse("node01 slots=4 max_slots=8\nnode02 slots=2\n").unwrap();
        let nodes = d.nodes.into_nodes();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].name, "node01");
        assert_eq!(nodes[0].slots, 4);
        assert_eq!(nodes[0].slots_max, 8);
        assert_eq!(nodes[1].slots, 2);
        assert_eq!(nodes[1].slots_max, 0);
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let d = parse("# header\n\n   \nnode01 # trailing\n").unwrap();
        assert_eq!(d.nodes.names(), vec!["node01"]);
    }

    #[test]
    fn repeated_host_adds_slots() {
        let d = parse("a\na\na slots=2\n").unwrap();
        let nodes = d.nodes.into_nodes();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].slots, 4);
    }

    #[test]
    fn cpu_and_count_alias_slots() {
        let d = parse("a cpu=3\nb count=5\n").unwrap();
        let nodes = d.nodes.into_nodes();
        assert_eq!(nodes[0].slots, 3);
        assert_eq!(nodes[1].slots, 5);
    }

    #[test]
    fn hint_false_when_every_slot_count_is_explicit() {
        let d = parse("a slots=2\nb slots=2\n").unwrap();
        assert_eq!(d.oversubscribe_hint, Some(false));
    }

    #[test]
    fn hint_true_when_any_slot_count_is_implied() {
        let d = parse("a slots=2\nb\n").unwrap();
        assert_eq!(d.oversubscribe_hint, Some(true));
    }

    #[test]
    fn empty_file_yields_no_nodes() {
        let d = parse("# nothing here\n").unwrap();
        assert!(d.is_empty());
        assert_eq!(d.oversubscribe_hint, Some(true));
    }

    #[test]
    fn rejects_unknown_key() {
        let e = parse("a slots=1\nb color=red\n").unwrap_err();
        match e {
            DiscoveryError::Hostfile { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("color"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_bad_counts() {
        assert!(parse("a slots=zero\n").is_err());
        assert!(parse("a slots=0\n").is_err());
        assert!(parse("a slots=4 max_slots=2\n").is_err());
        assert!(parse("slots=4\n").is_err());
        assert!(parse("a slots\n").is_err());
    }

    #[test]
    fn repeated_host_cannot_outgrow_its_ceiling() {
        let e = parse("a slots=4 max_slots=4\na slots=4\n").unwrap_err();
        match e {
            DiscoveryError::Hostfile { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("max_slots (4)"));
                assert!(reason.contains("slots (8)"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let d = parse("a slots=2 max_slots=4\na slots=2\n").unwrap();
        let nodes = d.nodes.into_nodes();
        assert_eq!((nodes[0].slots, nodes[0].slots_max), (4, 4));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let e = parse_hostfile(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(e, DiscoveryError::Io { .. }));
    }

    #[test]
    fn parses_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts");
        std::fs::write(&path, "n1 slots=4\nn2 slots=4\n").unwrap();
        let d = parse_hostfile(&path).unwrap();
        assert_eq!(d.nodes.names(), vec!["n1", "n2"]);
        assert_eq!(d.oversubscribe_hint, Some(false));
    }
}
