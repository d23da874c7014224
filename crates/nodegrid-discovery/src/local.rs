//! Local-host fallback.
//!
//! When no other source produced anything, the pool is the launcher's own
//! host with a single slot, and slot limits are declared unknown.

use nodegrid_core::{Job, Node, NodeState};
use tracing::warn;

use crate::error::{DiscoverResult, DiscoveryError};
use crate::result::{Discovery, DiscoveryResult};
use crate::source::DiscoverySource;

/// Synthesizes the single degenerate node.
#[derive(Debug, Clone)]
pub struct LocalFallbackSource {
    nodename: Option<String>,
}

impl LocalFallbackSource {
    /// Use an explicit node name. It must be the same name the launcher
    /// uses everywhere else for itself (session paths, logging).
    pub fn new(nodename: impl Into<String>) -> Self {
        Self {
            nodename: Some(nodename.into()),
        }
    }

    /// Resolve the node name from the operating system.
    pub fn from_system() -> Self {
        let nodename = match hostname::get() {
            Ok(name) => name.into_string().ok(),
            Err(e) => {
                warn!(error = %e, "failed to resolve local hostname");
                None
            }
        };
        Self { nodename }
    }

    pub fn nodename(&self) -> Option<&str> {
        self.nodename.as_deref()
    }

    /// Build the fallback node.
    pub fn local_node(&self) -> DiscoverResult<Node> {
        let name = self
            .nodename
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DiscoveryError::LocalNode("hostname could not be resolved".into()))?;

        Ok(Node {
            name: name.to_string(),
            state: NodeState::Up,
            slots: 1,
            slots_max: 0,
            slots_inuse: 0,
        })
    }
}

impl DiscoverySource for LocalFallbackSource {
    fn name(&self) -> &'static str {
        "local"
    }

    fn discover(&self, _job: &Job) -> DiscoverResult<Discovery> {
        let node = self.local_node()?;
        let mut nodes = DiscoveryResult::new();
        nodes.push(node);
        Ok(Discovery::new(nodes, Some(true)))
    }
}
