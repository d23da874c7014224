//! Managed allocations — nodes handed to us by a batch scheduler.
//!
//! A configured module is only selected when its environment is actually
//! present. Once selected, its failure aborts the allocation; no hostfile
//! or dash-host source is consulted after it.

use std::collections::HashMap;
use std::path::PathBuf;

use nodegrid_core::config::ManagedConfig;
use nodegrid_core::{Job, Node};
use tracing::{debug, info};

use crate::error::{DiscoverResult, DiscoveryError};
use crate::result::{Discovery, DiscoveryResult};
use crate::source::DiscoverySource;

/// An environment-specific scheduler integration.
///
/// An empty list is a valid answer meaning "no managed allocation".
pub trait ManagedModule: Send + Sync {
    fn name(&self) -> &str;

    fn allocate(&self) -> DiscoverResult<Vec<Node>>;
}

/// The managed source in effect for this launcher.
pub enum ManagedSource {
    None,
    Module(Box<dyn ManagedModule>),
}

impl ManagedSource {
    pub fn module(module: impl ManagedModule + 'static) -> Self {
        ManagedSource::Module(Box::new(module))
    }

    /// Pick the managed source from configuration. `env` looks up
    /// environment variables.
    pub fn select<F>(config: Option<&ManagedConfig>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(config) = config else {
            return ManagedSource::None;
        };

        match config {
            ManagedConfig::Nodefile { .. } => {
                let var = config.nodefile_env();
                match env(var) {
                    Some(path) if !path.is_empty() => {
                        info!(%var, %path, "managed nodefile module selected");
                        ManagedSource::module(NodefileModule::new(path))
                    }
                    _ => {
                        debug!(%var, "nodefile variable not set, no managed module");
                        ManagedSource::None
                    }
                }
            }
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ManagedSource::None)
    }

    pub fn module_name(&self) -> Option<&str> {
        match self {
            ManagedSource::None => None,
            ManagedSource::Module(m) => Some(m.name()),
        }
    }
}

impl std::fmt::Debug for ManagedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManagedSource::None => f.write_str("ManagedSource::None"),
            ManagedSource::Module(m) => write!(f, "ManagedSource::Module({})", m.name()),
        }
    }
}

impl DiscoverySource for ManagedSource {
    fn name(&self) -> &'static str {
        "managed"
    }

    /// Never carries an oversubscription hint.
    fn discover(&self, _job: &Job) -> DiscoverResult<Discovery> {
        match self {
            ManagedSource::None => Ok(Discovery::empty()),
            ManagedSource::Module(module) => {
                let nodes = module.allocate()?;
                debug!(module = module.name(), nodes = nodes.len(), "managed allocation read");
                Ok(Discovery::new(nodes.into_iter().collect::<DiscoveryResult>(), None))
            }
        }
    }
}

// ── Nodefile module ────────────────────────────────────────────────

/// Reads a scheduler nodefile: one hostname per line, one line per slot.
#[derive(Debug, Clone)]
pub struct NodefileModule {
    path: PathBuf,
}

impl NodefileModule {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ManagedModule for NodefileModule {
    fn name(&self) -> &str {
        "nodefile"
    }

    fn allocate(&self) -> DiscoverResult<Vec<Node>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| DiscoveryError::Module {
            module: self.name().to_string(),
            reason: format!("{}: {e}", self.path.display()),
        })?;

        let mut nodes: Vec<Node> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for line in content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let Some(host) = line.split_whitespace().next() else {
                continue;
            };
            match index.get(host) {
                Some(&i) => nodes[i].slots = nodes[i].slots.saturating_add(1),
                None => {
                    index.insert(host.to_string(), nodes.len());
                    nodes.push(Node::new(host, 1));
                }
            }
        }
        Ok(nodes)
    }
}
