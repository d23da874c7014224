//! Discovery error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for discovery operations.
pub type DiscoverResult<T> = Result<T, DiscoveryError>;

/// Errors raised while producing candidate nodes.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {reason}")]
    Hostfile {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("invalid dash-host item {item:?}: {reason}")]
    DashHost { item: String, reason: String },

    #[error("managed module {module} failed: {reason}")]
    Module { module: String, reason: String },

    #[error("local node unavailable: {0}")]
    LocalNode(String),
}
