//! Registry error types.

use thiserror::Error;

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur while committing nodes to the pool.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid node: {0}")]
    InvalidNode(String),

    #[error("node pool capacity exceeded: {requested} nodes, limit {limit}")]
    CapacityExceeded { requested: usize, limit: usize },
}
