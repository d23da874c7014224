//! Allocation error types.

use nodegrid_discovery::DiscoveryError;
use nodegrid_registry::RegistryError;
use thiserror::Error;

/// Errors returned by [`Allocator::allocate`](crate::Allocator::allocate).
#[derive(Debug, Error)]
pub enum AllocError {
    /// A managed module, hostfile or dash-host source failed. No other
    /// source was tried and the registry was not touched.
    #[error("discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// The local fallback node could not be built.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// The registry refused the winning node set.
    #[error("node registry insert failed: {0}")]
    Registry(#[from] RegistryError),
}

pub type AllocResult<T> = Result<T, AllocError>;
