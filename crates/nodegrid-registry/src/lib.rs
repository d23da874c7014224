//! nodegrid-registry — the canonical node pool.
//!
//! Receives the winning [`DiscoveryResult`](nodegrid_discovery::DiscoveryResult)
//! of an allocation pass and owns its nodes from then on. Later stages
//! (mapping, launch) read the pool; nothing in this crate re-discovers.

pub mod error;
pub mod pool;

pub use error::{RegistryError, RegistryResult};
pub use pool::{NodePool, NodeRegistry, PoolSnapshot};
