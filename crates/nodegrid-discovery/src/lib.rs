//! nodegrid-discovery — sources of candidate nodes for the initial pool.
//!
//! Every source implements [`DiscoverySource`] and yields a [`Discovery`]:
//! an owned [`DiscoveryResult`] plus an optional oversubscription hint.
//!
//! # Sources, in the order the allocator consults them
//!
//! ```text
//! ManagedSource          scheduler-provided allocation (or None)
//! DefaultHostfileSource  launcher-wide hostfile
//! PerAppHostfileSource   union of every app's hostfile
//! DashHostSource         union of every app's inline host list
//! LocalFallbackSource    the launcher's own host, one slot
//! ```

pub mod dash_host;
pub mod error;
pub mod hostfile;
pub mod local;
pub mod managed;
pub mod result;
pub mod source;

pub use error::{DiscoverResult, DiscoveryError};
pub use local::LocalFallbackSource;
pub use managed::{ManagedModule, ManagedSource, NodefileModule};
pub use result::{Discovery, DiscoveryResult};
pub use source::{DashHostSource, DefaultHostfileSource, DiscoverySource, PerAppHostfileSource};
