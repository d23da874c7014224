//! nodegrid-core — shared descriptors and configuration.
//!
//! Passive data consumed by the allocation chain: [`Node`] records produced
//! by discovery sources, the [`Job`] / [`AppContext`] launch descriptors, and
//! the TOML-backed [`LauncherConfig`].

pub mod config;
pub mod job;
pub mod types;

pub use config::{LatchPolicy, LauncherConfig};
pub use job::JobSpec;
pub use types::*;
