//! nodegrid-allocator — builds the global node pool, once per launcher.
//!
//! The [`Allocator`] walks the discovery sources in priority order and
//! commits the first non-empty result to the node registry:
//!
//! ```text
//! Allocator::allocate(job)
//!   ├── latch set?            → Ok, nothing to do
//!   ├── ManagedSource         error aborts, empty falls through
//!   ├── DefaultHostfileSource
//!   ├── PerAppHostfileSource  union across apps
//!   ├── DashHostSource        union across apps
//!   └── LocalFallbackSource   this host, 1 slot, override = true
//!         └── NodeRegistry::insert(winning result)
//! ```
//!
//! Only the hostfile, dash-host and local sources write the job's
//! `oversubscribe_override` flag; a managed allocation leaves it alone.

pub mod allocator;
pub mod error;
pub mod state;

pub use allocator::Allocator;
pub use error::{AllocError, AllocResult};
pub use state::AllocationState;
