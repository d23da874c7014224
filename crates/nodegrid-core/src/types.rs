//! Node, application context, and job descriptors.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of a node; unique within a pool.
pub type NodeName = String;

/// Unique identifier for a job.
pub type JobId = String;

// ── Node ───────────────────────────────────────────────────────────

/// Availability of a node as seen by the launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    Up,
    Down,
    Unknown,
}

impl NodeState {
    pub fn label(&self) -> &'static str {
        match self {
            NodeState::Up => "UP",
            NodeState::Down => "DOWN",
            NodeState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A compute node that processes may be placed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: NodeName,
    pub state: NodeState,
    /// Usable slot count.
    pub slots: u32,
    /// Capacity ceiling; 0 means unbounded.
    pub slots_max: u32,
    /// Slots currently claimed by mapped processes.
    pub slots_inuse: u32,
}

impl Node {
    /// A node that is up, with `slots` usable slots and no ceiling.
    pub fn new(name: impl Into<NodeName>, slots: u32) -> Self {
        Self {
            name: name.into(),
            state: NodeState::Up,
            slots,
            slots_max: 0,
            slots_inuse: 0,
        }
    }

    /// Set the slot ceiling.
    pub fn with_slots_max(mut self, slots_max: u32) -> Self {
        self.slots_max = slots_max;
        self
    }

    /// Whether the node has a slot ceiling.
    pub fn is_bounded(&self) -> bool {
        self.slots_max > 0
    }

    /// Fold a duplicate entry for the same node into this one, keeping the
    /// larger slot counts. A bounded ceiling is raised to cover `slots`.
    pub fn absorb(&mut self, other: &Node) {
        self.slots = self.slots.max(other.slots);
        self.slots_max = self.slots_max.max(other.slots_max);
        if self.is_bounded() && self.slots_max < self.slots {
            self.slots_max = self.slots;
        }
    }
}

// ── Job ────────────────────────────────────────────────────────────

/// Per-application launch parameters relevant to allocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppContext {
    pub name: String,
    /// Hostfile given for this application only.
    #[serde(default)]
    pub hostfile: Option<PathBuf>,
    /// Inline host lists; each entry may itself be comma-separated.
    #[serde(default)]
    pub dash_host: Vec<String>,
}

impl AppContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_hostfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.hostfile = Some(path.into());
        self
    }

    pub fn with_dash_host(mut self, spec: impl Into<String>) -> Self {
        self.dash_host.push(spec.into());
        self
    }

    /// Whether a dash-host specification was supplied.
    pub fn has_dash_host(&self) -> bool {
        !self.dash_host.is_empty()
    }
}

/// A job: an ordered set of applications launched together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub apps: Vec<AppContext>,
    /// Slot limits are unknown or must not be enforced for this job.
    pub oversubscribe_override: bool,
}

impl Job {
    pub fn new(id: impl Into<JobId>, apps: Vec<AppContext>) -> Self {
        Self {
            id: id.into(),
            apps,
            oversubscribe_override: false,
        }
    }
}
