//! NodePool — in-memory canonical node pool.

use std::collections::{HashMap, HashSet};

use nodegrid_core::{Job, JobId, Node};
use nodegrid_discovery::DiscoveryResult;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{RegistryError, RegistryResult};

/// The pool interface the allocator commits into.
pub trait NodeRegistry {
    /// Merge `nodes` into the pool, deduplicating by name. Takes ownership
    /// of the nodes whether or not the insert succeeds.
    fn insert(&mut self, nodes: DiscoveryResult, job: &Job) -> RegistryResult<()>;

    /// All nodes in the pool, in insertion order.
    fn nodes(&self) -> &[Node];

    fn is_empty(&self) -> bool {
        self.nodes().is_empty()
    }
}

/// Deduplicating node pool held in memory.
///
/// An insert is validated as a whole before anything is stored, so a
/// failed insert leaves the pool as it was.
#[derive(Debug, Default)]
pub struct NodePool {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    max_nodes: Option<usize>,
    /// Job whose allocation populated the pool.
    allocated_for: Option<JobId>,
}

/// Serializable view of the pool.
#[derive(Debug, Clone, Serialize)]
pub struct PoolSnapshot {
    pub job: Option<JobId>,
    pub total_slots: u64,
    pub nodes: Vec<Node>,
}

impl NodePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of distinct nodes the pool accepts.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn total_slots(&self) -> u64 {
        self.nodes.iter().map(|n| u64::from(n.slots)).sum()
    }

    pub fn allocated_for(&self) -> Option<&str> {
        self.allocated_for.as_deref()
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            job: self.allocated_for.clone(),
            total_slots: self.total_slots(),
            nodes: self.nodes.clone(),
        }
    }

    /// Check every incoming node before anything is stored.
    fn validate(&self, incoming: &[Node]) -> RegistryResult<()> {
        let mut fresh: HashSet<&str> = HashSet::new();
        for node in incoming {
            if node.name.trim().is_empty() {
                return Err(RegistryError::InvalidNode("empty node name".into()));
            }
            if !self.index.contains_key(&node.name) {
                fresh.insert(&node.name);
            }
        }

        if let Some(limit) = self.max_nodes {
            let requested = self.nodes.len() + fresh.len();
            if requested > limit {
                return Err(RegistryError::CapacityExceeded { requested, limit });
            }
        }
        Ok(())
    }

    fn merge(&mut self, node: Node) {
        match self.index.get(&node.name) {
            Some(&i) => {
                let existing = &mut self.nodes[i];
                existing.absorb(&node);
                debug!(node = %existing.name, "node already in pool, merged");
            }
            None => {
                self.index.insert(node.name.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }
}

impl NodeRegistry for NodePool {
    fn insert(&mut self, nodes: DiscoveryResult, job: &Job) -> RegistryResult<()> {
        let incoming = nodes.into_nodes();
        self.validate(&incoming)?;

        let count = incoming.len();
        for node in incoming {
            self.merge(node);
        }
        self.allocated_for = Some(job.id.clone());

        info!(job = %job.id, inserted = count, pool = self.nodes.len(), "nodes added to pool");
        Ok(())
    }

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(nodes: &[(&str, u32)]) -> DiscoveryResult {
        nodes.iter().map(|(n, s)| Node::new(*n, *s)).collect()
    }

    fn job() -> Job {
        Job::new("job-1", vec![])
    }

    #[test]
    fn insert_stores_nodes_in_order() {
        let mut pool = NodePool::new();
        pool.insert(result(&[("b", 2), ("a", 1)]), &job()).unwrap();

        let names: Vec<&str> = pool.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(pool.total_slots(), 3);
        assert_eq!(pool.allocated_for(), Some("job-1"));
    }

    #[test]
    fn insert_dedups_against_existing() {
        let mut pool = NodePool::new();
        pool.insert(result(&[("a", 1), ("b", 1)]), &job()).unwrap();
        pool.insert(result(&[("b", 4), ("c", 1)]), &job()).unwrap();

        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get("b").unwrap().slots, 4);
    }

    #[test]
    fn merged_node_ceiling_covers_slots() {
        let mut pool = NodePool::new();
        let bounded: DiscoveryResult = vec![Node::new("a", 2).with_slots_max(3)]
            .into_iter()
            .collect();
        pool.insert(bounded, &job()).unwrap();
        pool.insert(result(&[("a", 5)]), &job()).unwrap();

        let a = pool.get("a").unwrap();
        assert_eq!(a.slots, 5);
        assert_eq!(a.slots_max, 5);
    }

    #[test]
    fn empty_name_is_rejected_atomically() {
        let mut pool = NodePool::new();
        let err = pool.insert(result(&[("a", 1), ("", 1)]), &job()).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidNode(_)));
        assert!(pool.is_empty());
        assert!(pool.allocated_for().is_none());
    }

    #[test]
    fn capacity_limit() {
        let mut pool = NodePool::new().with_max_nodes(2);
        let err = pool
            .insert(result(&[("a", 1), ("b", 1), ("c", 1)]), &job())
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::CapacityExceeded { requested: 3, limit: 2 }
        ));
        assert!(pool.is_empty());

        pool.insert(result(&[("a", 1), ("b", 1)]), &job()).unwrap();
        // Re-inserting known names does not count against the limit.
        pool.insert(result(&[("a", 2)]), &job()).unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn snapshot_serializes() {
        let mut pool = NodePool::new();
        pool.insert(result(&[("a", 2)]), &job()).unwrap();

        let json = serde_json::to_value(pool.snapshot()).unwrap();
        assert_eq!(json["job"], "job-1");
        assert_eq!(json["total_slots"], 2);
        assert_eq!(json["nodes"][0]["name"], "a");
        assert_eq!(json["nodes"][0]["state"], "up");
    }
}
