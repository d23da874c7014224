//! The ephemeral output of one discovery pass.

use std::collections::HashMap;

use nodegrid_core::Node;

/// Nodes produced by a single source invocation, in discovery order.
///
/// Adding a node whose name is already present keeps the earlier entry in
/// place and folds in the larger slot counts. The container is consumed by
/// value when handed to a registry.
#[derive(Debug, Default)]
pub struct DiscoveryResult {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl DiscoveryResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, deduplicating by name.
    pub fn push(&mut self, node: Node) {
        match self.index.get(&node.name) {
            Some(&i) => self.nodes[i].absorb(&node),
            None => {
                self.index.insert(node.name.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    /// Union `other` into `self`.
    pub fn union(&mut self, other: DiscoveryResult) {
        for node in other.into_nodes() {
            self.push(node);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    /// Give up the nodes. The result cannot be used afterwards.
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

impl FromIterator<Node> for DiscoveryResult {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        let mut result = DiscoveryResult::new();
        for node in iter {
            result.push(node);
        }
        result
    }
}

/// What a source found, plus its opinion on oversubscription.
#[derive(Debug, Default)]
pub struct Discovery {
    pub nodes: DiscoveryResult,
    /// `None` leaves the job's override flag untouched on commit.
    pub oversubscribe_hint: Option<bool>,
}

impl Discovery {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(nodes: DiscoveryResult, oversubscribe_hint: Option<bool>) -> Self {
        Self {
            nodes,
            oversubscribe_hint,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Union another pass into this one. A hint carried by `other`
    /// replaces the current hint.
    pub fn merge(&mut self, other: Discovery) {
        self.nodes.union(other.nodes);
        if other.oversubscribe_hint.is_some() {
            self.oversubscribe_hint = other.oversubscribe_hint;
        }
    }
}
