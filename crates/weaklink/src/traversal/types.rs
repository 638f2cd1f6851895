//! Types produced by path enumeration.

use crate::domain::{NodeKey, OperationalStatus};
use serde::Serialize;
use std::time::Duration;

/// A candidate next hop returned by an adjacency lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbor {
    /// Resource on the other side of the connection
    pub key: NodeKey,
    /// Label of the connection leading to it
    pub label: String,
    /// Operational status of that connection
    pub status: OperationalStatus,
}

impl Neighbor {
    /// Create a neighbor record.
    pub fn new(
        key: impl Into<NodeKey>,
        label: impl Into<String>,
        status: impl Into<OperationalStatus>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            status: status.into(),
        }
    }
}

/// One step of a path: a node and the connection used to reach it.
///
/// The first element of every path has no connection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PathElement {
    /// Node reached at this step
    pub node: NodeKey,
    /// Label of the connection used to get here
    pub edge: Option<String>,
}

/// A simple path starting at the traversal's start node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TraversalPath {
    elements: Vec<PathElement>,
}

impl TraversalPath {
    pub(super) fn start(node: NodeKey) -> Self {
        Self {
            elements: vec![PathElement { node, edge: None }],
        }
    }

    pub(super) fn extended(&self, neighbor: &Neighbor) -> Self {
        let mut elements = Vec::with_capacity(self.elements.len() + 1);
        elements.extend_from_slice(&self.elements);
        elements.push(PathElement {
            node: neighbor.key.clone(),
            edge: Some(neighbor.label.clone()),
        });
        Self { elements }
    }

    /// Steps of the path, starting node first.
    #[must_use]
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Node keys along the path.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeKey> {
        self.elements.iter().map(|e| &e.node)
    }

    /// Number of connections traversed.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.elements.len().saturating_sub(1)
    }

    /// Final node of the path.
    #[must_use]
    pub fn last(&self) -> &NodeKey {
        // A path always holds at least the start element
        &self.elements[self.elements.len() - 1].node
    }

    /// Whether `key` already appears on the path.
    #[must_use]
    pub fn contains(&self, key: &NodeKey) -> bool {
        self.elements.iter().any(|e| &e.node == key)
    }

    /// `(node, edge label)` pairs, the flat form handed to callers.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(NodeKey, Option<String>)> {
        self.elements
            .iter()
            .map(|e| (e.node.clone(), e.edge.clone()))
            .collect()
    }
}

/// Outcome of one `find_all_paths` call.
#[derive(Debug, Clone, Serialize)]
pub struct TraversalResult {
    /// Discovered paths, sorted
    pub paths: Vec<TraversalPath>,
    /// Nodes visited (one per expansion)
    pub iterations: u64,
    /// Wall time spent
    #[serde(skip)]
    pub elapsed: Duration,
    /// `true` if the deadline or cancellation cut the traversal short
    pub cancelled: bool,
}

impl TraversalResult {
    /// Elapsed wall time in whole milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}
