//! Node and edge payloads stored in the topology arena.

use crate::domain::NodeKey;

/// A resource participating in one topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    key: NodeKey,
    local_id: u64,
    endpoint: bool,
}

impl Node {
    pub(super) fn new(key: NodeKey, local_id: u64) -> Self {
        Self {
            key,
            local_id,
            endpoint: false,
        }
    }

    /// The resource identity.
    #[must_use]
    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    /// Sequential id assigned when the node was first referenced (1-based).
    #[must_use]
    pub fn local_id(&self) -> u64 {
        self.local_id
    }

    /// Whether this node is a reachability target.
    #[must_use]
    pub fn is_endpoint(&self) -> bool {
        self.endpoint
    }

    pub(super) fn set_endpoint(&mut self) {
        self.endpoint = true;
    }
}

/// A traversable connection. Only `Up` connections become edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    label: String,
}

impl Edge {
    pub(super) fn new(label: String) -> Self {
        Self { label }
    }

    /// Connection label the edge was built from.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Borrowed view of an edge with its resolved endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeView<'a> {
    /// Origin node key
    pub from: &'a NodeKey,
    /// Destination node key
    pub to: &'a NodeKey,
    /// Connection label
    pub label: &'a str,
}
