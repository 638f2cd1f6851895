//! Ephemeral in-memory topology built per computation.
//!
//! A [`Topology`] is assembled from caller-supplied connection records, used
//! for one analysis and then dropped. Nodes and edges live in a single
//! `petgraph` arena indexed by integer ids, with a side map from [`NodeKey`]
//! to arena index for O(1) lookups.
//!
//! ## Edge semantics
//!
//! - Edges keep the caller's orientation (`from -> to`); no reverse edge is added.
//! - Only connections whose status is `Up` become edges. A `Down` connection
//!   still creates both nodes, so an isolated resource remains visible to the
//!   reachability sweep.
//! - Re-adding the same `(from, to, label)` edge is a no-op.

mod types;

pub use types::{Edge, EdgeView, Node};

use crate::domain::{ConnectionRecord, NodeKey, OperationalStatus};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// Directed graph of resources and traversable connections.
#[derive(Debug, Default, Clone)]
pub struct Topology {
    /// Arena of nodes and edges. Edge direction: origin -> destination.
    graph: DiGraph<Node, Edge>,

    /// Mapping from resource key to arena index.
    ///
    /// Every node in `graph` has exactly one entry here.
    index: HashMap<NodeKey, NodeIndex>,

    /// `(from, to, label)` triples already inserted, for idempotent adds.
    seen_edges: HashSet<(NodeIndex, NodeIndex, String)>,
}

impl Topology {
    /// Create an empty topology.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a topology from connection records.
    pub fn from_connections<'a, I>(connections: I) -> Self
    where
        I: IntoIterator<Item = &'a ConnectionRecord>,
    {
        let mut topology = Self::new();
        for connection in connections {
            topology.add_edge(
                &connection.from,
                &connection.to,
                &connection.label,
                &connection.status,
            );
        }
        topology
    }

    /// Get or create the node for `key`.
    pub fn ensure_node(&mut self, key: &NodeKey) -> &Node {
        let idx = self.ensure_index(key);
        &self.graph[idx]
    }

    fn ensure_index(&mut self, key: &NodeKey) -> NodeIndex {
        if let Some(&idx) = self.index.get(key) {
            return idx;
        }
        let local_id = self.graph.node_count() as u64 + 1;
        let idx = self.graph.add_node(Node::new(key.clone(), local_id));
        self.index.insert(key.clone(), idx);
        idx
    }

    /// Add a connection between two resources.
    ///
    /// Both nodes are created on demand. The edge itself is inserted only when
    /// `status` is `Up`. Returns `true` if a new edge was inserted.
    pub fn add_edge(
        &mut self,
        from: &NodeKey,
        to: &NodeKey,
        label: &str,
        status: &OperationalStatus,
    ) -> bool {
        let from_idx = self.ensure_index(from);
        let to_idx = self.ensure_index(to);

        if !status.is_up() {
            tracing::trace!(%from, %to, label, %status, "connection not traversable, skipping edge");
            return false;
        }

        if !self
            .seen_edges
            .insert((from_idx, to_idx, label.to_string()))
        {
            return false;
        }

        self.graph
            .add_edge(from_idx, to_idx, Edge::new(label.to_string()));
        true
    }

    /// Mark `key` as a reachability target, creating the node if missing.
    pub fn mark_endpoint(&mut self, key: &NodeKey) {
        let idx = self.ensure_index(key);
        self.graph[idx].set_endpoint();
    }

    /// Look up a node by key.
    #[must_use]
    pub fn node(&self, key: &NodeKey) -> Option<&Node> {
        self.index.get(key).map(|&idx| &self.graph[idx])
    }

    /// Whether a node with this key exists.
    #[must_use]
    pub fn contains(&self, key: &NodeKey) -> bool {
        self.index.contains_key(key)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Nodes marked as endpoints, in insertion order.
    pub fn endpoints(&self) -> impl Iterator<Item = &Node> {
        self.nodes().filter(|node| node.is_endpoint())
    }

    /// All traversable edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> {
        self.graph.edge_references().map(|edge| EdgeView {
            from: self.graph[edge.source()].key(),
            to: self.graph[edge.target()].key(),
            label: edge.weight().label(),
        })
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of traversable edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// `true` when no node has been referenced yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub(crate) fn graph(&self) -> &DiGraph<Node, Edge> {
        &self.graph
    }

    pub(crate) fn index_of(&self, key: &NodeKey) -> Option<NodeIndex> {
        self.index.get(key).copied()
    }

    pub(crate) fn edge_view(&self, edge: EdgeIndex) -> Option<EdgeView<'_>> {
        let (source, target) = self.graph.edge_endpoints(edge)?;
        Some(EdgeView {
            from: self.graph[source].key(),
            to: self.graph[target].key(),
            label: self.graph[edge].label(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> NodeKey {
        NodeKey::from(s)
    }

    #[test]
    fn add_edge_creates_missing_nodes() {
        let mut topology = Topology::new();
        let inserted = topology.add_edge(&key("a"), &key("b"), "c-1", &OperationalStatus::Up);

        assert!(inserted);
        assert_eq!(topology.node_count(), 2);
        assert_eq!(topology.edge_count(), 1);
        assert!(topology.contains(&key("a")));
        assert!(topology.contains(&key("b")));
    }

    #[test]
    fn down_connection_creates_nodes_without_edge() {
        let mut topology = Topology::new();
        let inserted = topology.add_edge(&key("a"), &key("b"), "c-1", &OperationalStatus::Down);

        assert!(!inserted);
        assert_eq!(topology.node_count(), 2);
        assert_eq!(topology.edge_count(), 0);
    }

    #[test]
    fn unrecognized_status_is_not_traversable() {
        let mut topology = Topology::new();
        topology.add_edge(&key("a"), &key("b"), "c-1", &OperationalStatus::from("Testing"));
        assert_eq!(topology.edge_count(), 0);
    }

    #[test]
    fn duplicate_edge_is_idempotent() {
        let mut topology = Topology::new();
        assert!(topology.add_edge(&key("a"), &key("b"), "c-1", &OperationalStatus::Up));
        assert!(!topology.add_edge(&key("a"), &key("b"), "c-1", &OperationalStatus::Up));
        // Same endpoints, different label is a parallel link
        assert!(topology.add_edge(&key("a"), &key("b"), "c-2", &OperationalStatus::Up));

        assert_eq!(topology.edge_count(), 2);
    }

    #[test]
    fn edges_keep_caller_orientation() {
        let mut topology = Topology::new();
        topology.add_edge(&key("a"), &key("b"), "c-1", &OperationalStatus::Up);

        let edges: Vec<_> = topology.edges().collect();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, &key("a"));
        assert_eq!(edges[0].to, &key("b"));
        assert_eq!(edges[0].label, "c-1");
    }

    #[test]
    fn local_ids_are_sequential() {
        let mut topology = Topology::new();
        topology.ensure_node(&key("x"));
        topology.add_edge(&key("y"), &key("x"), "c-1", &OperationalStatus::Up);
        topology.mark_endpoint(&key("z"));

        let ids: Vec<_> = topology.nodes().map(|n| (n.key().as_str(), n.local_id())).collect();
        assert_eq!(ids, vec![("x", 1), ("y", 2), ("z", 3)]);
    }

    #[test]
    fn mark_endpoint_flags_node() {
        let mut topology = Topology::new();
        topology.add_edge(&key("a"), &key("b"), "c-1", &OperationalStatus::Up);
        topology.mark_endpoint(&key("a"));

        assert!(topology.node(&key("a")).unwrap().is_endpoint());
        assert!(!topology.node(&key("b")).unwrap().is_endpoint());
        let endpoints: Vec<_> = topology.endpoints().map(|n| n.key().clone()).collect();
        assert_eq!(endpoints, vec![key("a")]);
    }

    #[test]
    fn lookup_of_unknown_key_is_none() {
        let topology = Topology::new();
        assert!(topology.node(&key("missing")).is_none());
        assert!(topology.is_empty());
    }

    #[test]
    fn from_connections_applies_status_filter() {
        let connections = vec![
            ConnectionRecord::new("a", "b", "c-1", "Up"),
            ConnectionRecord::new("b", "c", "c-2", "DOWN"),
        ];
        let topology = Topology::from_connections(&connections);

        assert_eq!(topology.node_count(), 3);
        assert_eq!(topology.edge_count(), 1);
    }
}
