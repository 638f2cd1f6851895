//! Result types for impact analysis.

use super::ReachabilityMode;
use crate::domain::NodeKey;
use crate::topology::EdgeView;
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Duration;

/// A traversable edge touching a node that no longer reaches an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreachableEdge {
    /// Origin node key
    pub from: NodeKey,
    /// Destination node key
    pub to: NodeKey,
    /// Connection label
    pub label: String,
}

impl From<EdgeView<'_>> for UnreachableEdge {
    fn from(view: EdgeView<'_>) -> Self {
        Self {
            from: view.from.clone(),
            to: view.to.clone(),
            label: view.label.to_string(),
        }
    }
}

/// Outcome of a full impact analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactReport {
    /// Mode the sweep ran in
    pub mode: ReachabilityMode,
    /// Nodes in the analyzed topology
    pub node_count: usize,
    /// Traversable edges in the analyzed topology
    pub edge_count: usize,
    /// Endpoint-marked nodes
    pub endpoint_count: usize,
    /// Nodes with no traversable path to any endpoint
    pub unreachable: BTreeSet<NodeKey>,
    /// Traversable edges incident to unreachable nodes
    pub unreachable_edges: Vec<UnreachableEdge>,
    /// Wall time spent analyzing
    #[serde(skip)]
    pub elapsed: Duration,
}

impl ImpactReport {
    /// `true` when every node reaches an endpoint.
    #[must_use]
    pub fn is_fully_reachable(&self) -> bool {
        self.unreachable.is_empty()
    }
}
