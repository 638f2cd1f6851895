//! Reachability and impact analysis over a [`Topology`].
//!
//! The analyzer answers "which resources can no longer reach any endpoint?"
//! by sweeping outward from every endpoint-marked node and reporting every
//! node the sweep never visits.
//!
//! ## Reachability modes
//!
//! Physical links are bidirectional even though inventory records store a
//! `from`/`to` orientation, so the default [`ReachabilityMode::Undirected`]
//! follows edges in both directions. [`ReachabilityMode::Directed`] honors the
//! stored orientation: a node is reachable when it can walk `from -> to` edges
//! to an endpoint, which the analyzer computes as a sweep over incoming edges.
//!
//! ## Weak nodes
//!
//! Beyond plain reachability, [`ImpactAnalyzer::weak_nodes`] flags resources
//! that still reach an endpoint but through fewer than a configured number of
//! independent links. For every candidate the endpoint sweep is repeated with
//! the candidate removed and the candidate's links into the surviving
//! component are counted. Candidates are scored in parallel.
//!
//! All operations are O(V + E) per sweep, allocate no shared state and can be
//! called concurrently on separate topologies.

mod report;

pub use report::{ImpactReport, UnreachableEdge};

use crate::domain::{ConnectionRecord, NodeKey};
use crate::topology::{Edge, Node, Topology};
use petgraph::graph::{DiGraph, Neighbors, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction as EdgeDirection;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// How edges are followed during the endpoint sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReachabilityMode {
    /// Any traversable edge connects its two nodes, regardless of orientation
    #[default]
    Undirected,

    /// A node must reach an endpoint following `from -> to`
    Directed,
}

impl FromStr for ReachabilityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "undirected" => Ok(Self::Undirected),
            "directed" => Ok(Self::Directed),
            _ => Err(format!(
                "invalid reachability mode '{s}', expected 'undirected' or 'directed'"
            )),
        }
    }
}

impl fmt::Display for ReachabilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undirected => write!(f, "undirected"),
            Self::Directed => write!(f, "directed"),
        }
    }
}

/// Stateless reachability analyzer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImpactAnalyzer {
    mode: ReachabilityMode,
}

impl ImpactAnalyzer {
    /// Create an analyzer using the given reachability mode.
    #[must_use]
    pub fn new(mode: ReachabilityMode) -> Self {
        Self { mode }
    }

    /// The reachability mode in use.
    #[must_use]
    pub fn mode(&self) -> ReachabilityMode {
        self.mode
    }

    /// Keys of nodes that cannot reach any endpoint.
    ///
    /// Returns an empty set for an empty topology and for a topology without
    /// endpoints; neither has anything to measure against.
    #[must_use]
    pub fn compute_unreachable(&self, topology: &Topology) -> BTreeSet<NodeKey> {
        let Some(reached) = self.sweep(topology, None) else {
            return BTreeSet::new();
        };
        collect_unvisited(topology.graph(), &reached)
    }

    /// Traversable edges incident to at least one unreachable node.
    #[must_use]
    pub fn unreachable_edges(&self, topology: &Topology) -> Vec<UnreachableEdge> {
        let Some(reached) = self.sweep(topology, None) else {
            return Vec::new();
        };
        stranded_edges(topology, &reached)
    }

    /// Number of links from `key` into the part of the topology that still
    /// reaches an endpoint when `key` itself is removed.
    ///
    /// In directed mode only outgoing links count. Returns `None` when the
    /// key is unknown or no endpoint is marked.
    #[must_use]
    pub fn endpoint_links(&self, topology: &Topology, key: &NodeKey) -> Option<usize> {
        let idx = topology.index_of(key)?;
        self.links_without(topology, idx)
    }

    /// Unreachable nodes plus non-endpoint nodes with fewer than `min_links`
    /// independent links towards an endpoint.
    #[must_use]
    pub fn weak_nodes(&self, topology: &Topology, min_links: usize) -> BTreeSet<NodeKey> {
        let Some(reached) = self.sweep(topology, None) else {
            return BTreeSet::new();
        };
        let graph = topology.graph();

        let mut weak = collect_unvisited(graph, &reached);

        let candidates: Vec<NodeIndex> = graph
            .node_indices()
            .filter(|idx| reached[idx.index()] && !graph[*idx].is_endpoint())
            .collect();

        let thin: Vec<NodeKey> = candidates
            .par_iter()
            .filter_map(|&idx| {
                let links = self.links_without(topology, idx).unwrap_or(0);
                (links < min_links).then(|| graph[idx].key().clone())
            })
            .collect();

        tracing::debug!(
            candidates = candidates.len(),
            unreachable = weak.len(),
            thin = thin.len(),
            min_links,
            "weak node scoring complete"
        );

        weak.extend(thin);
        weak
    }

    /// Run every analysis and time it.
    #[must_use]
    pub fn analyze(&self, topology: &Topology) -> ImpactReport {
        let start = Instant::now();

        let (unreachable, unreachable_edges) = match self.sweep(topology, None) {
            Some(reached) => (
                collect_unvisited(topology.graph(), &reached),
                stranded_edges(topology, &reached),
            ),
            None => (BTreeSet::new(), Vec::new()),
        };

        let report = ImpactReport {
            mode: self.mode,
            node_count: topology.node_count(),
            edge_count: topology.edge_count(),
            endpoint_count: topology.endpoints().count(),
            unreachable,
            unreachable_edges,
            elapsed: start.elapsed(),
        };

        tracing::debug!(
            nodes = report.node_count,
            edges = report.edge_count,
            endpoints = report.endpoint_count,
            unreachable = report.unreachable.len(),
            elapsed = ?report.elapsed,
            "found unreachable nodes"
        );

        report
    }

    fn links_without(&self, topology: &Topology, idx: NodeIndex) -> Option<usize> {
        let reached = self.sweep(topology, Some(idx))?;
        let graph = topology.graph();

        let outgoing = graph
            .edges_directed(idx, EdgeDirection::Outgoing)
            .map(|edge| edge.target());
        let count = match self.mode {
            ReachabilityMode::Directed => outgoing.filter(|&n| n != idx && reached[n.index()]).count(),
            ReachabilityMode::Undirected => outgoing
                .chain(
                    graph
                        .edges_directed(idx, EdgeDirection::Incoming)
                        .map(|edge| edge.source()),
                )
                .filter(|&n| n != idx && reached[n.index()])
                .count(),
        };
        Some(count)
    }

    /// Breadth-first sweep from every endpoint.
    ///
    /// Returns a visited flag per node index, or `None` when there is no
    /// endpoint to start from. `excluded` is treated as absent.
    fn sweep(&self, topology: &Topology, excluded: Option<NodeIndex>) -> Option<Vec<bool>> {
        let graph = topology.graph();

        let mut visited = vec![false; graph.node_count()];
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        let mut has_endpoint = false;

        if let Some(excluded) = excluded {
            visited[excluded.index()] = true;
        }

        for idx in graph.node_indices() {
            if !graph[idx].is_endpoint() {
                continue;
            }
            has_endpoint = true;
            if !visited[idx.index()] {
                visited[idx.index()] = true;
                queue.push_back(idx);
            }
        }

        if !has_endpoint {
            if !topology.is_empty() {
                tracing::warn!(
                    nodes = topology.node_count(),
                    "no endpoint marked, skipping reachability sweep"
                );
            }
            return None;
        }

        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(graph, current) {
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    queue.push_back(next);
                }
            }
        }

        // The excluded node was pre-marked only to block the sweep
        if let Some(excluded) = excluded {
            visited[excluded.index()] = false;
        }

        Some(visited)
    }

    fn neighbors<'g>(&self, graph: &'g DiGraph<Node, Edge>, idx: NodeIndex) -> Neighbors<'g, Edge> {
        match self.mode {
            ReachabilityMode::Undirected => graph.neighbors_undirected(idx),
            ReachabilityMode::Directed => graph.neighbors_directed(idx, EdgeDirection::Incoming),
        }
    }
}

fn collect_unvisited(graph: &DiGraph<Node, Edge>, reached: &[bool]) -> BTreeSet<NodeKey> {
    graph
        .node_indices()
        .filter(|idx| !reached[idx.index()])
        .map(|idx| graph[idx].key().clone())
        .collect()
}

fn stranded_edges(topology: &Topology, reached: &[bool]) -> Vec<UnreachableEdge> {
    topology
        .graph()
        .edge_references()
        .filter(|edge| !reached[edge.source().index()] || !reached[edge.target().index()])
        .filter_map(|edge| topology.edge_view(edge.id()))
        .map(UnreachableEdge::from)
        .collect()
}

/// Compute unreachable node keys directly from connection records.
///
/// Builds a throwaway [`Topology`], marks `endpoint_keys` and runs an
/// undirected sweep. An empty edge list yields an empty set.
pub fn compute_unreachable<'a, I>(edges: &[ConnectionRecord], endpoint_keys: I) -> BTreeSet<NodeKey>
where
    I: IntoIterator<Item = &'a NodeKey>,
{
    if edges.is_empty() {
        return BTreeSet::new();
    }

    let mut topology = Topology::from_connections(edges);
    for key in endpoint_keys {
        topology.mark_endpoint(key);
    }

    ImpactAnalyzer::default().compute_unreachable(&topology)
}
