//! # Weaklink: Network Inventory Impact Analysis
//!
//! Weaklink answers three questions about a network inventory graph of
//! resources joined by directed connections:
//!
//! - **Impact**: which resources lose every traversable path to a designated
//!   endpoint once some connections go down ([`impact`])
//! - **Circuit integrity**: is a logical circuit between an A-point and a
//!   Z-point still intact over its path of connections ([`circuit`])
//! - **Paths**: what simple paths exist from one resource to another, found
//!   concurrently against a pluggable adjacency source ([`traversal`])
//!
//! Each computation builds a throwaway [`Topology`] from connections the
//! caller has already fetched, analyzes it and drops it. Nothing is cached
//! between calls.
//!
//! ## Quick Start
//!
//! ```
//! use weaklink::{compute_unreachable, ConnectionRecord, NodeKey};
//!
//! let edges = vec![
//!     ConnectionRecord::new("olt", "splitter", "fiber-1", "Up"),
//!     ConnectionRecord::new("splitter", "ont", "drop-7", "Down"),
//! ];
//! let endpoint = NodeKey::from("olt");
//!
//! let unreachable = compute_unreachable(&edges, [&endpoint]);
//! assert_eq!(unreachable.into_iter().collect::<Vec<_>>(), vec![NodeKey::from("ont")]);
//! ```

pub mod circuit;
pub mod config;
pub mod domain;
pub mod error;
pub mod impact;
pub mod snapshot;
pub mod topology;
pub mod traversal;

pub use circuit::{
    evaluate_circuit_integrity, Circuit, CircuitFailure, CircuitHealth, CircuitMonitor,
    CircuitStore, CircuitTransition, InMemoryCircuitStore, IntegrityEvaluator, IntegrityVerdict,
    UpdateOutcome,
};
pub use config::EngineConfig;
pub use domain::{ConnectionRecord, Direction, NodeKey, OperationalStatus};
pub use error::{Error, Result};
pub use impact::{compute_unreachable, ImpactAnalyzer, ImpactReport, ReachabilityMode};
pub use snapshot::{load_connections, LoadWarning};
pub use topology::Topology;
pub use traversal::{
    find_all_paths, AdjacencySource, CancellationToken, EdgeListSource, Neighbor,
    PathEnumerator, TraversalOptions, TraversalPath, TraversalResult,
};
