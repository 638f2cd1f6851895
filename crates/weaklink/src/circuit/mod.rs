//! Circuit integrity evaluation.
//!
//! A circuit is a logical service between two reference resources, the
//! A-point and the Z-point, carried over a path of connections. Its health is
//! recomputed whenever a connection or resource on the path changes:
//!
//! 1. **Invalid circuit**: identical A and Z points force `broken` and `Down`.
//!    No other rule runs.
//! 2. **Degradation**: any path connection not `Up` marks the circuit degraded.
//! 3. **Breakage**: the path is loaded into a fresh [`Topology`] with the
//!    A-point as the only endpoint. If the A or Z point is unreachable the
//!    circuit is broken and the unreachable resources are recorded.
//! 4. **Derived status**: broken implies `Down` and degraded, otherwise `Up`.
//! 5. **Cleanup**: a healthy circuit carries no broken resources.
//!
//! The evaluator is pure. It reports whether the new record differs from
//! the previous one so callers persist and publish only real transitions;
//! re-evaluating unchanged inputs is a no-op.

mod memory;
mod monitor;

pub use memory::InMemoryCircuitStore;
pub use monitor::{
    Circuit, CircuitFailure, CircuitMonitor, CircuitStore, CircuitTransition, UpdateOutcome,
};

use crate::domain::{ConnectionRecord, NodeKey, OperationalStatus};
use crate::impact::{ImpactAnalyzer, ReachabilityMode};
use crate::topology::Topology;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Instant;

/// Persisted health of a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitHealth {
    /// A-point and Z-point are no longer connected
    pub broken: bool,

    /// At least one path connection is not operationally up
    pub degraded: bool,

    /// `Down` when broken, `Up` otherwise
    pub operational_status: OperationalStatus,

    /// Path resources cut off from the A-point while broken
    #[serde(default)]
    pub broken_resources: BTreeSet<NodeKey>,
}

impl Default for CircuitHealth {
    fn default() -> Self {
        Self {
            broken: false,
            degraded: false,
            operational_status: OperationalStatus::Up,
            broken_resources: BTreeSet::new(),
        }
    }
}

/// Result of one integrity evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityVerdict {
    /// Recomputed health
    pub health: CircuitHealth,

    /// `true` when `health` differs from the previous record
    pub changed: bool,

    /// `true` when the circuit is structurally invalid (A-point equals Z-point)
    pub invalid: bool,
}

/// Derives circuit health from its path connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegrityEvaluator {
    analyzer: ImpactAnalyzer,
}

impl IntegrityEvaluator {
    /// Create an evaluator that sweeps the path in the given mode.
    #[must_use]
    pub fn new(mode: ReachabilityMode) -> Self {
        Self {
            analyzer: ImpactAnalyzer::new(mode),
        }
    }

    /// Evaluate a circuit's health.
    ///
    /// `path` holds every connection currently on the circuit's path,
    /// regardless of status. `previous` is the last persisted record.
    #[must_use]
    pub fn evaluate(
        &self,
        path: &[ConnectionRecord],
        a_point: &NodeKey,
        z_point: &NodeKey,
        previous: &CircuitHealth,
    ) -> IntegrityVerdict {
        let start = Instant::now();

        if a_point == z_point {
            tracing::warn!(%a_point, "circuit A-point and Z-point are the same resource");
            let health = CircuitHealth {
                broken: true,
                operational_status: OperationalStatus::Down,
                ..previous.clone()
            };
            return IntegrityVerdict {
                changed: &health != previous,
                health,
                invalid: true,
            };
        }

        let degraded = path.iter().any(|connection| {
            tracing::trace!(label = %connection.label, status = %connection.status, "path connection");
            !connection.status.is_up()
        });

        let unreachable = self.unreachable_on_path(path, a_point, z_point);
        let broken = unreachable.contains(z_point) || unreachable.contains(a_point);

        let health = if broken {
            CircuitHealth {
                broken: true,
                degraded: true,
                operational_status: OperationalStatus::Down,
                broken_resources: unreachable,
            }
        } else {
            CircuitHealth {
                broken: false,
                degraded,
                operational_status: OperationalStatus::Up,
                broken_resources: BTreeSet::new(),
            }
        };

        let changed = &health != previous;

        tracing::debug!(
            %a_point,
            %z_point,
            connections = path.len(),
            broken = health.broken,
            degraded = health.degraded,
            broken_count = health.broken_resources.len(),
            changed,
            elapsed = ?start.elapsed(),
            "checked circuit integrity"
        );

        IntegrityVerdict {
            health,
            changed,
            invalid: false,
        }
    }

    fn unreachable_on_path(
        &self,
        path: &[ConnectionRecord],
        a_point: &NodeKey,
        z_point: &NodeKey,
    ) -> BTreeSet<NodeKey> {
        if path.is_empty() {
            return BTreeSet::new();
        }

        let mut topology = Topology::new();
        topology.mark_endpoint(a_point);
        for connection in path {
            topology.add_edge(
                &connection.from,
                &connection.to,
                &connection.label,
                &connection.status,
            );
        }
        // A Z-point missing from the path must still be judged
        topology.ensure_node(z_point);

        tracing::debug!(
            nodes = topology.node_count(),
            edges = topology.edge_count(),
            "circuit topology loaded"
        );

        self.analyzer.compute_unreachable(&topology)
    }
}

/// Evaluate circuit integrity with the default (undirected) evaluator.
#[must_use]
pub fn evaluate_circuit_integrity(
    path: &[ConnectionRecord],
    a_point: &NodeKey,
    z_point: &NodeKey,
    previous: &CircuitHealth,
) -> IntegrityVerdict {
    IntegrityEvaluator::default().evaluate(path, a_point, z_point, previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> NodeKey {
        NodeKey::from(s)
    }

    fn conn(from: &str, to: &str, status: &str) -> ConnectionRecord {
        ConnectionRecord::new(from, to, format!("{from}-{to}"), status)
    }

    #[test]
    fn healthy_path_is_up() {
        let path = vec![conn("a", "b", "Up"), conn("b", "z", "Up")];
        let verdict = evaluate_circuit_integrity(&path, &key("a"), &key("z"), &CircuitHealth::default());

        assert!(!verdict.health.broken);
        assert!(!verdict.health.degraded);
        assert_eq!(verdict.health.operational_status, OperationalStatus::Up);
        assert!(!verdict.changed);
        assert!(!verdict.invalid);
    }

    #[test]
    fn lowercase_up_is_not_degraded() {
        let path = vec![conn("a", "z", "up")];
        let verdict = evaluate_circuit_integrity(&path, &key("a"), &key("z"), &CircuitHealth::default());
        assert!(!verdict.health.degraded);
    }

    #[test]
    fn cut_path_is_broken() {
        let path = vec![conn("a", "b", "Up"), conn("b", "z", "Down")];
        let verdict = evaluate_circuit_integrity(&path, &key("a"), &key("z"), &CircuitHealth::default());

        assert!(verdict.health.broken);
        assert!(verdict.health.degraded);
        assert_eq!(verdict.health.operational_status, OperationalStatus::Down);
        assert!(verdict.health.broken_resources.contains(&key("z")));
        assert!(!verdict.health.broken_resources.contains(&key("a")));
        assert!(verdict.changed);
    }

    #[test]
    fn redundant_path_is_degraded_not_broken() {
        let path = vec![
            conn("a", "b", "Up"),
            conn("b", "z", "Down"),
            conn("a", "c", "Up"),
            conn("c", "z", "Up"),
        ];
        let verdict = evaluate_circuit_integrity(&path, &key("a"), &key("z"), &CircuitHealth::default());

        assert!(verdict.health.degraded);
        assert!(!verdict.health.broken);
        assert_eq!(verdict.health.operational_status, OperationalStatus::Up);
        assert!(verdict.health.broken_resources.is_empty());
    }

    #[test]
    fn identical_endpoints_force_broken() {
        let path = vec![conn("a", "b", "Up")];
        let verdict = evaluate_circuit_integrity(&path, &key("a"), &key("a"), &CircuitHealth::default());

        assert!(verdict.invalid);
        assert!(verdict.health.broken);
        assert_eq!(verdict.health.operational_status, OperationalStatus::Down);
        assert!(verdict.changed);
    }

    #[test]
    fn empty_path_is_healthy() {
        let verdict = evaluate_circuit_integrity(&[], &key("a"), &key("z"), &CircuitHealth::default());
        assert!(!verdict.health.broken);
        assert!(!verdict.health.degraded);
        assert!(!verdict.changed);
    }

    #[test]
    fn recovery_clears_broken_resources() {
        let previous = CircuitHealth {
            broken: true,
            degraded: true,
            operational_status: OperationalStatus::Down,
            broken_resources: [key("z")].into_iter().collect(),
        };
        let path = vec![conn("a", "b", "Up"), conn("b", "z", "Up")];
        let verdict = evaluate_circuit_integrity(&path, &key("a"), &key("z"), &previous);

        assert!(verdict.changed);
        assert_eq!(verdict.health, CircuitHealth::default());
    }

    #[test]
    fn z_point_absent_from_path_is_broken() {
        let path = vec![conn("a", "b", "Up")];
        let verdict = evaluate_circuit_integrity(&path, &key("a"), &key("z"), &CircuitHealth::default());
        assert!(verdict.health.broken);
        assert_eq!(verdict.health.broken_resources, [key("z")].into_iter().collect());
    }

    #[test]
    fn health_serializes_camel_case() {
        let json = serde_json::to_value(CircuitHealth::default()).unwrap();
        assert_eq!(json["operationalStatus"], "Up");
        assert_eq!(json["brokenResources"], serde_json::json!([]));
    }
}
