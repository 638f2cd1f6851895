//! Recomputing circuit health against an injected store.
//!
//! The monitor owns no state of its own: it reads the current circuit and its
//! path through a [`CircuitStore`], runs the [`IntegrityEvaluator`] and writes
//! the circuit back only when the verdict changed. Serializing concurrent
//! read-modify-write cycles on the same circuit is the store's concern.

use super::{CircuitHealth, IntegrityEvaluator};
use crate::domain::{ConnectionRecord, NodeKey};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A circuit and its last persisted health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    /// Circuit identifier
    pub id: String,
    /// Reference resource at the A end
    pub a_point: NodeKey,
    /// Reference resource at the Z end
    pub z_point: NodeKey,
    /// Last persisted health
    #[serde(default)]
    pub health: CircuitHealth,
}

impl Circuit {
    /// Create a circuit with default (healthy) state.
    pub fn new(id: impl Into<String>, a_point: impl Into<NodeKey>, z_point: impl Into<NodeKey>) -> Self {
        Self {
            id: id.into(),
            a_point: a_point.into(),
            z_point: z_point.into(),
            health: CircuitHealth::default(),
        }
    }
}

/// Read/write access to persisted circuits.
///
/// Implemented by the persistence layer of the surrounding service.
pub trait CircuitStore: Send + Sync {
    /// Load a circuit by id, or `None` if it does not exist.
    fn load_circuit(&self, id: &str) -> Result<Option<Circuit>>;

    /// Every connection currently on the circuit's path, regardless of status.
    fn circuit_path(&self, id: &str) -> Result<Vec<ConnectionRecord>>;

    /// Persist a circuit's updated health.
    fn save_circuit(&self, circuit: &Circuit) -> Result<()>;
}

/// A persisted change in a circuit's health.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitTransition {
    /// Circuit identifier
    pub circuit_id: String,
    /// Health before the recomputation
    pub previous: CircuitHealth,
    /// Health after the recomputation
    pub current: CircuitHealth,
}

/// Recomputes circuit health in response to inventory changes.
#[derive(Debug)]
pub struct CircuitMonitor<S> {
    store: S,
    evaluator: IntegrityEvaluator,
}

impl<S: CircuitStore> CircuitMonitor<S> {
    /// Create a monitor with the default evaluator.
    pub fn new(store: S) -> Self {
        Self::with_evaluator(store, IntegrityEvaluator::default())
    }

    /// Create a monitor with a specific evaluator.
    pub fn with_evaluator(store: S, evaluator: IntegrityEvaluator) -> Self {
        Self { store, evaluator }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Recompute one circuit and persist it if its health changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CircuitNotFound`] if the store does not know the
    /// circuit, or any error raised by the store itself.
    pub fn recompute(&self, circuit_id: &str) -> Result<Option<CircuitTransition>> {
        let mut circuit = self
            .store
            .load_circuit(circuit_id)?
            .ok_or_else(|| Error::CircuitNotFound(circuit_id.to_string()))?;
        let path = self.store.circuit_path(circuit_id)?;

        let verdict = self
            .evaluator
            .evaluate(&path, &circuit.a_point, &circuit.z_point, &circuit.health);

        if !verdict.changed {
            tracing::debug!(circuit = circuit_id, "circuit health unchanged, skipping update");
            return Ok(None);
        }

        let previous = std::mem::replace(&mut circuit.health, verdict.health);
        self.store.save_circuit(&circuit)?;

        tracing::debug!(
            circuit = circuit_id,
            broken = circuit.health.broken,
            degraded = circuit.health.degraded,
            status = %circuit.health.operational_status,
            "circuit health updated"
        );

        Ok(Some(CircuitTransition {
            circuit_id: circuit.id,
            previous,
            current: circuit.health,
        }))
    }

    /// React to a connection update.
    ///
    /// Nothing happens unless the operational status changed. Otherwise every
    /// circuit the connection belongs to is recomputed. Circuits the store no
    /// longer knows are logged and skipped. A store failure on one circuit is
    /// logged and recorded in [`UpdateOutcome::failures`]; the remaining
    /// circuits are still recomputed.
    pub fn on_connection_updated(
        &self,
        old: &ConnectionRecord,
        new: &ConnectionRecord,
    ) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();
        if old.status == new.status || new.circuits.is_empty() {
            return outcome;
        }

        tracing::debug!(
            label = %new.label,
            from = %old.status,
            to = %new.status,
            circuits = new.circuits.len(),
            "connection status transitioned"
        );

        for circuit_id in &new.circuits {
            match self.recompute(circuit_id) {
                Ok(Some(transition)) => outcome.transitions.push(transition),
                Ok(None) => {}
                Err(Error::CircuitNotFound(id)) => {
                    tracing::warn!(circuit = %id, label = %new.label, "connection references unknown circuit");
                }
                Err(error) => {
                    tracing::warn!(
                        circuit = %circuit_id,
                        label = %new.label,
                        %error,
                        "failed to recompute circuit, continuing with the rest"
                    );
                    outcome.failures.push(CircuitFailure {
                        circuit_id: circuit_id.clone(),
                        error,
                    });
                }
            }
        }
        outcome
    }
}

/// A circuit that could not be recomputed.
#[derive(Debug)]
pub struct CircuitFailure {
    /// Circuit identifier
    pub circuit_id: String,
    /// Store error raised while recomputing it
    pub error: Error,
}

/// Result of reacting to one connection update.
#[derive(Debug, Default)]
pub struct UpdateOutcome {
    /// Circuits whose health changed and was persisted
    pub transitions: Vec<CircuitTransition>,
    /// Circuits that failed to recompute
    pub failures: Vec<CircuitFailure>,
}

impl UpdateOutcome {
    /// `true` when every member circuit was recomputed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
