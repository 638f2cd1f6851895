//! Mutex-guarded in-process circuit store.

use super::monitor::{Circuit, CircuitStore};
use crate::domain::ConnectionRecord;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    circuits: HashMap<String, Circuit>,
    paths: HashMap<String, Vec<ConnectionRecord>>,
}

/// In-memory [`CircuitStore`].
///
/// Holds circuits and their path connections behind a single lock and counts
/// saves, which makes redundant writes observable.
#[derive(Debug, Default)]
pub struct InMemoryCircuitStore {
    inner: Mutex<Inner>,
    saves: AtomicUsize,
}

impl InMemoryCircuitStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| Error::Store(format!("mutex poisoned: {e}")))
    }

    /// Insert or replace a circuit together with its path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store lock is poisoned.
    pub fn insert_circuit(&self, circuit: Circuit, path: Vec<ConnectionRecord>) -> Result<()> {
        let mut inner = self.lock()?;
        inner.paths.insert(circuit.id.clone(), path);
        inner.circuits.insert(circuit.id.clone(), circuit);
        Ok(())
    }

    /// Replace every path connection matching `connection`'s endpoints and label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store lock is poisoned.
    pub fn update_connection(&self, connection: &ConnectionRecord) -> Result<()> {
        let mut inner = self.lock()?;
        for path in inner.paths.values_mut() {
            for existing in path.iter_mut().filter(|c| {
                c.from == connection.from && c.to == connection.to && c.label == connection.label
            }) {
                existing.status = connection.status.clone();
            }
        }
        Ok(())
    }

    /// Current state of a circuit.
    #[must_use]
    pub fn circuit(&self, id: &str) -> Option<Circuit> {
        self.lock().ok()?.circuits.get(id).cloned()
    }

    /// Number of successful saves so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl CircuitStore for InMemoryCircuitStore {
    fn load_circuit(&self, id: &str) -> Result<Option<Circuit>> {
        Ok(self.lock()?.circuits.get(id).cloned())
    }

    fn circuit_path(&self, id: &str) -> Result<Vec<ConnectionRecord>> {
        Ok(self.lock()?.paths.get(id).cloned().unwrap_or_default())
    }

    fn save_circuit(&self, circuit: &Circuit) -> Result<()> {
        let mut inner = self.lock()?;
        if !inner.circuits.contains_key(&circuit.id) {
            return Err(Error::CircuitNotFound(circuit.id.clone()));
        }
        inner.circuits.insert(circuit.id.clone(), circuit.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
