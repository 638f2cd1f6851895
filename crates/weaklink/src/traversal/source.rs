//! Adjacency lookups used by path enumeration.

use super::types::Neighbor;
use crate::domain::{ConnectionRecord, Direction, NodeKey};
use crate::error::Result;
use std::collections::{HashMap, HashSet};

/// Scoped neighbor query against the connection store.
///
/// Implementations are typically backed by an indexed query on the
/// connection collection keyed by node and direction. Failures are treated
/// by the enumerator as dead ends.
pub trait AdjacencySource: Send + Sync {
    /// Connections leaving (`Outbound`) or entering (`Inbound`) `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Source`](crate::Error::Source) when the lookup fails.
    fn fetch_adjacent(&self, key: &NodeKey, direction: Direction) -> Result<Vec<Neighbor>>;
}

/// In-memory adjacency index built from connection records.
///
/// Every record is indexed regardless of status; callers filter on
/// [`Neighbor::status`] through the node filter if they need to.
#[derive(Debug, Default, Clone)]
pub struct EdgeListSource {
    outbound: HashMap<NodeKey, Vec<Neighbor>>,
    inbound: HashMap<NodeKey, Vec<Neighbor>>,
}

impl EdgeListSource {
    /// Index the given connections.
    ///
    /// A repeated `(from, to, label)` record is indexed once; the first
    /// occurrence wins.
    pub fn from_connections<'a, I>(connections: I) -> Self
    where
        I: IntoIterator<Item = &'a ConnectionRecord>,
    {
        let mut source = Self::default();
        let mut seen: HashSet<(&NodeKey, &NodeKey, &str)> = HashSet::new();
        for connection in connections {
            if !seen.insert((&connection.from, &connection.to, connection.label.as_str())) {
                tracing::trace!(
                    from = %connection.from,
                    to = %connection.to,
                    label = %connection.label,
                    "duplicate connection record, skipping"
                );
                continue;
            }
            source
                .outbound
                .entry(connection.from.clone())
                .or_default()
                .push(Neighbor {
                    key: connection.to.clone(),
                    label: connection.label.clone(),
                    status: connection.status.clone(),
                });
            source
                .inbound
                .entry(connection.to.clone())
                .or_default()
                .push(Neighbor {
                    key: connection.from.clone(),
                    label: connection.label.clone(),
                    status: connection.status.clone(),
                });
        }
        source
    }
}

impl AdjacencySource for EdgeListSource {
    fn fetch_adjacent(&self, key: &NodeKey, direction: Direction) -> Result<Vec<Neighbor>> {
        let index = match direction {
            Direction::Outbound => &self.outbound,
            Direction::Inbound => &self.inbound,
        };
        Ok(index.get(key).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_both_directions() {
        let connections = vec![
            ConnectionRecord::new("a", "b", "l-1", "Up"),
            ConnectionRecord::new("c", "b", "l-2", "Down"),
        ];
        let source = EdgeListSource::from_connections(&connections);

        let out = source.fetch_adjacent(&NodeKey::from("a"), Direction::Outbound).unwrap();
        assert_eq!(out, vec![Neighbor::new("b", "l-1", "Up")]);

        let inbound = source.fetch_adjacent(&NodeKey::from("b"), Direction::Inbound).unwrap();
        let keys: Vec<_> = inbound.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);

        assert!(source
            .fetch_adjacent(&NodeKey::from("b"), Direction::Outbound)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn repeated_records_are_indexed_once() {
        let connections = vec![
            ConnectionRecord::new("a", "b", "l-1", "Up"),
            ConnectionRecord::new("a", "b", "l-1", "Up"),
            ConnectionRecord::new("a", "b", "l-2", "Up"),
        ];
        let source = EdgeListSource::from_connections(&connections);

        let out = source.fetch_adjacent(&NodeKey::from("a"), Direction::Outbound).unwrap();
        let labels: Vec<_> = out.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["l-1", "l-2"]);

        let inbound = source.fetch_adjacent(&NodeKey::from("b"), Direction::Inbound).unwrap();
        assert_eq!(inbound.len(), 2);
    }
}
