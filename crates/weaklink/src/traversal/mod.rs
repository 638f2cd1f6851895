//! Concurrent enumeration of simple paths.
//!
//! [`PathEnumerator::find_all_paths`] explores outward from a start node,
//! fetching neighbors through an injected [`AdjacencySource`] and recording
//! every simple path that ends at the requested node (or, without an end
//! node, every maximal path within the depth bound).
//!
//! ## Architecture
//!
//! ```text
//! find_all_paths
//!   └─ rayon::ThreadPool (fixed size, per call)
//!        └─ scope ── expand(start)
//!                      ├─ spawn expand(start → n1)
//!                      │    └─ spawn expand(start → n1 → n3) ...
//!                      └─ spawn expand(start → n2) ...
//! ```
//!
//! Each expansion is an independent unit of work on the pool. The pool's
//! `scope` is the completion barrier: it returns only once every spawned
//! expansion, however deep, has finished. Completed paths are appended to a
//! shared collector; nothing else is shared between expansions.
//!
//! ## Failure handling
//!
//! - Adjacency lookups that fail are logged and treated as dead ends.
//! - A deadline or [`CancellationToken`] stops further expansions; the result
//!   is flagged `cancelled` and holds the paths found so far.
//! - Failing to build the worker pool is the only error returned.

mod control;
mod source;
mod types;

pub use control::CancellationToken;
pub use source::{AdjacencySource, EdgeListSource};
pub use types::{Neighbor, PathElement, TraversalPath, TraversalResult};

use crate::domain::{Direction, NodeKey};
use crate::error::Result;
use control::StopCondition;
use rayon::Scope;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Default number of workers in the per-call pool.
pub const DEFAULT_WORKERS: usize = 2;

/// Tuning for one enumerator.
#[derive(Debug, Clone)]
pub struct TraversalOptions {
    /// Worker threads in the per-call pool
    pub workers: usize,
    /// Wall-time budget per call
    pub deadline: Option<Duration>,
    /// External cancellation
    pub cancel: Option<CancellationToken>,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            deadline: None,
            cancel: None,
        }
    }
}

/// Enumerates simple paths over an adjacency source.
pub struct PathEnumerator<'a> {
    source: &'a dyn AdjacencySource,
    options: TraversalOptions,
}

impl<'a> PathEnumerator<'a> {
    /// Create an enumerator with default options.
    pub fn new(source: &'a dyn AdjacencySource) -> Self {
        Self::with_options(source, TraversalOptions::default())
    }

    /// Create an enumerator with explicit options.
    pub fn with_options(source: &'a dyn AdjacencySource, options: TraversalOptions) -> Self {
        Self { source, options }
    }

    /// Find all simple paths from `start`.
    ///
    /// - `end`: when set, only paths ending there are recorded and a branch
    ///   stops as soon as it arrives. When `None`, every maximal path is
    ///   recorded.
    /// - `max_depth`: maximum number of connections per path; `None` or
    ///   `Some(0)` is unbounded.
    /// - `filter`: candidates for which it returns `false` are never entered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerPool`](crate::Error::WorkerPool) if the worker
    /// pool cannot be created.
    pub fn find_all_paths<F>(
        &self,
        start: &NodeKey,
        end: Option<&NodeKey>,
        max_depth: Option<usize>,
        direction: Direction,
        filter: F,
    ) -> Result<TraversalResult>
    where
        F: Fn(&Neighbor) -> bool + Sync,
    {
        let started = Instant::now();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.workers.max(1))
            .thread_name(|i| format!("weaklink-walk-{i}"))
            .build()?;

        let walk = Walk {
            source: self.source,
            end,
            limit: max_depth.filter(|&depth| depth > 0),
            direction,
            filter: &filter,
            stop: StopCondition::new(started, self.options.deadline, self.options.cancel.clone()),
            paths: Mutex::new(Vec::new()),
            iterations: AtomicU64::new(0),
        };

        pool.scope(|scope| walk.expand(scope, TraversalPath::start(start.clone()), 0));

        let cancelled = walk.stop.tripped();
        let iterations = walk.iterations.load(Ordering::Relaxed);
        let mut paths = walk
            .paths
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        paths.sort();
        // A source may repeat a neighbor; the result is a set of paths
        paths.dedup();

        let result = TraversalResult {
            paths,
            iterations,
            elapsed: started.elapsed(),
            cancelled,
        };

        tracing::debug!(
            %start,
            end = ?end,
            %direction,
            paths = result.paths.len(),
            iterations,
            cancelled,
            took_ms = result.elapsed.as_secs_f64() * 1000.0,
            "graph traversal complete"
        );

        Ok(result)
    }
}

/// Shared state of one traversal, borrowed by every expansion.
struct Walk<'w> {
    source: &'w dyn AdjacencySource,
    end: Option<&'w NodeKey>,
    limit: Option<usize>,
    direction: Direction,
    filter: &'w (dyn Fn(&Neighbor) -> bool + Sync),
    stop: StopCondition,
    paths: Mutex<Vec<TraversalPath>>,
    iterations: AtomicU64,
}

impl Walk<'_> {
    fn expand<'s>(&'s self, scope: &Scope<'s>, path: TraversalPath, depth: usize) {
        if self.stop.should_stop() {
            return;
        }
        self.iterations.fetch_add(1, Ordering::Relaxed);

        let current = path.last();

        if let Some(end) = self.end {
            if current == end {
                self.record(path);
                return;
            }
        }

        if self.limit.is_some_and(|max| depth >= max) {
            if self.end.is_none() {
                self.record_maximal(path);
            }
            return;
        }

        let neighbors = match self.source.fetch_adjacent(current, self.direction) {
            Ok(neighbors) => neighbors,
            Err(e) => {
                tracing::warn!(
                    node = %current,
                    direction = %self.direction,
                    error = %e,
                    "adjacency lookup failed, treating node as dead end"
                );
                Vec::new()
            }
        };

        let mut extended = false;
        for neighbor in &neighbors {
            if path.contains(&neighbor.key) || !(self.filter)(neighbor) {
                continue;
            }
            extended = true;
            let next = path.extended(neighbor);
            scope.spawn(move |s| self.expand(s, next, depth + 1));
        }

        if !extended && self.end.is_none() {
            self.record_maximal(path);
        }
    }

    /// Record a path that cannot be extended further.
    ///
    /// The bare start node is not a path.
    fn record_maximal(&self, path: TraversalPath) {
        if path.edge_count() > 0 {
            self.record(path);
        }
    }

    fn record(&self, path: TraversalPath) {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path);
    }
}

/// Find all paths with default options (two workers, no deadline).
///
/// # Errors
///
/// Returns [`Error::WorkerPool`](crate::Error::WorkerPool) if the worker
/// pool cannot be created.
pub fn find_all_paths<F>(
    source: &dyn AdjacencySource,
    start: &NodeKey,
    end: Option<&NodeKey>,
    max_depth: Option<usize>,
    direction: Direction,
    filter: F,
) -> Result<TraversalResult>
where
    F: Fn(&Neighbor) -> bool + Sync,
{
    PathEnumerator::new(source).find_all_paths(start, end, max_depth, direction, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConnectionRecord;
    use crate::error::Error;

    fn key(s: &str) -> NodeKey {
        NodeKey::from(s)
    }

    fn source(edges: &[(&str, &str)]) -> EdgeListSource {
        let records: Vec<_> = edges
            .iter()
            .map(|(from, to)| ConnectionRecord::new(*from, *to, format!("{from}{to}"), "Up"))
            .collect();
        EdgeListSource::from_connections(&records)
    }

    fn node_lists(result: &TraversalResult) -> Vec<Vec<&str>> {
        result
            .paths
            .iter()
            .map(|p| p.nodes().map(NodeKey::as_str).collect())
            .collect()
    }

    #[test]
    fn finds_both_branches_of_diamond() {
        let src = source(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
        let result = find_all_paths(&src, &key("a"), Some(&key("d")), None, Direction::Outbound, |_| true)
            .unwrap();

        assert_eq!(node_lists(&result), vec![vec!["a", "b", "d"], vec!["a", "c", "d"]]);
        assert!(!result.cancelled);
    }

    #[test]
    fn path_records_edge_labels() {
        let src = source(&[("a", "b")]);
        let result = find_all_paths(&src, &key("a"), Some(&key("b")), None, Direction::Outbound, |_| true)
            .unwrap();

        let pairs = result.paths[0].to_pairs();
        assert_eq!(pairs, vec![(key("a"), None), (key("b"), Some("ab".to_string()))]);
    }

    #[test]
    fn start_equal_to_end_is_trivial_path() {
        let src = source(&[("a", "b")]);
        let result = find_all_paths(&src, &key("a"), Some(&key("a")), None, Direction::Outbound, |_| true)
            .unwrap();

        assert_eq!(node_lists(&result), vec![vec!["a"]]);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn inbound_walks_against_orientation() {
        let src = source(&[("a", "b"), ("b", "c")]);
        let result = find_all_paths(&src, &key("c"), Some(&key("a")), None, Direction::Inbound, |_| true)
            .unwrap();
        assert_eq!(node_lists(&result), vec![vec!["c", "b", "a"]]);
    }

    #[test]
    fn no_end_records_maximal_paths() {
        let src = source(&[("a", "b"), ("b", "c"), ("a", "d")]);
        let result = find_all_paths(&src, &key("a"), None, None, Direction::Outbound, |_| true).unwrap();
        assert_eq!(node_lists(&result), vec![vec!["a", "b", "c"], vec!["a", "d"]]);
    }

    #[test]
    fn depth_bound_truncates_maximal_paths() {
        let src = source(&[("a", "b"), ("b", "c"), ("c", "d")]);
        let result = find_all_paths(&src, &key("a"), None, Some(2), Direction::Outbound, |_| true).unwrap();
        assert_eq!(node_lists(&result), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn filter_prunes_candidates() {
        let src = source(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
        let result = find_all_paths(&src, &key("a"), Some(&key("d")), None, Direction::Outbound, |n| {
            n.key.as_str() != "b"
        })
        .unwrap();
        assert_eq!(node_lists(&result), vec![vec!["a", "c", "d"]]);
    }

    #[test]
    fn iterations_count_visited_nodes() {
        let src = source(&[("a", "b"), ("b", "c")]);
        let result = find_all_paths(&src, &key("a"), Some(&key("c")), None, Direction::Outbound, |_| true)
            .unwrap();
        assert_eq!(result.iterations, 3);
    }

    /// Source that reports every neighbor twice.
    struct RepeatingSource(EdgeListSource);

    impl AdjacencySource for RepeatingSource {
        fn fetch_adjacent(&self, key: &NodeKey, direction: Direction) -> Result<Vec<Neighbor>> {
            let neighbors = self.0.fetch_adjacent(key, direction)?;
            Ok(neighbors.iter().chain(&neighbors).cloned().collect())
        }
    }

    #[test]
    fn repeated_neighbors_yield_each_path_once() {
        let src = RepeatingSource(source(&[("a", "b"), ("b", "c")]));
        let result = find_all_paths(&src, &key("a"), Some(&key("c")), None, Direction::Outbound, |_| true)
            .unwrap();
        assert_eq!(node_lists(&result), vec![vec!["a", "b", "c"]]);
    }

    struct FailingSource;

    impl AdjacencySource for FailingSource {
        fn fetch_adjacent(&self, key: &NodeKey, _direction: Direction) -> Result<Vec<Neighbor>> {
            if key.as_str() == "a" {
                Ok(vec![Neighbor::new("b", "ab", "Up"), Neighbor::new("c", "ac", "Up")])
            } else if key.as_str() == "b" {
                Err(Error::Source("connection store unavailable".to_string()))
            } else {
                Ok(vec![Neighbor::new("z", "cz", "Up")])
            }
        }
    }

    #[test]
    fn lookup_failure_is_a_dead_end() {
        let result = find_all_paths(
            &FailingSource,
            &key("a"),
            Some(&key("z")),
            None,
            Direction::Outbound,
            |_| true,
        )
        .unwrap();
        assert_eq!(node_lists(&result), vec![vec!["a", "c", "z"]]);
    }

    #[test]
    fn cancelled_token_stops_before_work() {
        let token = CancellationToken::new();
        token.cancel();
        let src = source(&[("a", "b")]);
        let enumerator = PathEnumerator::with_options(
            &src,
            TraversalOptions {
                cancel: Some(token),
                ..TraversalOptions::default()
            },
        );

        let result = enumerator
            .find_all_paths(&key("a"), Some(&key("b")), None, Direction::Outbound, |_| true)
            .unwrap();
        assert!(result.cancelled);
        assert!(result.paths.is_empty());
        assert_eq!(result.iterations, 0);
    }
}
