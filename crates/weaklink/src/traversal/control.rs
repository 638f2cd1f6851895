//! Cancellation for long-running traversals.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cloneable flag that asks an in-flight traversal to stop.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create an untriggered token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Stop condition checked before every expansion.
#[derive(Debug)]
pub(super) struct StopCondition {
    deadline: Option<Instant>,
    token: Option<CancellationToken>,
    tripped: AtomicBool,
}

impl StopCondition {
    pub(super) fn new(started: Instant, budget: Option<Duration>, token: Option<CancellationToken>) -> Self {
        Self {
            deadline: budget.and_then(|b| started.checked_add(b)),
            token,
            tripped: AtomicBool::new(false),
        }
    }

    /// `true` once the deadline passed or the token fired. Sticky.
    pub(super) fn should_stop(&self) -> bool {
        if self.tripped.load(Ordering::Relaxed) {
            return true;
        }
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d);
        let cancelled = self.token.as_ref().is_some_and(CancellationToken::is_cancelled);
        if expired || cancelled {
            self.tripped.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }

    pub(super) fn tripped(&self) -> bool {
        self.tripped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn zero_budget_stops_immediately() {
        let stop = StopCondition::new(Instant::now(), Some(Duration::ZERO), None);
        assert!(stop.should_stop());
        assert!(stop.tripped());
    }

    #[test]
    fn no_limits_never_stop() {
        let stop = StopCondition::new(Instant::now(), None, None);
        assert!(!stop.should_stop());
        assert!(!stop.tripped());
    }
}
