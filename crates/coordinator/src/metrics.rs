//! Coordinator metrics
//!
//! Observational counters over coordinator activity. All counters use
//! Relaxed ordering; they synchronize nothing and tolerate approximate
//! interleavings.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters tracking coordinator activity
#[derive(Debug, Default)]
pub struct CoordinatorMetrics {
    /// Physical transactions started
    started: AtomicU64,
    /// Physical transactions committed
    committed: AtomicU64,
    /// Physical transactions rolled back
    rolled_back: AtomicU64,
    /// Logical scopes that joined an existing transaction
    joined: AtomicU64,
    /// Transactions marked rollback-only by a participant
    rollback_only_marks: AtomicU64,
}

impl CoordinatorMetrics {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_start(&self) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_commit(&self) {
        self.committed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rollback(&self) {
        self.rolled_back.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_join(&self) {
        self.joined.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rollback_only_mark(&self) {
        self.rollback_only_marks.fetch_add(1, Ordering::Relaxed);
    }

    /// Consistent-enough snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            started: self.started.load(Ordering::Relaxed),
            committed: self.committed.load(Ordering::Relaxed),
            rolled_back: self.rolled_back.load(Ordering::Relaxed),
            joined: self.joined.load(Ordering::Relaxed),
            rollback_only_marks: self.rollback_only_marks.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CoordinatorMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Physical transactions started
    pub started: u64,
    /// Physical transactions committed
    pub committed: u64,
    /// Physical transactions rolled back
    pub rolled_back: u64,
    /// Logical scopes that joined an existing transaction
    pub joined: u64,
    /// Transactions marked rollback-only by a participant
    pub rollback_only_marks: u64,
}
