use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheCountersSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub fetch_leaders: u64,
    pub fetch_waiters: u64,
    pub http_attempts: u64,
    pub fetch_failures: u64,
    pub corruption_repairs: u64,
}

/// Process-lifetime counters for one cache handle.
#[derive(Debug, Default)]
pub struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    fetch_leaders: AtomicU64,
    fetch_waiters: AtomicU64,
    http_attempts: AtomicU64,
    fetch_failures: AtomicU64,
    corruption_repairs: AtomicU64,
}

impl CacheCounters {
    pub fn on_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn on_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the new leader count.
    pub fn on_leader(&self) -> u64 {
        self.fetch_leaders.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Returns the new waiter count.
    pub fn on_waiter(&self) -> u64 {
        self.fetch_waiters.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn on_http_attempt(&self) {
        self.http_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn on_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn on_corruption_repair(&self) {
        self.corruption_repairs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheCountersSnapshot {
        CacheCountersSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fetch_leaders: self.fetch_leaders.load(Ordering::Relaxed),
            fetch_waiters: self.fetch_waiters.load(Ordering::Relaxed),
            http_attempts: self.http_attempts.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            corruption_repairs: self.corruption_repairs.load(Ordering::Relaxed),
        }
    }
}
