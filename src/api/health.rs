//! Shared health state for the /health endpoint.
//! Updated by the scrape handler after every run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Scrape counters. Written by the scrape route, read by /health.
#[derive(Default)]
pub struct HealthState {
    /// Runs that returned listings.
    pub scrapes_ok: AtomicU64,
    /// Runs that ended in any error, timeouts included.
    pub scrapes_failed: AtomicU64,
    /// Listing count of the most recent successful run.
    pub last_count: AtomicU64,
    /// Unix seconds of the most recent successful run (0 = none yet).
    pub last_success_at: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, count: usize, at_secs: u64) {
        self.scrapes_ok.fetch_add(1, Ordering::Relaxed);
        self.last_count.store(count as u64, Ordering::Relaxed);
        self.last_success_at.store(at_secs, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.scrapes_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn scrapes_ok(&self) -> u64 {
        self.scrapes_ok.load(Ordering::Relaxed)
    }

    pub fn scrapes_failed(&self) -> u64 {
        self.scrapes_failed.load(Ordering::Relaxed)
    }

    pub fn last_count(&self) -> u64 {
        self.last_count.load(Ordering::Relaxed)
    }

    pub fn last_success_at(&self) -> u64 {
        self.last_success_at.load(Ordering::Relaxed)
    }
}
