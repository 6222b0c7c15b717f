//! Shared health state for the /health endpoint.
//! Updated by the season engine and DbWriter.

use std::sync::atomic::{AtomicU64, Ordering};

/// Shared health metrics. Updated by scanner components, read by the API.
#[derive(Default)]
pub struct HealthState {
    /// Nanosecond timestamp of the last season recompute (0 = none yet).
    pub last_recompute_at_ns: AtomicU64,
    /// Lifetime count of recomputes.
    pub recompute_count: AtomicU64,
    /// Approximate count of season snapshots queued for DB write.
    pub write_queue_pending: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_last_recompute_at_ns(&self, ns: u64) {
        self.last_recompute_at_ns.store(ns, Ordering::Relaxed);
    }

    pub fn inc_recompute_count(&self) {
        self.recompute_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_write_queue_pending(&self) {
        self.write_queue_pending.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec_write_queue_pending(&self) {
        // Saturating: the writer can drain an entry enqueued before a restart.
        let _ = self.write_queue_pending.fetch_update(
            Ordering::Relaxed,
            Ordering::Relaxed,
            |v| Some(v.saturating_sub(1)),
        );
    }

    pub fn last_recompute_at_ns(&self) -> u64 {
        self.last_recompute_at_ns.load(Ordering::Relaxed)
    }

    pub fn recompute_count(&self) -> u64 {
        self.recompute_count.load(Ordering::Relaxed)
    }

    pub fn write_queue_pending(&self) -> u64 {
        self.write_queue_pending.load(Ordering::Relaxed)
    }
}
