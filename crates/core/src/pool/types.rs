//! Types for the pool module.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of a worker pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Number of jobs executing right now.
    pub active_jobs: usize,
    /// Number of jobs waiting for a worker.
    pub queued_jobs: usize,
    /// Highest number of jobs seen executing at once.
    pub peak_active: usize,
    /// Total jobs finished since the pool was created.
    pub total_processed: u64,
    /// Total jobs that finished as failed.
    pub total_failed: u64,
}

/// Live counters shared by the workers of a pool.
#[derive(Debug, Default)]
pub(crate) struct PoolStats {
    active: AtomicU64,
    queued: AtomicU64,
    peak_active: AtomicU64,
    total_processed: AtomicU64,
    total_failed: AtomicU64,
}

impl PoolStats {
    pub(crate) fn enqueued(&self, count: usize) {
        self.queued.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn started(&self) {
        self.queued.fetch_sub(1, Ordering::Relaxed);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_active.fetch_max(active, Ordering::SeqCst);
    }

    pub(crate) fn finished(&self, failed: bool) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.total_processed.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.total_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn to_status(&self) -> PoolStatus {
        PoolStatus {
            active_jobs: self.active.load(Ordering::Relaxed) as usize,
            queued_jobs: self.queued.load(Ordering::Relaxed) as usize,
            peak_active: self.peak_active.load(Ordering::Relaxed) as usize,
            total_processed: self.total_processed.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
        }
    }
}
