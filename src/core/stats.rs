//! Pool-wide counters and their snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::executor::JobOutcome;

/// Statistics about pool utilization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Live per-key queues.
    pub live_queues: usize,

    /// Tasks currently running across all keys.
    pub active_tasks: u64,

    /// Tasks accepted into a backlog.
    pub submitted_tasks: u64,

    /// Tasks refused because their key's backlog was full.
    pub rejected_tasks: u64,

    /// Tasks that finished successfully.
    pub completed_tasks: u64,

    /// Tasks that returned an error or panicked.
    pub failed_tasks: u64,

    /// Queues created lazily on first use of a key.
    pub queues_created: u64,

    /// Queues removed after draining.
    pub queues_disposed: u64,

    /// Tasks dropped unsettled because their run loop was torn down, e.g. by
    /// a runtime shutdown.
    pub abandoned_tasks: u64,
}

/// Internal counters for pool statistics (thread-safe).
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    pub active_tasks: AtomicU64,
    pub submitted_tasks: AtomicU64,
    pub rejected_tasks: AtomicU64,
    pub completed_tasks: AtomicU64,
    pub failed_tasks: AtomicU64,
    pub queues_created: AtomicU64,
    pub queues_disposed: AtomicU64,
    pub abandoned_tasks: AtomicU64,
}

impl PoolCounters {
    pub fn job_started(&self) {
        self.active_tasks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn job_finished(&self, outcome: JobOutcome) {
        self.active_tasks.fetch_sub(1, Ordering::Relaxed);
        match outcome {
            JobOutcome::Succeeded => self.completed_tasks.fetch_add(1, Ordering::Relaxed),
            JobOutcome::Failed | JobOutcome::Panicked => {
                self.failed_tasks.fetch_add(1, Ordering::Relaxed)
            }
        };
    }

    /// A run loop was dropped with `backlog` tasks still queued, plus the one
    /// it was running if `in_flight`.
    pub fn run_loop_abandoned(&self, in_flight: bool, backlog: usize) {
        if in_flight {
            self.active_tasks.fetch_sub(1, Ordering::Relaxed);
        }
        let abandoned = backlog as u64 + u64::from(in_flight);
        self.abandoned_tasks.fetch_add(abandoned, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self, live_queues: usize) -> PoolStats {
        PoolStats {
            live_queues,
            active_tasks: self.active_tasks.load(Ordering::Relaxed),
            submitted_tasks: self.submitted_tasks.load(Ordering::Relaxed),
            rejected_tasks: self.rejected_tasks.load(Ordering::Relaxed),
            completed_tasks: self.completed_tasks.load(Ordering::Relaxed),
            failed_tasks: self.failed_tasks.load(Ordering::Relaxed),
            queues_created: self.queues_created.load(Ordering::Relaxed),
            queues_disposed: self.queues_disposed.load(Ordering::Relaxed),
            abandoned_tasks: self.abandoned_tasks.load(Ordering::Relaxed),
        }
    }
}
