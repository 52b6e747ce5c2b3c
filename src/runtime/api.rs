//! Request-facing helpers for the layer that sits in front of a pool.
//!
//! That layer derives a key per request, reports the caller's remaining quota
//! before enqueueing, and turns a capacity rejection into a "too many
//! requests" answer. Nothing here depends on a particular HTTP stack.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::core::{FairTaskPool, SchedulerError, Spawn};

/// Header carrying the per-key capacity.
pub const RATE_LIMIT_LIMIT_HEADER: &str = "X-RateLimit-Limit";
/// Header carrying how many more tasks the key may queue.
pub const RATE_LIMIT_REMAINING_HEADER: &str = "X-RateLimit-Remaining";

/// Quota snapshot for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    /// Configured capacity.
    pub limit: usize,
    /// Capacity minus tasks currently waiting.
    pub remaining: usize,
}

impl Quota {
    /// Header name/value pairs for the response.
    pub fn headers(&self) -> [(&'static str, String); 2] {
        [
            (RATE_LIMIT_LIMIT_HEADER, self.limit.to_string()),
            (RATE_LIMIT_REMAINING_HEADER, self.remaining.to_string()),
        ]
    }

    /// The next enqueue for this key would be rejected.
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Quota for `key`, or `None` when the pool is unbounded.
pub fn quota<K, S>(pool: &FairTaskPool<K, S>, key: &K) -> Option<Quota>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    S: Spawn + Clone + Send + Sync + 'static,
{
    let limit = pool.capacity()?;
    Some(Quota {
        limit,
        remaining: limit.saturating_sub(pool.pending_task_count(key)),
    })
}

/// Error body for a refused request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// HTTP-equivalent status.
    pub status: u16,
    /// Human readable reason.
    pub error: String,
}

impl Rejection {
    /// Map a scheduler error to a response body.
    pub fn from_error(err: &SchedulerError) -> Self {
        Self {
            status: err.status_code(),
            error: err.to_string(),
        }
    }

    /// Whether the caller should back off and retry later.
    pub const fn is_rate_limited(&self) -> bool {
        self.status == 429
    }
}

impl From<&SchedulerError> for Rejection {
    fn from(err: &SchedulerError) -> Self {
        Self::from_error(err)
    }
}
