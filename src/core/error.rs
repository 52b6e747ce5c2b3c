//! Error types for scheduler operations.

use std::fmt;

use thiserror::Error;

/// Errors produced by scheduler components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The backlog for the target key is already at its configured capacity.
    #[error("exceed task queue capacity of {capacity}")]
    CapacityExceeded {
        /// Configured per-key capacity that was hit.
        capacity: usize,
    },
    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// No async runtime available to drive run loops.
    #[error("runtime unavailable: {0}")]
    Runtime(String),
}

impl SchedulerError {
    /// HTTP-equivalent status a boundary layer should answer with.
    ///
    /// Capacity rejections map to `429 Too Many Requests`; everything else is
    /// a server-side fault.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::CapacityExceeded { .. } => 429,
            Self::InvalidConfig(_) | Self::Runtime(_) => 500,
        }
    }

    /// Capacity carried by a [`SchedulerError::CapacityExceeded`] error.
    #[must_use]
    pub const fn capacity(&self) -> Option<usize> {
        match self {
            Self::CapacityExceeded { capacity } => Some(*capacity),
            _ => None,
        }
    }
}

/// Failure delivered through a [`TaskHandle`](crate::core::TaskHandle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError<E> {
    /// The task ran and returned an error.
    Failed(E),
    /// The task panicked while running.
    Panicked(String),
    /// The task was dropped before it could run, e.g. the runtime shut down.
    Abandoned,
}

impl<E> TaskError<E> {
    /// Returns the task's own error, if that is what this is.
    pub fn into_failure(self) -> Option<E> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Panicked(_) | Self::Abandoned => None,
        }
    }

    /// Whether the task itself returned this error.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl<E: fmt::Display> fmt::Display for TaskError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(err) => write!(f, "task failed: {err}"),
            Self::Panicked(msg) => write!(f, "task panicked: {msg}"),
            Self::Abandoned => write!(f, "task abandoned before it ran"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for TaskError<E> {}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
