//! Core scheduling abstractions: per-key queues and the pool that owns them.

pub mod error;
pub mod executor;
pub mod fair_pool;
pub mod handle;
pub mod stats;
pub mod task_queue;

pub use error::{AppResult, SchedulerError, TaskError};
pub use executor::Spawn;
pub use fair_pool::FairTaskPool;
pub use handle::TaskHandle;
pub use stats::PoolStats;
pub use task_queue::{DrainCallback, QueueOptions, TaskQueue};
