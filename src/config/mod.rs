//! Configuration models for fair task pools.

pub mod pool;

pub use pool::{FairPoolConfig, SchedulerConfig, CAPACITY_ENV, FLUSH_QUEUE_WHEN_EMPTY_ENV};
