//! # Fair Task Pool
//!
//! Per-key fair task scheduling for async services.
//!
//! Every task is submitted under a key (a user id, a tenant, a shared "guest"
//! identity). The pool guarantees that:
//!
//! - **Per-key FIFO**: tasks sharing a key run one at a time, in submission
//!   order, never concurrently with each other.
//! - **Cross-key isolation**: a busy key never holds up another key.
//! - **Per-key backpressure**: with a capacity configured, a key whose backlog
//!   is full has new work rejected immediately with
//!   [`SchedulerError::CapacityExceeded`](core::SchedulerError), which a
//!   request layer turns into `429 Too Many Requests`.
//!
//! Queues are created lazily on first use of a key and, when
//! `flush_queue_when_empty` is set, dropped again as soon as they drain.
//!
//! ## Example
//!
//! ```rust,ignore
//! use fair_task_pool::config::FairPoolConfig;
//! use fair_task_pool::core::{FairTaskPool, SchedulerError};
//! use fair_task_pool::runtime::{quota, Rejection, TokioSpawner};
//! use fair_task_pool::util::QueueKey;
//!
//! let pool = FairTaskPool::new(
//!     FairPoolConfig::default()
//!         .with_capacity(2)
//!         .with_flush_queue_when_empty(true),
//!     TokioSpawner::try_current()?,
//! )?;
//!
//! let key = QueueKey::from(user_id);
//! if let Some(quota) = quota(&pool, &key) {
//!     for (name, value) in quota.headers() {
//!         response.set_header(name, value);
//!     }
//! }
//!
//! match pool.enqueue(key, move || async move { service.create_thread(input).await }) {
//!     Ok(handle) => respond_with(handle.await),
//!     Err(err) => reject(Rejection::from_error(&err)),
//! }
//! ```
//!
//! Tasks are zero-argument closures returning a future. Use
//! [`FairTaskPool::enqueue`](core::FairTaskPool::enqueue) to get a
//! [`TaskHandle`](core::TaskHandle) resolving to the task's result, or
//! [`FairTaskPool::enqueue_detached`](core::FairTaskPool::enqueue_detached)
//! when the task reports its own outcome.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: queues, the pool, handles and errors.
pub mod core;
/// Configuration models for pools.
pub mod config;
/// Builders to construct pools from configuration.
pub mod builders;
/// Runtime adapters and request-facing helpers.
pub mod runtime;
/// Shared utilities.
pub mod util;
