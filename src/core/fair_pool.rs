//! Key-partitioned task pool.
//!
//! [`FairTaskPool`] keeps one [`TaskQueue`] per key and applies a single policy
//! (capacity, auto-disposal) to all of them. Work under one key is strictly
//! sequential; different keys never wait on each other.
//!
//! The key → queue map is the only structure shared between keys. It is
//! guarded by a `parking_lot::Mutex` that is never held across an `.await` or
//! while a run loop is being spawned, and it is only ever mutated here:
//! inserted on first use of a key, removed by the drain callback when
//! `flush_queue_when_empty` is set. Lock order is always map first, then queue
//! state.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::config::FairPoolConfig;
use crate::core::executor::{detached_job, result_job, Job};
use crate::core::stats::PoolCounters;
use crate::core::task_queue::{DrainCallback, QueueOptions};
use crate::core::{PoolStats, SchedulerError, Spawn, TaskHandle, TaskQueue};

type QueueMap<K, S> = Mutex<HashMap<K, TaskQueue<S>>>;

/// Per-key fair scheduler.
///
/// ```rust,ignore
/// use fair_task_pool::config::FairPoolConfig;
/// use fair_task_pool::core::FairTaskPool;
/// use fair_task_pool::runtime::TokioSpawner;
///
/// let pool = FairTaskPool::new(
///     FairPoolConfig::default().with_capacity(2).with_flush_queue_when_empty(true),
///     TokioSpawner::try_current()?,
/// )?;
///
/// let answer = pool.enqueue(user_id, || async { Ok::<_, MyError>(42) })?.await?;
/// ```
pub struct FairTaskPool<K, S> {
    config: FairPoolConfig,
    queues: Arc<QueueMap<K, S>>,
    counters: Arc<PoolCounters>,
    spawner: S,
}

impl<K, S> FairTaskPool<K, S>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static,
    S: Spawn + Clone + Send + Sync + 'static,
{
    /// Create an empty pool.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] when `config` fails
    /// validation.
    pub fn new(config: FairPoolConfig, spawner: S) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;
        tracing::debug!(
            capacity = ?config.capacity,
            flush_queue_when_empty = config.flush_queue_when_empty,
            "fair task pool created"
        );
        Ok(Self {
            config,
            queues: Arc::new(Mutex::new(HashMap::new())),
            counters: Arc::new(PoolCounters::default()),
            spawner,
        })
    }

    /// Dispatch a task to the queue for `key` and return a handle to its
    /// outcome.
    ///
    /// Dropping the handle leaves the task scheduled (fire-and-forget).
    ///
    /// Admission counts the backlog only. The task a run loop has already
    /// popped no longer occupies a slot, so how many tasks of a burst are
    /// accepted depends on whether the loop got to run in between: a key
    /// with capacity `c` accepts `c` tasks back to back when its loop has not
    /// been polled yet (always the case on a current-thread runtime), and
    /// `c + 1` once the first one has started, which a multi-thread runtime
    /// may do at any point.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::CapacityExceeded`] when `key` already has
    /// `capacity` tasks waiting.
    pub fn enqueue<F, Fut, T, E>(
        &self,
        key: K,
        task: F,
    ) -> Result<TaskHandle<T, E>, SchedulerError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (job, handle) = result_job(task);
        self.submit(&key, job)?;
        Ok(handle)
    }

    /// Dispatch a task whose outcome is not observed. The task must deal with
    /// its own errors.
    ///
    /// # Errors
    ///
    /// Same as [`FairTaskPool::enqueue`].
    pub fn enqueue_detached<F, Fut>(&self, key: K, task: F) -> Result<(), SchedulerError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.submit(&key, detached_job(task))
    }

    /// Tasks waiting under `key`, excluding the one currently running.
    /// Zero when the key has no queue.
    ///
    /// A task stays counted until its run loop pops it. On a multi-thread
    /// runtime that can happen right after `enqueue` returns, so the value is
    /// a snapshot, not a reservation.
    pub fn pending_task_count(&self, key: &K) -> usize {
        self.queues
            .lock()
            .get(key)
            .map_or(0, TaskQueue::pending_task_count)
    }

    /// Number of keys that currently own a queue.
    pub fn queue_size(&self) -> usize {
        self.queues.lock().len()
    }

    /// Per-key capacity, `None` when unbounded.
    pub const fn capacity(&self) -> Option<usize> {
        self.config.capacity
    }

    /// Configuration this pool was built with.
    pub const fn config(&self) -> &FairPoolConfig {
        &self.config
    }

    /// Snapshot of pool-wide counters.
    pub fn stats(&self) -> PoolStats {
        self.counters.snapshot(self.queue_size())
    }

    /// Admit `job` under the map lock, then start the run loop with the lock
    /// released. The drain callback takes the map lock, and a spawner may run
    /// the loop to completion inside `spawn`.
    fn submit(&self, key: &K, job: Job) -> Result<(), SchedulerError> {
        let admitted = {
            let mut queues = self.queues.lock();
            let queue = self.queue_for(&mut queues, key);
            queue.push(job).map(|start| start.then(|| queue.clone()))
        };
        self.record_admission(key, admitted.as_ref().err());
        if let Some(queue) = admitted? {
            queue.start();
        }
        Ok(())
    }

    fn queue_for<'a>(
        &self,
        queues: &'a mut HashMap<K, TaskQueue<S>>,
        key: &K,
    ) -> &'a TaskQueue<S> {
        queues
            .entry(key.clone())
            .or_insert_with(|| self.create_queue(key))
    }

    fn create_queue(&self, key: &K) -> TaskQueue<S> {
        let on_drain = self.config.flush_queue_when_empty.then(|| {
            dispose_on_drain(
                Arc::downgrade(&self.queues),
                Arc::clone(&self.counters),
                key.clone(),
            )
        });
        self.counters.queues_created.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(?key, "created task queue");

        TaskQueue::with_instrumentation(
            QueueOptions {
                capacity: self.config.capacity,
                on_drain,
            },
            self.spawner.clone(),
            tracing::debug_span!("task_queue", ?key),
            Some(Arc::clone(&self.counters)),
        )
    }

    fn record_admission(&self, key: &K, rejection: Option<&SchedulerError>) {
        match rejection {
            None => {
                self.counters.submitted_tasks.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(?key, "task enqueued");
            }
            Some(err) => {
                self.counters.rejected_tasks.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(?key, "task rejected: {err}");
            }
        }
    }
}

/// Build the callback that removes `key` from the map once its queue drains.
///
/// The entry is only removed if the queue is still idle when the map lock is
/// taken: `enqueue` pushes while holding that lock, so a task accepted between
/// the drain and the callback keeps its queue alive.
fn dispose_on_drain<K, S>(
    queues: Weak<QueueMap<K, S>>,
    counters: Arc<PoolCounters>,
    key: K,
) -> DrainCallback
where
    K: Eq + Hash + fmt::Debug + Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    Arc::new(move || {
        let Some(queues) = queues.upgrade() else {
            return;
        };
        let mut queues = queues.lock();
        if queues.get(&key).is_some_and(|queue| queue.is_idle()) {
            queues.remove(&key);
            counters.queues_disposed.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(?key, "disposed drained task queue");
        }
    })
}

impl<K, S> fmt::Debug for FairTaskPool<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FairTaskPool")
            .field("config", &self.config)
            .field("queues", &self.queues.lock().len())
            .finish_non_exhaustive()
    }
}
