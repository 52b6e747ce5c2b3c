//! Per-key FIFO task queue with an optional capacity bound.
//!
//! A [`TaskQueue`] owns the backlog for exactly one key. Tasks run one at a
//! time, in the order they were accepted, on a run loop that is spawned the
//! first time work arrives while the queue is idle and exits as soon as the
//! backlog is empty. Bounded and unbounded queues are the same type; the
//! unbounded case simply skips the admission check.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{Instrument, Span};

use super::executor::{detached_job, result_job, Job, JobOutcome};
use super::stats::PoolCounters;
use super::{SchedulerError, Spawn, TaskHandle};

/// Callback fired each time a queue's backlog drains and its run loop exits.
pub type DrainCallback = Arc<dyn Fn() + Send + Sync>;

/// Construction options for a [`TaskQueue`].
#[derive(Clone, Default)]
pub struct QueueOptions {
    /// Maximum backlog length; `None` means unbounded.
    pub capacity: Option<usize>,
    /// Invoked once per drain event.
    pub on_drain: Option<DrainCallback>,
}

impl fmt::Debug for QueueOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueOptions")
            .field("capacity", &self.capacity)
            .field("on_drain", &self.on_drain.is_some())
            .finish()
    }
}

struct QueueState {
    backlog: VecDeque<Job>,
    running: bool,
}

struct QueueInner {
    state: Mutex<QueueState>,
    capacity: Option<usize>,
    on_drain: Option<DrainCallback>,
    counters: Option<Arc<PoolCounters>>,
    span: Span,
}

/// Sequential task queue for a single key.
pub struct TaskQueue<S> {
    inner: Arc<QueueInner>,
    spawner: S,
}

impl<S> TaskQueue<S> {
    /// Create a queue from options.
    pub fn new(options: QueueOptions, spawner: S) -> Self {
        Self::with_instrumentation(options, spawner, Span::none(), None)
    }

    /// Create a queue that never rejects.
    pub fn unbounded(spawner: S) -> Self {
        Self::new(QueueOptions::default(), spawner)
    }

    /// Create a queue that rejects once `capacity` tasks are waiting.
    pub fn bounded(capacity: usize, spawner: S) -> Self {
        Self::new(
            QueueOptions {
                capacity: Some(capacity),
                on_drain: None,
            },
            spawner,
        )
    }

    pub(crate) fn with_instrumentation(
        options: QueueOptions,
        spawner: S,
        span: Span,
        counters: Option<Arc<PoolCounters>>,
    ) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                state: Mutex::new(QueueState {
                    backlog: VecDeque::new(),
                    running: false,
                }),
                capacity: options.capacity,
                on_drain: options.on_drain,
                counters,
                span,
            }),
            spawner,
        }
    }

    /// Tasks accepted but not yet started. The task currently running is not
    /// counted.
    pub fn pending_task_count(&self) -> usize {
        self.inner.state.lock().backlog.len()
    }

    /// Configured capacity, `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.inner.capacity
    }

    /// Whether the run loop is active.
    pub fn is_running(&self) -> bool {
        self.inner.state.lock().running
    }

    /// No run loop and nothing waiting.
    pub fn is_idle(&self) -> bool {
        let state = self.inner.state.lock();
        !state.running && state.backlog.is_empty()
    }
}

impl<S> TaskQueue<S>
where
    S: Spawn,
{
    /// Append a task and return a handle to its eventual outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::CapacityExceeded`] without touching the
    /// backlog when a bounded queue is already full.
    pub fn enqueue<F, Fut, T, E>(&self, task: F) -> Result<TaskHandle<T, E>, SchedulerError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (job, handle) = result_job(task);
        self.submit(job)?;
        Ok(handle)
    }

    /// Append a task whose outcome nobody observes.
    ///
    /// # Errors
    ///
    /// Same admission rules as [`TaskQueue::enqueue`].
    pub fn enqueue_detached<F, Fut>(&self, task: F) -> Result<(), SchedulerError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.submit(detached_job(task))
    }

    fn submit(&self, job: Job) -> Result<(), SchedulerError> {
        if self.push(job)? {
            self.start();
        }
        Ok(())
    }

    /// Admit `job` into the backlog. Returns `true` when the queue was idle
    /// and the caller must [`start`](Self::start) its run loop.
    ///
    /// Nothing is spawned here, so callers may hold their own locks.
    pub(crate) fn push(&self, job: Job) -> Result<bool, SchedulerError> {
        let mut state = self.inner.state.lock();
        if let Some(capacity) = self.inner.capacity {
            if state.backlog.len() >= capacity {
                return Err(SchedulerError::CapacityExceeded { capacity });
            }
        }
        state.backlog.push_back(job);
        Ok(!std::mem::replace(&mut state.running, true))
    }

    /// Spawn the run loop claimed by a `push` that returned `true`.
    ///
    /// Must be called without any lock the drain callback takes: an inline
    /// spawner runs the whole loop, callback included, before returning.
    pub(crate) fn start(&self) {
        let span = self.inner.span.clone();
        self.spawner
            .spawn(run_loop(Arc::clone(&self.inner)).instrument(span));
    }
}

/// Releases a queue whose run loop is dropped before it drains, e.g. when the
/// runtime shuts down with the loop still scheduled.
///
/// Clears `running` so the next enqueue spawns a fresh loop, and drops the
/// backlog so every waiting handle resolves to `TaskError::Abandoned`.
struct RunLoopGuard {
    inner: Arc<QueueInner>,
    in_flight: bool,
    finished: bool,
}

impl RunLoopGuard {
    fn job_started(&mut self) {
        self.in_flight = true;
        if let Some(counters) = &self.inner.counters {
            counters.job_started();
        }
    }

    fn job_finished(&mut self, outcome: JobOutcome) {
        self.in_flight = false;
        if let Some(counters) = &self.inner.counters {
            counters.job_finished(outcome);
        }
    }
}

impl Drop for RunLoopGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let _entered = self.inner.span.enter();
        let abandoned = {
            let mut state = self.inner.state.lock();
            state.running = false;
            std::mem::take(&mut state.backlog)
        };
        tracing::warn!(
            in_flight = self.in_flight,
            backlog = abandoned.len(),
            "run loop dropped before draining, abandoning tasks"
        );
        if let Some(counters) = &self.inner.counters {
            counters.run_loop_abandoned(self.in_flight, abandoned.len());
        }
        drop(abandoned);

        if let Some(on_drain) = &self.inner.on_drain {
            on_drain();
        }
    }
}

// The guard is built outside the async block so that dropping the future
// before its first poll still releases the queue.
fn run_loop(inner: Arc<QueueInner>) -> impl Future<Output = ()> + Send + 'static {
    let mut guard = RunLoopGuard {
        inner,
        in_flight: false,
        finished: false,
    };
    async move {
        tracing::trace!("run loop started");
        loop {
            let job = {
                let mut state = guard.inner.state.lock();
                match state.backlog.pop_front() {
                    Some(job) => job,
                    None => {
                        state.running = false;
                        break;
                    }
                }
            };

            guard.job_started();
            let outcome = job().await;
            guard.job_finished(outcome);
        }
        guard.finished = true;
        tracing::trace!("backlog drained");

        if let Some(on_drain) = &guard.inner.on_drain {
            on_drain();
        }
    }
}

impl<S: Clone> Clone for TaskQueue<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            spawner: self.spawner.clone(),
        }
    }
}

impl<S> fmt::Debug for TaskQueue<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("TaskQueue")
            .field("capacity", &self.inner.capacity)
            .field("pending", &state.backlog.len())
            .field("running", &state.running)
            .finish_non_exhaustive()
    }
}
