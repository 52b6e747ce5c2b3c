//! Task execution plumbing: runtime spawning and type-erased backlog jobs.
//!
//! A backlog only ever holds [`Job`]s. A job is a boxed closure that *creates*
//! the task's future when called, so nothing a caller submits starts running
//! before the run loop pops it. Every job catches panics at its boundary and
//! reports a [`JobOutcome`] instead, which keeps one misbehaving task from
//! tearing down the run loop of its key.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;

use futures::channel::oneshot;
use futures::FutureExt;

use super::{TaskError, TaskHandle};

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn a detached future on the runtime.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// How a single job finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JobOutcome {
    /// Task produced its value.
    Succeeded,
    /// Task returned its own error.
    Failed,
    /// Task panicked.
    Panicked,
}

pub(crate) type JobFuture = Pin<Box<dyn Future<Output = JobOutcome> + Send + 'static>>;

/// A queued unit of work; calling it starts the task.
pub(crate) type Job = Box<dyn FnOnce() -> JobFuture + Send + 'static>;

/// Wrap a result-carrying task so its outcome settles the returned handle.
pub(crate) fn result_job<F, Fut, T, E>(task: F) -> (Job, TaskHandle<T, E>)
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let job: Job = Box::new(move || {
        Box::pin(async move {
            let caught = AssertUnwindSafe(async move { task().await })
                .catch_unwind()
                .await;
            let (outcome, settled) = match caught {
                Ok(Ok(value)) => (JobOutcome::Succeeded, Ok(value)),
                Ok(Err(err)) => (JobOutcome::Failed, Err(TaskError::Failed(err))),
                Err(panic) => {
                    let msg = panic_message(panic.as_ref());
                    tracing::error!(reason = %msg, "task panicked");
                    (JobOutcome::Panicked, Err(TaskError::Panicked(msg)))
                }
            };
            if tx.send(settled).is_err() {
                tracing::trace!("task handle dropped before completion");
            }
            outcome
        })
    });
    (job, TaskHandle::new(rx))
}

/// Wrap a fire-and-forget task. Its errors are its own business; panics are
/// logged and swallowed.
pub(crate) fn detached_job<F, Fut>(task: F) -> Job
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Box::new(move || {
        Box::pin(async move {
            match AssertUnwindSafe(async move { task().await })
                .catch_unwind()
                .await
            {
                Ok(()) => JobOutcome::Succeeded,
                Err(panic) => {
                    tracing::error!(
                        reason = %panic_message(panic.as_ref()),
                        "detached task panicked"
                    );
                    JobOutcome::Panicked
                }
            }
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".into())
}
