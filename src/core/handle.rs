//! Result future returned by `enqueue`.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::FutureExt;

use super::TaskError;

/// Eventual outcome of a task accepted by a queue.
///
/// Resolves exactly once, after the task has actually run. Dropping the handle
/// does not cancel the task; it keeps its place in the backlog and runs with
/// the outcome discarded, which is the fire-and-forget shape.
#[must_use = "dropping a TaskHandle discards the task's outcome; use enqueue_detached for fire-and-forget"]
pub struct TaskHandle<T, E> {
    rx: oneshot::Receiver<Result<T, TaskError<E>>>,
}

impl<T, E> TaskHandle<T, E> {
    pub(crate) const fn new(rx: oneshot::Receiver<Result<T, TaskError<E>>>) -> Self {
        Self { rx }
    }

    /// Non-blocking check; `None` while the task is queued or running.
    pub fn try_outcome(&mut self) -> Option<Result<T, TaskError<E>>> {
        match self.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::Canceled) => Some(Err(TaskError::Abandoned)),
        }
    }
}

impl<T, E> Future for TaskHandle<T, E> {
    type Output = Result<T, TaskError<E>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.rx.poll_unpin(cx).map(|received| match received {
            Ok(outcome) => outcome,
            Err(oneshot::Canceled) => Err(TaskError::Abandoned),
        })
    }
}

impl<T, E> fmt::Debug for TaskHandle<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle").finish_non_exhaustive()
    }
}
