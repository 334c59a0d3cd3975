use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;

use futures::FutureExt;
use tracing::{error, trace};

/// The type of future that the pool executes.
/// It must be `Send` and `'static` and produces no result.
pub(crate) type TaskToExecute = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A blocking, zero-argument unit of work.
pub(crate) type BlockingTask = Box<dyn FnOnce() + Send + 'static>;

/// Internal representation of a task held by the pool.
pub(crate) enum Task {
  Async(TaskToExecute),
  Blocking(BlockingTask),
}

impl Task {
  /// Runs the task to completion on the current worker.
  ///
  /// A panic inside the task ends only the task. It is logged and swallowed
  /// here so the calling worker keeps draining the queue.
  pub(crate) async fn run(self, pool_name: &str) {
    match self {
      Task::Async(future) => {
        if AssertUnwindSafe(future).catch_unwind().await.is_err() {
          error!(pool_name = %pool_name, "Task panicked during execution.");
        } else {
          trace!(pool_name = %pool_name, "Task executed successfully.");
        }
      }
      Task::Blocking(body) => match tokio::task::spawn_blocking(body).await {
        Ok(()) => trace!(pool_name = %pool_name, "Blocking task executed successfully."),
        Err(join_error) if join_error.is_panic() => {
          error!(pool_name = %pool_name, "Blocking task panicked during execution.");
        }
        Err(join_error) => {
          error!(pool_name = %pool_name, "Blocking task did not run to completion: {}", join_error);
        }
      },
    }
  }
}

impl std::fmt::Debug for Task {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Task::Async(_) => f.write_str("Task::Async"),
      Task::Blocking(_) => f.write_str("Task::Blocking"),
    }
  }
}
