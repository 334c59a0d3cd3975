use crate::error::PoolError;
use crate::lock::{LockStrategy, PoolLock};
use crate::stats::PoolStats;
use crate::task::Task;
use crate::task_queue::TaskQueue;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle as TokioHandle;
use tracing::{debug, info, info_span, trace, Instrument};

/// Construction parameters for a [`WorkerPool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
  /// Maximum number of tasks executing at once. `0` means no limit, in which
  /// case every submission is spawned directly, like `tokio::spawn`.
  pub max_concurrency: usize,
  /// Name attached to every log record the pool emits.
  pub pool_name: String,
  /// How the internal state lock is acquired.
  pub lock_strategy: LockStrategy,
}

impl Default for PoolConfig {
  fn default() -> Self {
    Self {
      max_concurrency: 0,
      pool_name: "worker_pool".to_string(),
      lock_strategy: LockStrategy::Auto,
    }
  }
}

/// Bookkeeping shared by submitters and workers. Only accessed under the pool lock.
#[derive(Debug, Default)]
struct PoolState {
  /// Live workers, busy or idle.
  running: usize,
  /// Workers that found the queue empty and are yielding before they exit.
  idle: usize,
  /// Idle workers that a submission has already handed a task to. Never exceeds `idle`.
  claimed: usize,
  queue: TaskQueue<Task>,
}

/// Outcome of admitting a task into a bounded pool.
#[derive(Debug)]
enum Admission {
  /// A worker slot was reserved; the caller must spawn a worker for the task.
  Spawn(Task),
  /// The task was queued for an idle worker that will pick it up instead of exiting.
  Claimed,
  /// The task was queued for whichever busy worker frees up first.
  Queued,
}

impl PoolState {
  fn admit(&mut self, task: Task, max_concurrency: usize) -> Admission {
    if self.idle > self.claimed {
      self.claimed += 1;
      self.queue.push(task);
      Admission::Claimed
    } else if self.running < max_concurrency {
      self.running += 1;
      Admission::Spawn(task)
    } else {
      self.queue.push(task);
      Admission::Queued
    }
  }
}

/// A pool that runs submitted tasks on the Tokio runtime with at most
/// `max_concurrency` of them executing at the same time.
///
/// Submissions beyond the limit wait in an unbounded queue. Workers are spawned
/// on demand and exit once the queue is drained, so an idle pool holds no
/// runtime tasks and no queue storage.
///
/// The pool gives no ordering guarantee between tasks, cannot cancel them and
/// does not report their results. Use channels or other synchronization inside
/// the task body when completion matters.
pub struct WorkerPool {
  pool_name: Arc<String>,
  max_concurrency: usize,
  tokio_handle: TokioHandle,
  state: PoolLock<PoolState>,
}

impl WorkerPool {
  pub fn new(max_concurrency: usize, tokio_handle: TokioHandle, pool_name: &str) -> Arc<Self> {
    Self::with_config(
      PoolConfig {
        max_concurrency,
        pool_name: pool_name.to_string(),
        ..PoolConfig::default()
      },
      tokio_handle,
    )
  }

  pub fn with_config(config: PoolConfig, tokio_handle: TokioHandle) -> Arc<Self> {
    let state = PoolLock::new(PoolState::default(), config.lock_strategy);
    info!(
      pool_name = %config.pool_name,
      max_concurrency = config.max_concurrency,
      lock_strategy = ?state.strategy(),
      "Worker pool created."
    );

    Arc::new(Self {
      pool_name: Arc::new(config.pool_name),
      max_concurrency: config.max_concurrency,
      tokio_handle,
      state,
    })
  }

  /// Creates a pool bound to the Tokio runtime of the calling context.
  ///
  /// # Errors
  /// Returns `PoolError::NoRuntime` when called outside of a Tokio runtime.
  pub fn try_current(max_concurrency: usize, pool_name: &str) -> Result<Arc<Self>, PoolError> {
    let tokio_handle = TokioHandle::try_current().map_err(|e| PoolError::NoRuntime(e.to_string()))?;
    Ok(Self::new(max_concurrency, tokio_handle, pool_name))
  }

  pub fn name(&self) -> &str {
    &self.pool_name
  }

  /// The concurrency limit, `0` when unlimited.
  pub fn max_concurrency(&self) -> usize {
    self.max_concurrency
  }

  /// The lock strategy in effect, with `LockStrategy::Auto` already resolved.
  pub fn lock_strategy(&self) -> LockStrategy {
    self.state.strategy()
  }

  /// Submits a future for execution and returns immediately.
  ///
  /// The future starts on a fresh worker if the pool is below its limit, or is
  /// queued until a worker becomes available. A panic inside the future is
  /// logged and does not affect other tasks.
  pub fn submit<F>(self: &Arc<Self>, future: F)
  where
    F: Future<Output = ()> + Send + 'static,
  {
    self.admit(Task::Async(Box::pin(future)));
  }

  /// Submits a blocking closure for execution and returns immediately.
  ///
  /// The closure runs on Tokio's blocking thread pool but still occupies one of
  /// this pool's concurrency slots for as long as it runs.
  pub fn submit_blocking<F>(self: &Arc<Self>, body: F)
  where
    F: FnOnce() + Send + 'static,
  {
    self.admit(Task::Blocking(Box::new(body)));
  }

  /// Returns a snapshot of the number of running workers and queued tasks.
  pub fn stats(&self) -> PoolStats {
    let state = self.state.lock();
    PoolStats {
      running: state.running,
      queued: state.queue.len(),
    }
  }

  /// Returns the number of slots currently allocated by the pending-task queue.
  ///
  /// Drops back to zero once the last worker exits.
  pub fn queue_capacity(&self) -> usize {
    self.state.lock().queue.capacity()
  }

  fn admit(self: &Arc<Self>, task: Task) {
    if self.max_concurrency == 0 {
      trace!(pool_name = %self.pool_name, "Unlimited pool: spawning task directly.");
      self.spawn_detached(task);
      return;
    }

    let admission = self.state.lock().admit(task, self.max_concurrency);
    match admission {
      Admission::Spawn(task) => {
        trace!(pool_name = %self.pool_name, "Below concurrency limit: spawning worker.");
        self.spawn_worker(task);
      }
      Admission::Claimed => {
        trace!(pool_name = %self.pool_name, "Queued task for an idle worker.");
      }
      Admission::Queued => {
        trace!(pool_name = %self.pool_name, "At concurrency limit: queued task.");
      }
    }
  }

  fn spawn_detached(&self, task: Task) {
    let pool_name = self.pool_name.clone();
    self.tokio_handle.spawn(
      async move { task.run(&pool_name).await }.instrument(info_span!("pool_task", pool_name = %self.pool_name)),
    );
  }

  fn spawn_worker(self: &Arc<Self>, first_task: Task) {
    let pool = self.clone();
    self.tokio_handle.spawn(
      pool
        .run_worker(first_task)
        .instrument(info_span!("pool_worker", pool_name = %self.pool_name)),
    );
  }

  async fn run_worker(self: Arc<Self>, first_task: Task) {
    debug!(pool_name = %self.pool_name, "Worker started.");

    let mut task = first_task;
    loop {
      task.run(&self.pool_name).await;
      match self.next_task().await {
        Some(next) => task = next,
        None => break,
      }
    }

    debug!(pool_name = %self.pool_name, "Worker exited.");
  }

  /// Takes the next queued task, or retires this worker.
  ///
  /// A worker that finds the queue empty marks itself idle and yields once.
  /// A submission racing with that window claims the worker by queueing its
  /// task and bumping `claimed` instead of spawning a new worker; the claimed
  /// worker then retries the dequeue. Each claim is consumed exactly once, so
  /// the retry loop is bounded by the number of claiming submissions.
  async fn next_task(&self) -> Option<Task> {
    loop {
      {
        let mut state = self.state.lock();
        if let Some(task) = state.queue.pop() {
          return Some(task);
        }
        state.idle += 1;
      }

      tokio::task::yield_now().await;

      let mut state = self.state.lock();
      state.idle -= 1;
      if state.claimed > 0 {
        state.claimed -= 1;
        trace!(pool_name = %self.pool_name, "Idle worker was claimed, retrying dequeue.");
        continue;
      }

      state.running -= 1;
      if state.running == 0 {
        debug_assert!(state.queue.is_empty(), "Last worker exiting with queued tasks.");
        state.queue.reset();
        debug!(pool_name = %self.pool_name, "Last worker exiting, released queue storage.");
      }
      return None;
    }
  }
}

impl fmt::Debug for WorkerPool {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WorkerPool")
      .field("pool_name", &self.pool_name)
      .field("max_concurrency", &self.max_concurrency)
      .field("stats", &self.stats())
      .field("state_lock", &self.state)
      .finish_non_exhaustive()
  }
}
