use thiserror::Error;

/// Errors that can occur when constructing a `spawn_pool` pool.
///
/// Submitting work never fails: admission either spawns a worker or queues
/// the task, and task panics are contained by the worker that ran them.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PoolError {
  #[error("No Tokio runtime is available in the current context: {0}")]
  NoRuntime(String),
}
