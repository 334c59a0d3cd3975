//! A Tokio-based worker pool that bounds how many submitted tasks run
//! concurrently, while accepting an unbounded backlog of waiting tasks.

mod error;
mod lock;
mod manager;
mod stats;
mod task;
mod task_queue;

pub use error::PoolError;
pub use lock::LockStrategy;
pub use manager::{PoolConfig, WorkerPool};
pub use stats::PoolStats;
