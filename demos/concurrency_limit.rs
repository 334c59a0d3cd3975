use spawn_pool::WorkerPool;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::info;

async fn long_task_fn(id: usize) -> String {
  info!("Task {} starting (concurrency test - should take 1s)", id);
  tokio::time::sleep(Duration::from_secs(1)).await;
  format!("Task {} finished", id)
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_target(false)
    .init();

  info!("--- Concurrency Limit Example (Limit: 2) ---");

  let concurrency_limit = 2;
  let pool = WorkerPool::new(concurrency_limit, Handle::current(), "concurrency_pool");

  let num_tasks: usize = 5;
  let (done_tx, mut done_rx) = mpsc::unbounded_channel();

  info!(
    "Submitting {} tasks, each takes 1 sec. With concurrency {}, this should take ~{} secs.",
    num_tasks,
    concurrency_limit,
    num_tasks.div_ceil(concurrency_limit)
  );

  let started_at = Instant::now();
  for i in 0..num_tasks {
    let done_tx = done_tx.clone();
    pool.submit(async move {
      let result = long_task_fn(i).await;
      let _ = done_tx.send(result);
    });
  }
  drop(done_tx);

  info!("Stats right after submitting: {:?}", pool.stats());

  // The channel closes once every task has run and dropped its sender.
  while let Some(result) = done_rx.recv().await {
    info!("{} (pool stats: {:?})", result, pool.stats());
  }

  info!("All tasks processed in {:?}.", started_at.elapsed());
  info!("--- Concurrency Limit Example End ---");
}
