use spawn_pool::WorkerPool;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::info;

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_target(false)
    .init();
  info!("--- Task Panic Example ---");

  let pool = WorkerPool::new(
    1, // Concurrency limit
    Handle::current(),
    "panic_pool",
  );

  pool.submit(async {
    info!("Panicking Task: Starting...");
    tokio::time::sleep(Duration::from_millis(100)).await;
    info!("Panicking Task: About to panic!");
    panic!("This task is designed to panic!");
  });

  // Queued behind the panicking task on the pool's only worker.
  let (tx, rx) = oneshot::channel();
  pool.submit(async move {
    info!("Follow-up Task: Running after the panic.");
    let _ = tx.send("follow-up done");
  });

  match rx.await {
    Ok(message) => info!("Worker survived the panic: {}", message),
    Err(e) => info!("Follow-up task never reported back: {:?}", e),
  }

  info!("--- Task Panic Example End ---");
}
