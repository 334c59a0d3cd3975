/// A point-in-time snapshot of a pool's load.
///
/// Both numbers are read under the pool lock, but may be stale by the time the
/// caller looks at them. Do not use them for synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
  /// Number of live workers, either executing a task or about to go idle.
  /// Never greater than the pool's concurrency limit when one is set.
  pub running: usize,
  /// Number of tasks waiting for a worker. Only bounded by available memory.
  pub queued: usize,
}

impl PoolStats {
  /// Total number of tasks in the pool, `running + queued`.
  pub fn total(&self) -> usize {
    self.running + self.queued
  }
}
