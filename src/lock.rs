use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

/// Number of optimistic `try_lock` attempts before falling back to a blocking acquire.
const SPIN_ATTEMPTS: u32 = 64;

lazy_static::lazy_static! {
  /// Whether optimistic spinning can pay off on this machine.
  ///
  /// Computed once per process. Spinning on a single hardware thread only burns the
  /// time slice the lock holder needs to make progress.
  static ref OPTIMISTIC_SPIN_AVAILABLE: bool = {
    let parallelism = std::thread::available_parallelism().map_or(1, |n| n.get());
    let available = parallelism > 1;
    debug!(parallelism, available, "Probed optimistic lock spinning capability.");
    available
  };
}

/// How the pool acquires its state lock.
///
/// Both strategies provide the same mutual exclusion; `Spinning` only tries to
/// avoid parking the acquiring thread when the lock is held for a few instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockStrategy {
  /// `Spinning` when the process-wide capability probe allows it, `Plain` otherwise.
  #[default]
  Auto,
  /// Always block on the mutex.
  Plain,
  /// Retry `try_lock` a bounded number of times before blocking.
  Spinning,
}

impl LockStrategy {
  /// Resolves `Auto` against the process-wide capability probe.
  pub fn resolve(self) -> LockStrategy {
    match self {
      LockStrategy::Auto if *OPTIMISTIC_SPIN_AVAILABLE => LockStrategy::Spinning,
      LockStrategy::Auto => LockStrategy::Plain,
      explicit => explicit,
    }
  }
}

/// Mutual exclusion over the pool state with a strategy fixed at construction.
pub(crate) struct PoolLock<T> {
  inner: Mutex<T>,
  spin: bool,
}

impl<T> PoolLock<T> {
  pub(crate) fn new(value: T, strategy: LockStrategy) -> Self {
    Self {
      inner: Mutex::new(value),
      spin: strategy.resolve() == LockStrategy::Spinning,
    }
  }

  pub(crate) fn strategy(&self) -> LockStrategy {
    if self.spin {
      LockStrategy::Spinning
    } else {
      LockStrategy::Plain
    }
  }

  pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
    if self.spin {
      for _ in 0..SPIN_ATTEMPTS {
        if let Some(guard) = self.inner.try_lock() {
          return guard;
        }
        std::hint::spin_loop();
      }
    }
    self.inner.lock()
  }
}

impl<T> std::fmt::Debug for PoolLock<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PoolLock")
      .field("strategy", &self.strategy())
      .field("locked", &self.inner.is_locked())
      .finish_non_exhaustive()
  }
}
