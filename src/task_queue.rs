/// Number of slots allocated by the first push into an empty queue.
const INITIAL_CAPACITY: usize = 4;

/// An unbounded FIFO queue backed by a circular buffer.
///
/// The buffer starts unallocated and doubles whenever a push would make
/// `tail` catch up with `head`, so one slot is always left unused. The queue
/// has no synchronization of its own; the pool only touches it while holding
/// its state lock.
pub(crate) struct TaskQueue<T> {
  slots: Vec<Option<T>>,
  /// Index of the oldest queued item.
  head: usize,
  /// Index of the next slot to write.
  tail: usize,
}

impl<T> TaskQueue<T> {
  /// Creates an empty queue without allocating.
  pub(crate) const fn new() -> Self {
    Self {
      slots: Vec::new(),
      head: 0,
      tail: 0,
    }
  }

  /// Appends an item, growing the buffer if it is full.
  pub(crate) fn push(&mut self, item: T) {
    if self.slots.is_empty() {
      self.slots.resize_with(INITIAL_CAPACITY, || None);
    } else if self.advance(self.tail) == self.head {
      self.grow();
    }

    self.slots[self.tail] = Some(item);
    self.tail = self.advance(self.tail);
  }

  /// Removes and returns the oldest item, or `None` if the queue is empty.
  pub(crate) fn pop(&mut self) -> Option<T> {
    if self.head == self.tail {
      return None;
    }

    let item = self.slots[self.head].take();
    self.head = self.advance(self.head);
    item
  }

  pub(crate) fn len(&self) -> usize {
    if self.tail >= self.head {
      self.tail - self.head
    } else {
      self.slots.len() - self.head + self.tail
    }
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.head == self.tail
  }

  /// Number of allocated slots, zero while the queue is unallocated.
  pub(crate) fn capacity(&self) -> usize {
    self.slots.len()
  }

  /// Drops the backing storage and returns to the unallocated state.
  pub(crate) fn reset(&mut self) {
    *self = Self::new();
  }

  /// Doubles the buffer, moving the live range to start at index 0.
  fn grow(&mut self) {
    let len = self.len();
    let doubled = self.slots.len() * 2;

    // Rotating puts the wrapped segment (head..end, then 0..tail) in order.
    self.slots.rotate_left(self.head);
    self.slots.resize_with(doubled, || None);
    self.slots.shrink_to_fit();

    self.head = 0;
    self.tail = len;
  }

  fn advance(&self, index: usize) -> usize {
    let next = index + 1;
    if next >= self.slots.len() {
      next - self.slots.len()
    } else {
      next
    }
  }
}

impl<T> Default for TaskQueue<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> std::fmt::Debug for TaskQueue<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TaskQueue")
      .field("len", &self.len())
      .field("capacity", &self.capacity())
      .field("head", &self.head)
      .field("tail", &self.tail)
      .finish()
  }
}
