use parking_lot::Mutex;
use std::collections::VecDeque;

/// FIFO of pending jobs shared by the worker threads.
///
/// Every operation takes the same lock; jobs are expected to be much more
/// expensive than a push or a pop, so contention stays low.
pub struct TaskQueue<T> {
    inner: Mutex<VecDeque<T>>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self { inner: Mutex::new(VecDeque::new()) }
    }

    pub fn push(&self, item: T) {
        self.inner.lock().push_back(item);
    }

    /// Removes the oldest item. Never blocks on an empty queue.
    pub fn pop(&self) -> Option<T> {
        self.inner.lock().pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Drops every queued item and returns how many were discarded.
    pub fn clear(&self) -> usize {
        let drained: VecDeque<T> = std::mem::take(&mut *self.inner.lock());
        // items are dropped outside the lock
        drained.len()
    }
}
