//! A bounded, blocking, many-to-many FIFO channel.
//!
//! This is deliberately hand-rolled rather than built on `crossbeam-channel`:
//! the hashing pipeline (driver → workers → collector) needs exactly FIFO
//! ordering with bounded capacity and no more, and a single mutex with one
//! condition variable per side is the simplest thing that satisfies that. A
//! single shared condvar would not do — producer and consumer notifications
//! must not be aliased when both sides are waiting, or a `notify_one` aimed
//! at a waiting producer could instead wake another waiting consumer.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// A FIFO queue of bounded capacity, safe to share across threads behind an
/// `Arc`. `push` blocks while the queue holds `>= bound` elements; `pop`
/// blocks while it is empty. There is no closed state: end-of-stream is
/// carried in-band by `T` (e.g. `T = Option<Work>`, sentinel `None`).
pub struct Channel<T> {
    queue: Mutex<VecDeque<T>>,
    bound: usize,
    not_full: Condvar,
    not_empty: Condvar,
}

impl<T> Channel<T> {
    /// Create a channel with room for `bound` elements. `bound` must be `>= 1`.
    pub fn new(bound: usize) -> Self {
        assert!(bound >= 1, "channel bound must be at least 1");
        Channel {
            queue: Mutex::new(VecDeque::with_capacity(bound)),
            bound,
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        }
    }

    /// Push a value, blocking while the queue is at capacity. Wakes exactly
    /// one `pop` waiter.
    pub fn push(&self, value: T) {
        let mut queue = self.queue.lock().unwrap();
        while queue.len() >= self.bound {
            queue = self.not_full.wait(queue).unwrap();
        }
        queue.push_back(value);
        self.not_empty.notify_one();
    }

    /// Pop the oldest value, blocking while the queue is empty. Wakes
    /// exactly one `push` waiter.
    pub fn pop(&self) -> T {
        let mut queue = self.queue.lock().unwrap();
        while queue.is_empty() {
            queue = self.not_empty.wait(queue).unwrap();
        }
        let value = queue.pop_front().expect("queue checked non-empty above");
        self.not_full.notify_one();
        value
    }

    /// Current length. For diagnostics only; another thread may change it
    /// the instant after this returns.
    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
