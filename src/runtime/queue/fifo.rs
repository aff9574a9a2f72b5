use std::collections::VecDeque;

use tokio::sync::{Mutex, Notify};

use crate::runtime::RuntimeError;

/// Bounded first-in first-out queue whose consumers can wait for work.
pub struct TaskQueue<T> {
    inner: Mutex<VecDeque<T>>,
    capacity: usize,
    notify: Notify,
}

impl<T> TaskQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            notify: Notify::new(),
        }
    }

    pub async fn push(&self, item: T) -> Result<(), RuntimeError> {
        let mut queue = self.inner.lock().await;
        if queue.len() >= self.capacity {
            return Err(RuntimeError::QueueError("Queue is full".to_string()));
        }
        queue.push_back(item);
        drop(queue);

        self.notify.notify_one();
        Ok(())
    }

    pub async fn pop(&self) -> Option<T> {
        self.inner.lock().await.pop_front()
    }

    /// Waits until an item is available.
    pub async fn next(&self) -> T {
        loop {
            let notified = self.notify.notified();
            if let Some(item) = self.pop().await {
                return item;
            }
            notified.await;
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}
