pub mod fifo;

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use dashmap::DashMap;
use fifo::TaskQueue;

use super::{
    task::{DownloadTask, TaskRecord, TaskStatus},
    RuntimeError,
};

#[derive(Clone)]
pub struct TaskQueueManager {
    download_queue: Arc<TaskQueue<DownloadTask>>,
    records: Arc<DashMap<String, TaskRecord>>,
}

impl TaskQueueManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            download_queue: Arc::new(TaskQueue::new(capacity)),
            records: Arc::new(DashMap::new()),
        }
    }

    /// Queues a task and starts tracking it. Returns the task id.
    pub async fn push_download_task(&self, task: DownloadTask) -> Result<String, RuntimeError> {
        let id = task.id.clone();
        self.records.insert(id.clone(), TaskRecord::queued(&task));

        if let Err(e) = self.download_queue.push(task).await {
            self.records.remove(&id);
            return Err(e);
        }
        Ok(id)
    }

    #[cfg(test)]
    pub async fn pop_download_task(&self) -> Option<DownloadTask> {
        self.download_queue.pop().await
    }

    pub async fn next_download_task(&self) -> DownloadTask {
        self.download_queue.next().await
    }

    pub async fn pending(&self) -> usize {
        self.download_queue.len().await
    }

    pub fn update_status(&self, task_id: &str, status: TaskStatus) {
        match self.records.get_mut(task_id) {
            Some(mut record) => {
                record.status = status;
                record.updated_at = Utc::now();
            }
            None => warn!("Status update for unknown task {}", task_id),
        }
    }

    pub fn get_task(&self, task_id: &str) -> Option<TaskRecord> {
        self.records.get(task_id).map(|r| r.value().clone())
    }

    /// Drops finished records last updated at least `ttl` ago.
    /// Queued and running tasks are never dropped. Returns the number removed.
    pub fn prune_finished(&self, ttl: Duration) -> usize {
        let now = Utc::now();
        let mut removed = 0;
        self.records.retain(|_, record| {
            let expired = record.status.is_finished()
                && (now - record.updated_at).to_std().is_ok_and(|age| age >= ttl);
            if expired {
                removed += 1;
            }
            !expired
        });
        removed
    }
}
