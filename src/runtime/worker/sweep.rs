use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::runtime::{queue::TaskQueueManager, RuntimeError};

use super::Worker;

/// Periodically forgets finished task records older than the ttl.
#[derive(Clone)]
pub struct SweepWorker {
    name: String,
    queue_manager: TaskQueueManager,
    ttl: Duration,
    period: Duration,
    shutdown: broadcast::Sender<()>,
    running: Arc<AtomicBool>,
}

impl SweepWorker {
    pub fn new(name: &str, queue_manager: TaskQueueManager, ttl: Duration, period: Duration) -> Self {
        let (shutdown, _) = broadcast::channel(1);
        Self {
            name: name.to_string(),
            queue_manager,
            ttl,
            period: period.max(Duration::from_millis(1)),
            shutdown,
            running: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl Worker for SweepWorker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self) -> Result<(), RuntimeError> {
        if self.running.load(Ordering::SeqCst) {
            return Ok(());
        }

        self.running.store(true, Ordering::SeqCst);
        let worker = self.clone();
        let mut rx = self.shutdown.subscribe();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(worker.period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            while worker.running.load(Ordering::SeqCst) {
                tokio::select! {
                    _ = interval.tick() => {
                        let removed = worker.queue_manager.prune_finished(worker.ttl);
                        if removed > 0 {
                            debug!("Worker {} dropped {} finished tasks", worker.name, removed);
                        }
                    }
                    _ = rx.recv() => {
                        break;
                    }
                }
            }
            info!("Worker {} stopped", worker.name);
        });

        Ok(())
    }

    async fn stop(&self) -> Result<(), RuntimeError> {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.shutdown.send(());
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        runtime::task::{DownloadTask, TaskStatus},
        service::ResolveRequest,
    };

    fn task(url: &str) -> DownloadTask {
        DownloadTask::new(ResolveRequest {
            url: url.to_string(),
            platform: "youtube".to_string(),
            option: "video".to_string(),
            format_id: None,
        })
    }

    #[tokio::test]
    async fn test_sweep_drops_only_finished_tasks() {
        let manager = TaskQueueManager::new(10);
        let queued = manager.push_download_task(task("queued.com")).await.unwrap();
        let done = manager.push_download_task(task("done.com")).await.unwrap();
        manager.update_status(
            &done,
            TaskStatus::Failed {
                kind: None,
                error: "boom".into(),
            },
        );

        let worker = SweepWorker::new("sweep", manager.clone(), Duration::ZERO, Duration::from_millis(10));
        worker.start().await.unwrap();
        assert!(worker.is_running());

        for _ in 0..100 {
            if manager.get_task(&done).is_none() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(manager.get_task(&done).is_none());
        assert!(manager.get_task(&queued).is_some());

        worker.stop().await.unwrap();
        assert!(!worker.is_running());
    }
}
