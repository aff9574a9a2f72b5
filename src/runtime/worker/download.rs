use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::{
    runtime::{
        fetch::MediaFetcher,
        queue::TaskQueueManager,
        task::{DownloadTask, TaskStatus},
        RuntimeError,
    },
    service::Dispatcher,
};

use super::Worker;

#[derive(Clone)]
pub struct DownloadWorker {
    name: String,
    concurrency: usize,
    queue_manager: TaskQueueManager,
    dispatcher: Dispatcher,
    fetcher: MediaFetcher,
    shutdown: broadcast::Sender<()>,
    running: Arc<AtomicBool>,
}

impl DownloadWorker {
    pub fn new(
        name: &str,
        concurrency: usize,
        queue_manager: TaskQueueManager,
        dispatcher: Dispatcher,
        fetcher: MediaFetcher,
    ) -> Self {
        let (shutdown, _) = broadcast::channel(1);
        Self {
            name: name.to_string(),
            concurrency: concurrency.max(1),
            queue_manager,
            dispatcher,
            fetcher,
            shutdown,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    async fn process_task(&self, task: &DownloadTask) -> Result<TaskStatus, RuntimeError> {
        self.queue_manager.update_status(&task.id, TaskStatus::Running);

        let locator = self.dispatcher.resolve(&task.request).await?;
        info!("Task {} resolved to {}", task.id, locator.filename);

        let path = self.fetcher.fetch(&task.id, &locator).await?;
        Ok(TaskStatus::Completed {
            locator,
            path: path.display().to_string(),
        })
    }

    async fn run_task(&self, worker_name: &str, task: DownloadTask) {
        let status = match self.process_task(&task).await {
            Ok(status) => {
                info!(
                    "Download completed for {} - {}",
                    task.request.platform, task.request.url
                );
                status
            }
            Err(e) => {
                error!(
                    "Worker {} failed task {} for {} - {}: {}",
                    worker_name, task.id, task.request.platform, task.request.url, e
                );
                let kind = match &e {
                    RuntimeError::Resolve(failure) => Some(failure.kind),
                    _ => None,
                };
                let error = match e {
                    RuntimeError::Resolve(failure) => failure.message,
                    other => other.to_string(),
                };
                TaskStatus::Failed { kind, error }
            }
        };

        self.queue_manager.update_status(&task.id, status);
    }
}

#[async_trait]
impl Worker for DownloadWorker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self) -> Result<(), RuntimeError> {
        if self.running.load(Ordering::SeqCst) {
            return Ok(());
        }

        self.running.store(true, Ordering::SeqCst);
        let worker_ref = Arc::new(self.clone());

        for i in 0..self.concurrency {
            let worker_name = format!("{}_{}", self.name, i);
            let running = self.running.clone();
            let worker = worker_ref.clone();
            let mut rx = self.shutdown.subscribe();

            tokio::spawn(async move {
                while running.load(Ordering::SeqCst) {
                    tokio::select! {
                        task = worker.queue_manager.next_download_task() => {
                            info!("Worker {} picked task {}", worker_name, task.id);
                            worker.run_task(&worker_name, task).await;
                        }
                        _ = rx.recv() => {
                            break;
                        }
                    }
                }
                info!("Worker {} stopped", worker_name);
            });
        }

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
    use std::time::Duration;

    use super::*;
    use crate::{
        platform::PlatformRegistry,
        service::{FailureKind, ResolveRequest},
    };

    fn worker(queue_manager: TaskQueueManager) -> DownloadWorker {
        DownloadWorker::new(
            "download",
            1,
            queue_manager,
            Dispatcher::new(PlatformRegistry::new()),
            MediaFetcher::new(std::env::temp_dir().join("unidownload-tests")).unwrap(),
        )
    }

    async fn wait_until_finished(manager: &TaskQueueManager, id: &str) -> TaskStatus {
        for _ in 0..100 {
            if let Some(record) = manager.get_task(id) {
                if record.status.is_finished() {
                    return record.status;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("task {} did not finish", id);
    }

    #[tokio::test]
    async fn test_failed_resolution_is_recorded() {
        let manager = TaskQueueManager::new(10);
        let worker = worker(manager.clone());
        worker.start().await.unwrap();
        assert!(worker.is_running());

        let id = manager
            .push_download_task(DownloadTask::new(ResolveRequest {
                url: "https://youtube.com/playlist?list=1".into(),
                platform: "youtube".into(),
                option: "playlist".into(),
                format_id: None,
            }))
            .await
            .unwrap();

        match wait_until_finished(&manager, &id).await {
            TaskStatus::Failed { kind, .. } => assert_eq!(kind, Some(FailureKind::Unsupported)),
            other => panic!("unexpected status {:?}", other),
        }

        worker.stop().await.unwrap();
        assert!(!worker.is_running());
    }

    #[tokio::test]
    async fn test_worker_survives_failures() {
        let manager = TaskQueueManager::new(10);
        let worker = worker(manager.clone());
        worker.start().await.unwrap();

        let mut ids = vec![];
        for platform in ["myspace", "youtube"] {
            let id = manager
                .push_download_task(DownloadTask::new(ResolveRequest {
                    url: "https://example.com/x".into(),
                    platform: platform.into(),
                    option: "video".into(),
                    format_id: None,
                }))
                .await
                .unwrap();
            ids.push(id);
        }

        let first = wait_until_finished(&manager, &ids[0]).await;
        assert!(matches!(
            first,
            TaskStatus::Failed {
                kind: Some(FailureKind::UnsupportedPlatform),
                ..
            }
        ));
        // no youtube backend registered
        let second = wait_until_finished(&manager, &ids[1]).await;
        assert!(matches!(
            second,
            TaskStatus::Failed {
                kind: Some(FailureKind::BackendUnavailable),
                ..
            }
        ));

        worker.stop().await.unwrap();
    }
}
