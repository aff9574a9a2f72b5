mod error;
mod fetch;
mod queue;
mod task;
mod worker;

use std::{sync::Arc, time::Duration};

pub use error::RuntimeError;
pub use fetch::MediaFetcher;
pub use queue::TaskQueueManager;
pub use task::TaskRecord;
use task::DownloadTask;
use worker::{download::DownloadWorker, sweep::SweepWorker, WorkerPool};

use crate::{
    config::RuntimeConfig,
    service::{Dispatcher, ResolveRequest},
};

/// Upper bound on the pause between two sweeps of finished tasks.
const SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Background download queue plus the workers draining it.
#[derive(Clone)]
pub struct RuntimeManager {
    pub queue_manager: TaskQueueManager,
    worker_pool: Arc<WorkerPool>,
}

impl RuntimeManager {
    pub fn new(config: &RuntimeConfig, dispatcher: Dispatcher) -> Result<Self, RuntimeError> {
        info!(
            "Initializing runtime with queue capacity {} and {} workers",
            config.queue_capacity, config.worker_concurrency
        );
        let queue_manager = TaskQueueManager::new(config.queue_capacity);
        let fetcher = MediaFetcher::new(&config.download_dir)?;

        let mut worker_pool = WorkerPool::new();
        worker_pool.add_worker(DownloadWorker::new(
            "download",
            config.worker_concurrency,
            queue_manager.clone(),
            dispatcher,
            fetcher,
        ));
        if config.task_ttl_secs > 0 {
            let ttl = Duration::from_secs(config.task_ttl_secs);
            worker_pool.add_worker(SweepWorker::new(
                "sweep",
                queue_manager.clone(),
                ttl,
                ttl.min(SWEEP_PERIOD),
            ));
        }

        Ok(Self {
            queue_manager,
            worker_pool: Arc::new(worker_pool),
        })
    }

    pub async fn start(&self) -> Result<(), RuntimeError> {
        self.worker_pool.start_all().await
    }

    pub async fn stop(&self) -> Result<(), RuntimeError> {
        info!("Stopping {} running workers", self.worker_pool.running());
        self.worker_pool.stop_all().await
    }

    pub async fn submit(&self, request: ResolveRequest) -> Result<String, RuntimeError> {
        let task = DownloadTask::new(request);
        let url = task.request.url.clone();
        let task_id = self.queue_manager.push_download_task(task).await?;
        info!(
            "Queued download task {} for {} ({} pending)",
            task_id,
            url,
            self.queue_manager.pending().await
        );
        Ok(task_id)
    }

    pub fn task(&self, task_id: &str) -> Option<TaskRecord> {
        self.queue_manager.get_task(task_id)
    }
}
