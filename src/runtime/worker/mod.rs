pub mod download;
pub mod sweep;

use async_trait::async_trait;

use super::RuntimeError;

#[async_trait]
pub trait Worker: Send + Sync + 'static {
    fn name(&self) -> &str;
    async fn start(&self) -> Result<(), RuntimeError>;
    async fn stop(&self) -> Result<(), RuntimeError>;
    fn is_running(&self) -> bool;
}

#[derive(Default)]
pub struct WorkerPool {
    workers: Vec<Box<dyn Worker>>,
}

impl WorkerPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_worker<W: Worker + 'static>(&mut self, worker: W) {
        self.workers.push(Box::new(worker));
    }

    pub async fn start_all(&self) -> Result<(), RuntimeError> {
        for worker in &self.workers {
            info!("Starting worker {}", worker.name());
            worker.start().await?;
        }
        Ok(())
    }

    pub async fn stop_all(&self) -> Result<(), RuntimeError> {
        for worker in &self.workers {
            worker.stop().await?;
        }
        Ok(())
    }

    pub fn running(&self) -> usize {
        self.workers.iter().filter(|w| w.is_running()).count()
    }
}
