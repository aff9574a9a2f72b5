use crate::service::Failure;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("queue error: {0}")]
    QueueError(String),
    #[error("resolve error: {0}")]
    Resolve(#[from] Failure),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
