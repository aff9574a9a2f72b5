use crate::config::ConfigError;
use crate::runtime::RuntimeError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Runtime error: {0}")]
    RuntimeError(#[from] RuntimeError),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Other(error)
    }
}

pub type AppResult<T> = Result<T, AppError>;
