#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("{0}")]
    Backend(String),
    #[error("backend timed out after {0}s")]
    Timeout(u64),
    #[error("parsing error: {0}")]
    ParsingError(String),
    #[error("process error: {0}")]
    Process(#[from] std::io::Error),
    #[error("Invalid platform: {0}")]
    InvalidPlatform(String),
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

impl From<serde_json::Error> for PlatformError {
    fn from(error: serde_json::Error) -> Self {
        PlatformError::ParsingError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_is_unchanged() {
        let error = PlatformError::Backend("ERROR: [youtube] abc: Video unavailable".into());
        assert_eq!(error.to_string(), "ERROR: [youtube] abc: Video unavailable");
    }
}
