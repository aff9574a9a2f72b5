use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidInput,
    UnsupportedPlatform,
    InvalidOption,
    Unsupported,
    BackendUnavailable,
    ExtractionFailed,
    NotFound,
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidInput => "invalid_input",
            Self::UnsupportedPlatform => "unsupported_platform",
            Self::InvalidOption => "invalid_option",
            Self::Unsupported => "unsupported",
            Self::BackendUnavailable => "backend_unavailable",
            Self::ExtractionFailed => "extraction_failed",
            Self::NotFound => "not_found",
        };
        f.write_str(s)
    }
}

/// Terminal outcome of a detect or resolve call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidInput, message)
    }

    pub fn unsupported_platform(message: impl Into<String>) -> Self {
        Self::new(FailureKind::UnsupportedPlatform, message)
    }

    pub fn invalid_option(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidOption, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unsupported, message)
    }

    pub fn backend_unavailable(message: impl Into<String>) -> Self {
        Self::new(FailureKind::BackendUnavailable, message)
    }

    pub fn extraction_failed(message: impl Into<String>) -> Self {
        Self::new(FailureKind::ExtractionFailed, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NotFound, message)
    }
}

pub type ServiceResult<T> = Result<T, Failure>;
