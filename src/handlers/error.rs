use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    runtime::RuntimeError,
    service::{Failure, FailureKind},
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Failure(#[from] Failure),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

pub type ApiResult<T> = Result<T, ApiError>;

pub fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::InvalidInput | FailureKind::UnsupportedPlatform | FailureKind::InvalidOption => {
            StatusCode::BAD_REQUEST
        }
        FailureKind::Unsupported => StatusCode::UNPROCESSABLE_ENTITY,
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::BackendUnavailable => StatusCode::BAD_GATEWAY,
        FailureKind::ExtractionFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "kind": self.kind,
        }));
        (status_for(self.kind), body).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Failure(failure) => failure.into_response(),
            ApiError::Runtime(RuntimeError::QueueError(message)) => {
                let body = Json(json!({ "error": message, "kind": "queue_full" }));
                (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
            }
            ApiError::Runtime(RuntimeError::Resolve(failure)) => failure.into_response(),
            ApiError::Runtime(err) => {
                error!("Runtime error: {}", err);
                let body = Json(json!({ "error": err.to_string(), "kind": "internal" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
