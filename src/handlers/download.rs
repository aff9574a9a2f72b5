use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{
    runtime::TaskRecord,
    service::{Failure, ResolveRequest},
    state::AppState,
};

use super::error::ApiResult;

#[derive(Debug, Serialize)]
pub struct DownloadStarted {
    pub success: bool,
    pub message: &'static str,
    pub task_id: String,
}

/// Queues a background download. Resolution happens on a worker, so only
/// presence of url and platform is checked here.
pub async fn start_download(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> ApiResult<Json<DownloadStarted>> {
    if request.url.trim().is_empty() || request.platform.trim().is_empty() {
        warn!("Download requested without url or platform");
        return Err(Failure::invalid_input("URL and platform are required").into());
    }

    let task_id = state.runtime.submit(request).await?;

    Ok(Json(DownloadStarted {
        success: true,
        message: "Download started",
        task_id,
    }))
}

pub async fn get_task(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<TaskRecord>> {
    state
        .runtime
        .task(&id)
        .map(Json)
        .ok_or_else(|| Failure::not_found(format!("Unknown task: {}", id)).into())
}
