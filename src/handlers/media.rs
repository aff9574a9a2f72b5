use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{
    platform::{DetectionResult, MediaLocator},
    service::{ResolveRequest, ServiceResult},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub url: String,
}

pub async fn detect(State(state): State<AppState>, Json(request): Json<DetectRequest>) -> ServiceResult<Json<DetectionResult>> {
    state.dispatcher.detect(&request.url).await.map(Json)
}

pub async fn resolve(State(state): State<AppState>, Json(request): Json<ResolveRequest>) -> ServiceResult<Json<MediaLocator>> {
    state.dispatcher.resolve(&request).await.map(Json)
}
