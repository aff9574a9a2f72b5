mod download;
mod error;
mod health;
mod media;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::{config::ServerConfig, state::AppState};

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server);

    let api = Router::new()
        .route("/detect", post(media::detect))
        .route("/resolve", post(media::resolve))
        .route("/download", post(download::start_download))
        .route("/tasks/{id}", get(download::get_task))
        .route("/health", get(health::health));

    Router::new().nest("/api", api).with_state(state).layer(cors)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match &config.cors_origins {
        None => layer.allow_origin(Any),
        Some(origins) => {
            let origins = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect::<Vec<_>>();
            info!("CORS restricted to {} origins", origins.len());
            layer.allow_origin(AllowOrigin::list(origins))
        }
    }
}
