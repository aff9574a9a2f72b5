use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use crate::{
    config::AppConfig,
    handlers::build_router,
    platform::{
        traits::PlatformCapability, FormatSelector, Platform, PlatformError, PlatformRegistry, RawMetadata, ResolutionPlan,
        ResolvedMedia, StreamEntry, SubtitleLanguage, SubtitleTrack,
    },
    state::AppState,
};

#[derive(Default)]
struct StubBackend {
    platform: Platform,
    calls: AtomicUsize,
    plans: Mutex<Vec<ResolutionPlan>>,
}

#[async_trait]
impl PlatformCapability for StubBackend {
    fn platform_id(&self) -> Platform {
        self.platform
    }

    fn platform_name(&self) -> &str {
        "Stub"
    }

    async fn probe(&self, _url: &str) -> Result<Option<RawMetadata>, PlatformError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(RawMetadata {
            title: Some("T".into()),
            uploader: Some("U".into()),
            thumbnail: Some("th".into()),
            duration: Some(100.0),
            formats: vec![StreamEntry {
                height: 720,
                display: "720p".into(),
            }],
            subtitles: vec![SubtitleLanguage {
                language: "en".into(),
                tracks: vec![SubtitleTrack {
                    url: "s".into(),
                    ext: None,
                }],
            }],
        }))
    }

    async fn resolve(&self, _url: &str, plan: &ResolutionPlan) -> Result<ResolvedMedia, PlatformError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.plans.lock().unwrap().push(plan.clone());
        Ok(ResolvedMedia {
            url: Some("https://cdn/a.m4a".into()),
            title: Some("Clip".into()),
            ext: Some("m4a".into()),
            requested_formats: vec![],
        })
    }
}

fn setup_app() -> (Router, Arc<StubBackend>) {
    let mut vars = HashMap::new();
    vars.insert(
        "DOWNLOAD_DIR".to_string(),
        std::env::temp_dir().join("unidownload-router-tests").display().to_string(),
    );
    let config = AppConfig::from_vars(vars).unwrap();

    let backend = Arc::new(StubBackend {
        platform: Platform::Youtube,
        ..Default::default()
    });
    let registry = PlatformRegistry::new();
    registry.register(backend.clone());
    for platform in [Platform::Instagram, Platform::Facebook] {
        registry.register(Arc::new(StubBackend {
            platform,
            ..Default::default()
        }));
    }

    let state = AppState::new(config, registry).unwrap();
    (build_router(state), backend)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let (app, _) = setup_app();
    let (status, body) = send(&app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "message": "UniDownload API is running"}));
}

#[tokio::test]
async fn test_detect_youtube() {
    let (app, backend) = setup_app();
    let (status, body) = send(
        &app,
        post_json("/api/detect", json!({"url": "https://youtube.com/watch?v=abc"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "platform": "youtube",
            "title": "T",
            "uploader": "U",
            "thumbnail": "th",
            "duration": 100,
            "formats": [{"format_id": 720, "label": "720p"}],
            "has_subtitles": true,
            "options": ["video", "audio", "playlist", "subtitles", "thumbnail"]
        })
    );
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_detect_sub_type_keys_per_platform() {
    let (app, _) = setup_app();

    let (status, body) = send(
        &app,
        post_json("/api/detect", json!({"url": "https://www.instagram.com/reel/ABC/"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["media_type"], "reel");
    assert!(body.get("content_type").is_none());

    let (status, body) = send(
        &app,
        post_json("/api/detect", json!({"url": "https://www.facebook.com/reel/123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content_type"], "reel");
    assert!(body.get("media_type").is_none());
}

#[tokio::test]
async fn test_detect_empty_url() {
    let (app, backend) = setup_app();

    for body in [json!({"url": ""}), json!({})] {
        let (status, body) = send(&app, post_json("/api/detect", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_input");
    }
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_detect_unsupported_platform() {
    let (app, _) = setup_app();
    let (status, body) = send(&app, post_json("/api/detect", json!({"url": "https://vimeo.com/1"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "unsupported_platform");
    assert_eq!(body["error"], "Unsupported platform");
}

#[tokio::test]
async fn test_detect_malformed_body_is_rejected() {
    let (app, backend) = setup_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/detect")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert!(status.is_client_error());
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_resolve_instagram_audio() {
    let (app, _) = setup_app();
    let (status, body) = send(
        &app,
        post_json(
            "/api/resolve",
            json!({"url": "https://instagram.com/reel/x", "platform": "instagram", "option": "audio"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"url": "https://cdn/a.m4a", "filename": "Clip.m4a", "kind": "audio"})
    );
}

#[tokio::test]
async fn test_resolve_video_quality_reaches_backend() {
    let (app, backend) = setup_app();
    let (status, _) = send(
        &app,
        post_json(
            "/api/resolve",
            json!({"url": "https://youtu.be/x", "platform": "youtube", "option": "video", "format_id": "480p"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        *backend.plans.lock().unwrap(),
        vec![ResolutionPlan::stream(FormatSelector::AtMostHeight(480))]
    );
}

#[tokio::test]
async fn test_resolve_playlist_is_unprocessable() {
    let (app, backend) = setup_app();
    let (status, body) = send(
        &app,
        post_json(
            "/api/resolve",
            json!({"url": "https://youtube.com/playlist?list=1", "platform": "youtube", "option": "playlist"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "unsupported");
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_resolve_invalid_option() {
    let (app, _) = setup_app();
    let (status, body) = send(
        &app,
        post_json(
            "/api/resolve",
            json!({"url": "https://youtu.be/x", "platform": "youtube", "option": "hologram"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_option");
}

#[tokio::test]
async fn test_download_is_queued_and_trackable() {
    let (app, _) = setup_app();
    let (status, body) = send(
        &app,
        post_json(
            "/api/download",
            json!({"url": "https://youtu.be/x", "platform": "youtube", "option": "video", "format_id": "720"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Download started");
    let task_id = body["task_id"].as_str().unwrap().to_string();

    // workers are not started in tests, so the task stays queued
    let (status, body) = send(&app, get(&format!("/api/tasks/{}", task_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], task_id.as_str());
    assert_eq!(body["status"], "queued");
    assert_eq!(body["platform"], "youtube");
}

#[tokio::test]
async fn test_download_requires_url_and_platform() {
    let (app, _) = setup_app();
    let (status, body) = send(&app, post_json("/api/download", json!({"url": "https://youtu.be/x"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_input");
}

#[tokio::test]
async fn test_unknown_task_is_not_found() {
    let (app, _) = setup_app();
    let (status, body) = send(&app, get("/api/tasks/does-not-exist")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}
