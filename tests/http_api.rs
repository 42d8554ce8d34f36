//! HTTP boundary behavior tests, driven through the router with oneshot requests.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use base64::Engine;
use edge_relay::demand_state::DemandState;
use edge_relay::event_log::EventLog;
use edge_relay::image_slot::ImageSlot;
use edge_relay::models::{Ack, CheckResponse, LatestImageResponse};
use edge_relay::peer_client::PeerClient;
use edge_relay::state::{AppConfig, AppState};
use edge_relay::web_api;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    app: axum::Router,
    state: AppState,
    // Keeps the temp dir alive for the test's duration
    _dir: TempDir,
}

async fn test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        upload_dir: dir.path().join("latest"),
        log_file: dir.path().join("logs.txt"),
        peer_upload_url: "http://127.0.0.1:1/upload".to_string(),
        delivery_interval_secs: 1,
        request_timeout_secs: 1,
    };

    let state = AppState {
        slot: Arc::new(ImageSlot::new(config.upload_dir.clone()).await.expect("slot")),
        event_log: Arc::new(EventLog::new(config.log_file.clone())),
        demand: Arc::new(DemandState::new()),
        peer: Arc::new(PeerClient::new(config.peer_upload_url.clone(), 1).expect("peer client")),
        config,
    };

    TestApp {
        app: web_api::create_router(state.clone()),
        state,
        _dir: dir,
    }
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}

#[tokio::test]
async fn check_reports_running_and_no_image_at_boot() {
    let t = test_app().await;

    let response = t.app.oneshot(get("/check")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let check: CheckResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(check.status, "running");
    assert!(!check.image_available);
}

#[tokio::test]
async fn get_latest_image_is_404_before_any_upload() {
    let t = test_app().await;

    let response = t.app.oneshot(get("/get-latest-image")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn upload_then_fetch_roundtrips_the_image() {
    let t = test_app().await;

    // "aGVsbG8=" decodes to "hello"
    let response = t
        .app
        .clone()
        .oneshot(post_json(
            "/upload",
            json!({"image": "aGVsbG8=", "filename": "x.png"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let ack: Ack = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(ack.status, "ok");

    let response = t.app.clone().oneshot(get("/check")).await.unwrap();
    let check: CheckResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(check.image_available);

    let response = t.app.oneshot(get("/get-latest-image")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let latest: LatestImageResponse =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(latest.status, "ok");
    assert_eq!(latest.filename, "x.png");
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(latest.image_base64)
        .unwrap();
    assert_eq!(decoded, b"hello");
}

#[tokio::test]
async fn upload_defaults_the_advisory_filename() {
    let t = test_app().await;

    let response = t
        .app
        .clone()
        .oneshot(post_json("/upload", json!({"image": "aGVsbG8="})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = t.app.oneshot(get("/get-latest-image")).await.unwrap();
    let latest: LatestImageResponse =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(latest.filename, "latest.png");
}

#[tokio::test]
async fn view_image_serves_raw_bytes_with_png_content_type() {
    let t = test_app().await;

    // Content is never validated as an image, the content type is fixed
    t.state.slot.store(b"not a real png", "x.png").await.unwrap();

    let response = t.app.oneshot(get("/view-image")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    assert_eq!(body_bytes(response).await, b"not a real png");
}

#[tokio::test]
async fn view_image_is_404_when_slot_is_empty() {
    let t = test_app().await;

    let response = t.app.oneshot(get("/view-image")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn upload_with_invalid_base64_is_rejected_and_slot_unchanged() {
    let t = test_app().await;

    t.state.slot.store(b"prior", "prior.png").await.unwrap();

    let response = t
        .app
        .clone()
        .oneshot(post_json("/upload", json!({"image": "%%% not base64 %%%"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "error");

    // All-or-nothing: the prior content survives
    assert_eq!(t.state.slot.read().await.unwrap(), b"prior");
    assert_eq!(t.state.slot.filename().await, "prior.png");
}

#[tokio::test]
async fn upload_with_missing_image_field_is_rejected() {
    let t = test_app().await;

    let response = t
        .app
        .oneshot(post_json("/upload", json!({"filename": "x.png"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn view_logs_has_placeholder_then_upload_line() {
    let t = test_app().await;

    let response = t.app.clone().oneshot(get("/view-logs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"No logs available.");

    t.app
        .clone()
        .oneshot(post_json(
            "/upload",
            json!({"image": "aGVsbG8=", "filename": "x.png"}),
        ))
        .await
        .unwrap();

    let response = t.app.oneshot(get("/view-logs")).await.unwrap();
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    let line = text.lines().find(|l| l.contains("Image received: x.png"));
    assert!(line.is_some(), "log should contain the upload line: {text}");
    assert!(line.unwrap().starts_with('['));
}

#[tokio::test]
async fn failed_upload_is_recorded_in_the_event_log() {
    let t = test_app().await;

    t.app
        .clone()
        .oneshot(post_json("/upload", json!({"image": "%%%"})))
        .await
        .unwrap();

    let response = t.app.oneshot(get("/view-logs")).await.unwrap();
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.contains("Upload error:"), "got: {text}");
}

#[tokio::test]
async fn receive_demand_sets_the_flag_and_acknowledges() {
    let t = test_app().await;
    assert!(!t.state.demand.get().await);

    let response = t
        .app
        .clone()
        .oneshot(post_json("/receive-demand", json!({"demand": true})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let ack: Ack = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(ack.status, "ok");
    assert!(t.state.demand.get().await);

    // Missing field defaults to false
    let response = t
        .app
        .oneshot(post_json("/receive-demand", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!t.state.demand.get().await);
}
