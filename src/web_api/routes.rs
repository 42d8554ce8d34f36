//! API Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64::Engine;

use crate::error::{Error, Result};
use crate::models::{Ack, CheckResponse, DemandNotice, LatestImageResponse, UploadRequest};
use crate::state::AppState;

/// Create API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/upload", post(upload_image))
        .route("/check", get(check_status))
        .route("/get-latest-image", get(get_latest_image))
        .route("/view-image", get(view_image))
        .route("/view-logs", get(view_logs))
        .route("/receive-demand", post(receive_demand))
        .with_state(state)
}

/// Receive a base64-encoded image from the edge device and store it in the slot
async fn upload_image(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Json<Ack>> {
    let result = async {
        let Json(request) = payload
            .map_err(|e| Error::Validation(format!("Invalid upload request: {}", e)))?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(request.image.as_bytes())
            .map_err(|e| Error::Validation(format!("Invalid base64 image: {}", e)))?;

        state.slot.store(&bytes, &request.filename).await?;
        Ok(request.filename)
    }
    .await;

    match result {
        Ok(filename) => {
            state
                .event_log
                .record(&format!("Image received: {}", filename))
                .await;
            Ok(Json(Ack::ok("Image successfully received")))
        }
        Err(e) => {
            state
                .event_log
                .record(&format!("Upload error: {}", e))
                .await;
            Err(e)
        }
    }
}

/// Basic status plus whether an image is currently available
async fn check_status(State(state): State<AppState>) -> Json<CheckResponse> {
    Json(CheckResponse {
        status: "running".to_string(),
        image_available: state.slot.exists(),
    })
}

/// The stored image re-encoded as base64, for verifying what the relay holds
async fn get_latest_image(State(state): State<AppState>) -> Result<Json<LatestImageResponse>> {
    let bytes = state.slot.read().await?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);

    Ok(Json(LatestImageResponse {
        status: "ok".to_string(),
        filename: state.slot.filename().await,
        image_base64: encoded,
    }))
}

/// The stored image as raw bytes for direct browser rendering
async fn view_image(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let bytes = state.slot.read().await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

/// The accumulated event log verbatim
async fn view_logs(State(state): State<AppState>) -> String {
    match state.event_log.read_all().await {
        Some(text) => text,
        None => "No logs available.".to_string(),
    }
}

/// Inbound demand notification from the remote peer
///
/// Only sets the flag and acknowledges; the delivery loop performs the
/// actual send on its next tick.
async fn receive_demand(
    State(state): State<AppState>,
    payload: std::result::Result<Json<DemandNotice>, JsonRejection>,
) -> Result<Json<Ack>> {
    let Json(notice) =
        payload.map_err(|e| Error::Validation(format!("Invalid demand notification: {}", e)))?;

    let previous = state.demand.set(notice.demand).await;
    state
        .event_log
        .record(&format!(
            "Demand notification received: {} (was {})",
            notice.demand, previous
        ))
        .await;

    Ok(Json(Ack::ok(format!("Demand set to {}", notice.demand))))
}
