//! Conversion run API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use reelcache_core::PoolStatus;

use super::handlers::ErrorResponse;
use crate::state::{AppState, LastRun};

// ============================================================================
// Response Types
// ============================================================================

/// Conversion status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Whether a run is in progress
    pub running: bool,
    /// Worker pool counters since startup
    pub pool: PoolStatus,
    /// Most recent finished run, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<LastRun>,
}

/// Simple message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Get conversion status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: state.is_running(),
        pool: state.pool_status(),
        last_run: state.last_run().await,
    })
}

/// Start a conversion run in the background
pub async fn start_conversion(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.start_run() {
        Some(_) => (
            StatusCode::ACCEPTED,
            Json(MessageResponse {
                message: "Conversion started".to_string(),
            }),
        )
            .into_response(),
        None => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new("A conversion run is already in progress")),
        )
            .into_response(),
    }
}
