//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::state::{AppState, TrackerSnapshot};
use super::responses::{
    ApiResponse, FocusRequest, HealthResponse, StatusResponse, TimeSpentResponse,
};

fn event_response(
    result: Result<TrackerSnapshot, String>,
    action: &str,
    message: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(snapshot) => Ok(Json(ApiResponse::from_snapshot(message, &snapshot))),
        Err(e) => {
            error!("Failed to handle {} event: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /focus - Window gained or lost focus
pub async fn focus_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FocusRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let message = if request.focused {
        "Focus gained, tracking active time"
    } else {
        "Focus lost, tracking other time"
    };
    event_response(state.focus_changed(request.focused), "focus", message)
}

/// Handle POST /save - Document saved checkpoint
pub async fn save_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    event_response(state.document_saved(), "save", "Checkpoint saved")
}

/// Handle POST /close - Document closed checkpoint
pub async fn close_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    event_response(state.document_closed(), "close", "Checkpoint saved")
}

/// Handle POST /workspace-changed - Workspace folders changed checkpoint
pub async fn workspace_changed_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    event_response(state.workspace_changed(), "workspace-changed", "Checkpoint saved")
}

/// Handle POST /shutdown - Final flush, then stop the daemon
pub async fn shutdown_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.request_shutdown() {
        Ok(snapshot) => {
            info!("Shutdown endpoint called - tracker flushed");
            Ok(Json(ApiResponse::stopped(
                "Tracker flushed, shutting down".to_string(),
                snapshot.totals,
            )))
        }
        Err(e) => {
            error!("Failed to shut down tracker: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return current tracker status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = match state.get_snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get tracker snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        totals: snapshot.totals,
        coder_type: snapshot.coder_type,
        status_label: snapshot.label.to_string(),
        interval: snapshot.interval,
        persistence_enabled: snapshot.persistence_enabled,
        data_file: snapshot.data_file,
        last_updated: snapshot.last_updated,
        shut_down: snapshot.shut_down,
        notices: state.notices.recent(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /time-spent - "Show time spent" summary
pub async fn time_spent_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimeSpentResponse>, StatusCode> {
    match state.get_snapshot() {
        Ok(snapshot) => Ok(Json(TimeSpentResponse::from_active_seconds(
            snapshot.totals.active_seconds,
        ))),
        Err(e) => {
            error!("Failed to get tracker snapshot: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
