//! HTTP API module
//!
//! Editor integrations report focus, save, close and shutdown events here
//! and poll the totals for display.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/focus", post(focus_handler))
        .route("/save", post(save_handler))
        .route("/close", post(close_handler))
        .route("/workspace-changed", post(workspace_changed_handler))
        .route("/shutdown", post(shutdown_handler))
        .route("/status", get(status_handler))
        .route("/time-spent", get(time_spent_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
