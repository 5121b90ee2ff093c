//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

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
        .route("/alert", get(alert_handler))
        .route("/alert/trigger", post(trigger_handler))
        .route("/alert/send-now", post(send_now_handler))
        .route("/alert/cancel", post(cancel_handler))
        .route("/alert/resolve", post(resolve_handler))
        .route("/alert/dismiss", post(dismiss_handler))
        .route("/history", get(history_handler))
        .route("/contacts", get(contacts_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
