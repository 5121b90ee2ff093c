//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{error, info};

use super::responses::{
    AlertResponse, ApiResponse, ContactsResponse, HealthResponse, HistoryResponse, ResolveRequest,
    StatusResponse,
};
use crate::{
    error::StateError,
    state::{AlertUpdate, AppState},
};

/// Turn an alert operation result into a response
fn respond(operation: &str, result: Result<AlertUpdate, StateError>) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(update) => {
            if update.transition.is_applied() {
                info!("{} endpoint called - alert is {}", operation, update.alert.phase);
            }
            Ok(Json(ApiResponse::from_update(operation, update)))
        }
        Err(e) => {
            error!("Failed to {} alert: {}", operation, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /alert/trigger - Start the SOS countdown
pub async fn trigger_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("trigger", state.trigger_alert())
}

/// Handle POST /alert/send-now - Send without waiting for the countdown
pub async fn send_now_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("send", state.send_alert_now())
}

/// Handle POST /alert/cancel - Abort the countdown
pub async fn cancel_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("cancel", state.cancel_alert())
}

/// Handle POST /alert/resolve - Record feedback for a sent alert
pub async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond("resolve", state.resolve_alert(request.feedback, request.observation))
}

/// Handle POST /alert/dismiss - Leave the resolution screen
pub async fn dismiss_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("dismiss", state.dismiss_alert())
}

/// Handle GET /alert - Return the current alert and countdown
pub async fn alert_handler(State(state): State<Arc<AppState>>) -> Result<Json<AlertResponse>, StatusCode> {
    let alert = state.get_alert().map_err(|e| {
        error!("Failed to get alert: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(AlertResponse {
        alert,
        countdown: state.get_countdown_state(),
    }))
}

/// Handle GET /history - Return finished alerts of this session
pub async fn history_handler(State(state): State<Arc<AppState>>) -> Result<Json<HistoryResponse>, StatusCode> {
    let alerts = state.get_history().map_err(|e| {
        error!("Failed to get alert history: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(HistoryResponse {
        count: alerts.len(),
        alerts,
    }))
}

/// Handle GET /contacts - Return configured emergency contacts
pub async fn contacts_handler(State(state): State<Arc<AppState>>) -> Json<ContactsResponse> {
    Json(ContactsResponse {
        contacts: state.config.contacts.clone(),
    })
}

/// Handle GET /status - Return current status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let alert = match state.get_alert() {
        Ok(a) => a,
        Err(e) => {
            error!("Failed to get alert: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let history_count = match state.get_history() {
        Ok(h) => h.len(),
        Err(e) => {
            error!("Failed to get alert history: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let errors = match state.get_errors() {
        Ok(errors) => errors,
        Err(e) => {
            error!("Failed to get errors: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let countdown = state.get_countdown_state();
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        alert,
        countdown_active: countdown.is_active(),
        countdown_remaining_seconds: countdown.remaining_seconds(),
        history_count,
        errors,
        uptime: state.get_uptime(),
        port: state.config.port,
        host: state.config.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
