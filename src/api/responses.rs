//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    services::EmergencyContact,
    state::{AlertRecord, AlertSnapshot, AlertUpdate, CountdownState, ResolutionFeedback},
};

/// API response structure for alert operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// "applied" or "ignored"
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub alert: AlertSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, alert: AlertSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            alert,
        }
    }

    /// Create a response for a transition that took effect
    pub fn applied(message: String, alert: AlertSnapshot) -> Self {
        Self::new("applied".to_string(), message, alert)
    }

    /// Create a response for an operation that was not valid from the current phase
    pub fn ignored(message: String, alert: AlertSnapshot) -> Self {
        Self::new("ignored".to_string(), message, alert)
    }

    /// Build the response for an alert update
    pub fn from_update(operation: &str, update: AlertUpdate) -> Self {
        if update.transition.is_applied() {
            let message = format!("Alert {}: {}", operation, update.alert.phase);
            Self::applied(message, update.alert)
        } else {
            let message = format!("Cannot {} while alert is {}", operation, update.alert.phase);
            Self::ignored(message, update.alert)
        }
    }
}

/// Body of POST /alert/resolve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub feedback: ResolutionFeedback,
    #[serde(default)]
    pub observation: Option<String>,
}

/// Current alert with its countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertResponse {
    pub alert: AlertSnapshot,
    pub countdown: CountdownState,
}

/// Archived alerts of this session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub alerts: Vec<AlertRecord>,
}

/// Configured emergency contacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactsResponse {
    pub contacts: Vec<EmergencyContact>,
}

/// Status response with countdown and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub alert: AlertSnapshot,
    pub countdown_active: bool,
    pub countdown_remaining_seconds: Option<u32>,
    pub history_count: usize,
    pub errors: Vec<String>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
