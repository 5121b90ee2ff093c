//! Segura Alert - A state-managed HTTP server for emergency alerts
//!
//! This library tracks the lifecycle of a personal-safety SOS: trigger,
//! countdown, cancel or send, and resolution feedback. A background timer
//! drives the countdown and a notifier delivers sent alerts to emergency
//! contacts.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::{AppConfig, Config};
pub use error::StateError;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
