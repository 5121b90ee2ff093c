//! State management module
//!
//! This module contains the alert lifecycle and the shared application state.

pub mod alert;
pub mod app_state;
pub mod countdown_state;
pub mod history;

// Re-export main types
pub use alert::{AlertLifecycle, AlertPhase, AlertSnapshot, ResolutionFeedback, SendReason, Transition};
pub use app_state::{AlertUpdate, AppState};
pub use countdown_state::CountdownState;
pub use history::{AlertHistory, AlertRecord};
