//! External collaborator module
//!
//! Emergency contacts and the notifier that delivers a sent alert to them.

pub mod contacts;
pub mod notifier;

// Re-export main types
pub use contacts::{EmergencyContact, Location};
pub use notifier::{alert_message, AlertNotifier, LogNotifier};
