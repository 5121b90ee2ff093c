//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod alert_dispatch;
pub mod countdown_timer;

// Re-export main functions
pub use alert_dispatch::alert_dispatch_task;
pub use countdown_timer::countdown_timer_task;
