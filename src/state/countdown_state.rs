//! Countdown display state

use serde::{Deserialize, Serialize};

/// Countdown as shown to the user while an alert is pending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    pub active: bool,
    pub remaining_seconds: Option<u32>,
}

impl CountdownState {
    /// Create an active countdown with remaining seconds
    pub fn active(remaining_seconds: u32) -> Self {
        Self {
            active: true,
            remaining_seconds: Some(remaining_seconds),
        }
    }

    /// Create an inactive countdown
    pub fn inactive() -> Self {
        Self {
            active: false,
            remaining_seconds: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Remaining seconds, only while the countdown runs
    pub fn remaining_seconds(&self) -> Option<u32> {
        if self.active {
            self.remaining_seconds
        } else {
            None
        }
    }
}

impl Default for CountdownState {
    fn default() -> Self {
        Self::inactive()
    }
}
