//! Emergency alert lifecycle
//!
//! One [`AlertLifecycle`] tracks a single SOS from trigger through
//! resolution:
//!
//! ```text
//!           trigger()                tick() (count == 0)             resolve(f)
//!  Idle ─────────────► CountingDown ─────────────────────► Sent ─────────────► Resolved
//!                          │   │          send_now()         ▲
//!                          │   └─────────────────────────────┘
//!                          │ cancel()
//!                          ▼
//!                      Cancelled
//! ```
//!
//! Cancelled and Resolved are terminal. A new instance is created for each
//! subsequent emergency.
//!
//! Operations never fail. A call that is not valid from the current phase
//! leaves the state untouched and returns [`Transition::Ignored`], so the
//! caller decides whether to log it. Time only enters through the `now`
//! argument, which keeps the lifecycle deterministic.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Countdown length used when nothing else is configured
pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 30;

/// Discrete state of an alert instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPhase {
    Idle,
    CountingDown,
    Sent,
    Cancelled,
    Resolved,
}

impl AlertPhase {
    /// Cancelled and Resolved end an instance
    pub fn is_terminal(self) -> bool {
        matches!(self, AlertPhase::Cancelled | AlertPhase::Resolved)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertPhase::Idle => "idle",
            AlertPhase::CountingDown => "counting_down",
            AlertPhase::Sent => "sent",
            AlertPhase::Cancelled => "cancelled",
            AlertPhase::Resolved => "resolved",
        }
    }
}

impl fmt::Display for AlertPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-supplied outcome after an alert has been sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionFeedback {
    Safe,
    StillNeedsHelp,
    FalseAlarm,
}

/// How an alert reached the Sent phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendReason {
    /// The countdown ran out
    CountdownElapsed,
    /// The user skipped the rest of the countdown
    SentManually,
}

/// Outcome of a lifecycle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State changed. `from == to` for a tick that did not finish the countdown.
    Applied { from: AlertPhase, to: AlertPhase },
    /// Not valid from `phase`; nothing changed.
    Ignored { phase: AlertPhase },
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied { .. })
    }

    /// True when the operation moved the alert into a different phase
    pub fn changed_phase(&self) -> bool {
        matches!(self, Transition::Applied { from, to } if from != to)
    }

    /// Phase the alert is in after the operation
    pub fn phase(&self) -> AlertPhase {
        match *self {
            Transition::Applied { to, .. } => to,
            Transition::Ignored { phase } => phase,
        }
    }
}

/// Serializable view of an alert instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSnapshot {
    pub id: Uuid,
    pub phase: AlertPhase,
    pub seconds_remaining: u32,
    pub countdown_seconds: u32,
    pub triggered_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub send_reason: Option<SendReason>,
    pub resolution_feedback: Option<ResolutionFeedback>,
    pub observation: Option<String>,
}

/// State machine for a single emergency alert
#[derive(Debug, Clone)]
pub struct AlertLifecycle {
    id: Uuid,
    phase: AlertPhase,
    seconds_remaining: u32,
    countdown_seconds: u32,
    triggered_at: Option<DateTime<Utc>>,
    sent_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    send_reason: Option<SendReason>,
    resolution_feedback: Option<ResolutionFeedback>,
    observation: Option<String>,
}

impl AlertLifecycle {
    /// Create an idle alert with the given countdown length (at least one second)
    pub fn new(countdown_seconds: u32) -> Self {
        let countdown_seconds = countdown_seconds.max(1);
        Self {
            id: Uuid::new_v4(),
            phase: AlertPhase::Idle,
            seconds_remaining: countdown_seconds,
            countdown_seconds,
            triggered_at: None,
            sent_at: None,
            finished_at: None,
            send_reason: None,
            resolution_feedback: None,
            observation: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> AlertPhase {
        self.phase
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn countdown_seconds(&self) -> u32 {
        self.countdown_seconds
    }

    pub fn triggered_at(&self) -> Option<DateTime<Utc>> {
        self.triggered_at
    }

    pub fn resolution_feedback(&self) -> Option<ResolutionFeedback> {
        self.resolution_feedback
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Start the countdown. Only valid from Idle.
    pub fn trigger(&mut self, now: DateTime<Utc>) -> Transition {
        if self.phase != AlertPhase::Idle {
            return self.ignored();
        }

        self.seconds_remaining = self.countdown_seconds;
        self.triggered_at = Some(now);
        self.move_to(AlertPhase::CountingDown)
    }

    /// Apply one countdown tick. Reaching zero sends the alert.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Transition {
        if self.phase != AlertPhase::CountingDown {
            return self.ignored();
        }

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.mark_sent(SendReason::CountdownElapsed, now)
        } else {
            Transition::Applied {
                from: AlertPhase::CountingDown,
                to: AlertPhase::CountingDown,
            }
        }
    }

    /// Skip the rest of the countdown and send immediately
    pub fn send_now(&mut self, now: DateTime<Utc>) -> Transition {
        if self.phase != AlertPhase::CountingDown {
            return self.ignored();
        }

        self.seconds_remaining = 0;
        self.mark_sent(SendReason::SentManually, now)
    }

    /// Abort a running countdown. An alert that was already sent stays sent.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Transition {
        if self.phase != AlertPhase::CountingDown {
            return self.ignored();
        }

        self.finished_at = Some(now);
        self.move_to(AlertPhase::Cancelled)
    }

    /// Record how a sent alert ended
    pub fn resolve(
        &mut self,
        feedback: ResolutionFeedback,
        observation: Option<String>,
        now: DateTime<Utc>,
    ) -> Transition {
        if self.phase != AlertPhase::Sent {
            return self.ignored();
        }

        self.resolution_feedback = Some(feedback);
        self.observation = observation.filter(|text| !text.trim().is_empty());
        self.finished_at = Some(now);
        self.move_to(AlertPhase::Resolved)
    }

    pub fn snapshot(&self) -> AlertSnapshot {
        AlertSnapshot {
            id: self.id,
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            countdown_seconds: self.countdown_seconds,
            triggered_at: self.triggered_at,
            sent_at: self.sent_at,
            finished_at: self.finished_at,
            send_reason: self.send_reason,
            resolution_feedback: self.resolution_feedback,
            observation: self.observation.clone(),
        }
    }

    fn mark_sent(&mut self, reason: SendReason, now: DateTime<Utc>) -> Transition {
        self.sent_at = Some(now);
        self.send_reason = Some(reason);
        self.move_to(AlertPhase::Sent)
    }

    fn move_to(&mut self, to: AlertPhase) -> Transition {
        let from = self.phase;
        self.phase = to;
        Transition::Applied { from, to }
    }

    fn ignored(&self) -> Transition {
        Transition::Ignored { phase: self.phase }
    }
}

impl Default for AlertLifecycle {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECONDS)
    }
}
