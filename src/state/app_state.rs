//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{
    alert::{AlertLifecycle, AlertPhase, AlertSnapshot, ResolutionFeedback, Transition},
    AlertHistory, AlertRecord, CountdownState,
};
use crate::{
    config::AppConfig,
    error::StateError,
    utils::{Clock, SystemClock},
};

/// Result of an operation on the current alert
#[derive(Debug, Clone)]
pub struct AlertUpdate {
    pub transition: Transition,
    /// Alert as it is after the operation
    pub alert: AlertSnapshot,
}

/// Main application state that owns the current alert and its history
#[derive(Debug)]
pub struct AppState {
    /// Alert for the current session; replaced when a new emergency starts
    alert: Mutex<AlertLifecycle>,
    /// Finished alerts of this session
    history: Mutex<AlertHistory>,
    /// Errors surfaced to clients (notifier failures)
    errors: Mutex<Vec<String>>,
    clock: Arc<dyn Clock>,
    pub config: AppConfig,
    /// Server metadata
    pub start_time: Instant,
    /// Last action tracking
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
    /// Phase changes, consumed by the countdown timer and the dispatcher
    pub alert_change_tx: broadcast::Sender<AlertSnapshot>,
    /// Countdown display updates
    pub countdown_tx: watch::Sender<CountdownState>,
    /// Keep the receiver alive to prevent channel closure
    _countdown_rx: watch::Receiver<CountdownState>,
}

impl AppState {
    /// Create state backed by the system clock
    pub fn new(config: AppConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        let (alert_change_tx, _) = broadcast::channel(100);
        let (countdown_tx, countdown_rx) = watch::channel(CountdownState::inactive());

        Self {
            alert: Mutex::new(AlertLifecycle::new(config.countdown_seconds)),
            history: Mutex::new(AlertHistory::new(config.history_limit)),
            errors: Mutex::new(Vec::new()),
            clock,
            config,
            start_time: Instant::now(),
            last_action: Mutex::new(None),
            alert_change_tx,
            countdown_tx,
            _countdown_rx: countdown_rx,
        }
    }

    /// Start a new emergency. A finished alert is archived and replaced first.
    pub fn trigger_alert(&self) -> Result<AlertUpdate, StateError> {
        self.apply("trigger", |alert, now| {
            if alert.is_terminal() {
                self.archive_and_reset(alert)?;
            }
            Ok(alert.trigger(now))
        })
    }

    /// Apply one countdown tick to the alert identified by `expected`
    pub fn tick_alert(&self, expected: Uuid) -> Result<AlertUpdate, StateError> {
        self.apply("tick", |alert, now| {
            if alert.id() != expected {
                return Ok(Transition::Ignored {
                    phase: alert.phase(),
                });
            }
            Ok(alert.tick(now))
        })
    }

    /// Send the alert without waiting for the countdown
    pub fn send_alert_now(&self) -> Result<AlertUpdate, StateError> {
        self.apply("send-now", |alert, now| Ok(alert.send_now(now)))
    }

    pub fn cancel_alert(&self) -> Result<AlertUpdate, StateError> {
        self.apply("cancel", |alert, now| Ok(alert.cancel(now)))
    }

    pub fn resolve_alert(
        &self,
        feedback: ResolutionFeedback,
        observation: Option<String>,
    ) -> Result<AlertUpdate, StateError> {
        self.apply("resolve", |alert, now| {
            Ok(alert.resolve(feedback, observation, now))
        })
    }

    /// Leave the resolution screen: archive a finished alert and start over idle.
    /// Ignored while an alert is counting down or waiting for feedback.
    pub fn dismiss_alert(&self) -> Result<AlertUpdate, StateError> {
        self.apply("dismiss", |alert, _now| {
            let from = alert.phase();
            if matches!(from, AlertPhase::CountingDown | AlertPhase::Sent) {
                return Ok(Transition::Ignored { phase: from });
            }
            self.archive_and_reset(alert)?;
            Ok(Transition::Applied {
                from,
                to: alert.phase(),
            })
        })
    }

    /// Run `op` on the current alert and publish the outcome.
    ///
    /// Notifications are sent while the alert lock is held so subscribers
    /// observe transitions in the order they happened.
    fn apply<F>(&self, action: &str, op: F) -> Result<AlertUpdate, StateError>
    where
        F: FnOnce(&mut AlertLifecycle, DateTime<Utc>) -> Result<Transition, StateError>,
    {
        let now = self.clock.now();
        let mut alert = self.alert.lock().map_err(StateError::poisoned("alert"))?;
        let id_before = alert.id();

        let transition = op(&mut *alert, now)?;
        let snapshot = alert.snapshot();

        match transition {
            Transition::Ignored { phase } if action == "tick" => {
                debug!("Tick ignored, alert {} is {}", snapshot.id, phase);
            }
            Transition::Ignored { phase } => {
                warn!("Ignoring {} while alert {} is {}", action, snapshot.id, phase);
            }
            Transition::Applied { from, to } => {
                self.publish_countdown(&snapshot);

                if from != to || snapshot.id != id_before {
                    info!("Alert {}: {} -> {} ({})", snapshot.id, from, to, action);
                    self.record_action(action, now);

                    // Notify phase change listeners (this drives the timer and dispatcher)
                    if let Err(e) = self.alert_change_tx.send(snapshot.clone()) {
                        debug!("No listeners for alert change: {}", e);
                    }
                } else {
                    debug!("Alert {} countdown at {}s", snapshot.id, snapshot.seconds_remaining);
                }
            }
        }
        drop(alert);

        Ok(AlertUpdate {
            transition,
            alert: snapshot,
        })
    }

    fn archive_and_reset(&self, alert: &mut AlertLifecycle) -> Result<(), StateError> {
        if alert.is_terminal() {
            let mut history = self.history.lock().map_err(StateError::poisoned("history"))?;
            if history.push(alert.snapshot()) {
                debug!("Archived alert {} ({} in history)", alert.id(), history.len());
            }
        }
        *alert = AlertLifecycle::new(self.config.countdown_seconds);
        Ok(())
    }

    fn publish_countdown(&self, snapshot: &AlertSnapshot) {
        let countdown = if snapshot.phase == AlertPhase::CountingDown {
            CountdownState::active(snapshot.seconds_remaining)
        } else {
            CountdownState::inactive()
        };

        // Notify countdown watchers
        if let Err(e) = self.countdown_tx.send(countdown) {
            warn!("Failed to send countdown update: {}", e);
        }
    }

    fn record_action(&self, action: &str, at: DateTime<Utc>) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some((action.to_string(), at));
        }
    }

    /// Get the current alert
    pub fn get_alert(&self) -> Result<AlertSnapshot, StateError> {
        self.alert
            .lock()
            .map(|alert| alert.snapshot())
            .map_err(StateError::poisoned("alert"))
    }

    /// Get archived alerts, oldest first
    pub fn get_history(&self) -> Result<Vec<AlertRecord>, StateError> {
        self.history
            .lock()
            .map(|history| history.records())
            .map_err(StateError::poisoned("history"))
    }

    pub fn get_countdown_state(&self) -> CountdownState {
        self.countdown_tx.borrow().clone()
    }

    /// Add an error to the visible error list
    pub fn add_error(&self, error: String) -> Result<(), StateError> {
        let mut errors = self.errors.lock().map_err(StateError::poisoned("errors"))?;
        warn!("Adding error to state: {}", error);
        errors.push(error);
        Ok(())
    }

    pub fn get_errors(&self) -> Result<Vec<String>, StateError> {
        self.errors
            .lock()
            .map(|errors| errors.clone())
            .map_err(StateError::poisoned("errors"))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        self.last_action
            .lock()
            .ok()
            .and_then(|last| last.clone())
            .map_or((None, None), |(action, at)| (Some(action), Some(at)))
    }
}
