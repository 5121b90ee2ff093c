//! Countdown timer background task

use std::sync::Arc;

use tokio::{
    sync::broadcast::{self, error::RecvError},
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::state::{AlertPhase, AlertSnapshot, AppState, Transition};

/// Why a countdown loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountdownEnd {
    /// The alert left CountingDown (sent, cancelled or replaced)
    Finished,
    /// The change channel closed; the task should exit
    ChannelClosed,
}

/// Background task that ticks the current alert while it counts down.
///
/// Phase change notifications are only wake-ups; the alert held by
/// [`AppState`] decides whether a countdown should run.
pub async fn countdown_timer_task(state: Arc<AppState>) {
    info!("Starting countdown timer task");

    let mut change_rx = state.alert_change_tx.subscribe();

    loop {
        // An alert may have been triggered before we subscribed
        match counting_alert(&state) {
            Some(alert_id) => {
                if run_countdown(&state, alert_id, &mut change_rx).await == CountdownEnd::ChannelClosed {
                    break;
                }
                continue;
            }
            None => debug!("No alert counting down, waiting for next change"),
        }

        // Wait for a phase change notification
        match change_rx.recv().await {
            Ok(snapshot) => {
                debug!("Timer task received alert change: {} is {}", snapshot.id, snapshot.phase);
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Timer task lagged behind by {} alert changes", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("Countdown timer task stopped");
}

/// Id of the current alert if it is counting down
fn counting_alert(state: &AppState) -> Option<Uuid> {
    match state.get_alert() {
        Ok(alert) if alert.phase == AlertPhase::CountingDown => Some(alert.id),
        Ok(_) => None,
        Err(e) => {
            error!("Failed to read alert state: {}", e);
            None
        }
    }
}

async fn run_countdown(
    state: &AppState,
    alert_id: Uuid,
    change_rx: &mut broadcast::Receiver<AlertSnapshot>,
) -> CountdownEnd {
    let period = state.config.tick_interval;
    info!("Countdown started for alert {} ({:?} per tick)", alert_id, period);

    // First tick one period from now, not immediately
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            // Handle pending phase changes before the next tick
            biased;

            changed = change_rx.recv() => match changed {
                Ok(snapshot) if snapshot.id == alert_id && snapshot.phase == AlertPhase::CountingDown => {
                    debug!("Alert {} still counting down", alert_id);
                }
                Ok(snapshot) => {
                    info!("Alert {} is {}, stopping countdown for {}", snapshot.id, snapshot.phase, alert_id);
                    return CountdownEnd::Finished;
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Countdown lagged behind by {} alert changes", skipped);
                    if counting_alert(state) != Some(alert_id) {
                        return CountdownEnd::Finished;
                    }
                }
                Err(RecvError::Closed) => return CountdownEnd::ChannelClosed,
            },

            _ = interval.tick() => match state.tick_alert(alert_id) {
                Ok(update) => match update.transition {
                    Transition::Applied { to: AlertPhase::Sent, .. } => {
                        info!("Countdown elapsed, alert {} sent", alert_id);
                        return CountdownEnd::Finished;
                    }
                    Transition::Applied { .. } => {
                        debug!("Alert {} sends in {}s", alert_id, update.alert.seconds_remaining);
                    }
                    Transition::Ignored { phase } => {
                        debug!("Alert {} no longer counting down ({}), stopping", alert_id, phase);
                        return CountdownEnd::Finished;
                    }
                },
                Err(e) => {
                    error!("Failed to tick alert {}: {}", alert_id, e);
                    return CountdownEnd::Finished;
                }
            },
        }
    }
}
