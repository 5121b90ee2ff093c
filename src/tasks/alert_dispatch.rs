//! Alert dispatch background task

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    services::AlertNotifier,
    state::{AlertPhase, AlertSnapshot, AppState},
};

/// Background task that notifies contacts once for every alert that is sent
pub async fn alert_dispatch_task(state: Arc<AppState>, notifier: Arc<dyn AlertNotifier>) {
    info!("Starting alert dispatch task");

    let mut change_rx = state.alert_change_tx.subscribe();
    let mut last_dispatched: Option<Uuid> = None;

    // An alert may have been sent before we subscribed
    if let Ok(current) = state.get_alert() {
        dispatch_if_sent(&state, notifier.as_ref(), &current, &mut last_dispatched).await;
    }

    loop {
        match change_rx.recv().await {
            Ok(snapshot) => {
                dispatch_if_sent(&state, notifier.as_ref(), &snapshot, &mut last_dispatched).await;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Dispatch task lagged behind by {} alert changes", skipped);
                match state.get_alert() {
                    Ok(current) => {
                        dispatch_if_sent(&state, notifier.as_ref(), &current, &mut last_dispatched).await;
                    }
                    Err(e) => error!("Failed to read alert state: {}", e),
                }
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("Alert dispatch task stopped");
}

/// Notify contacts if `alert` has been sent and was not dispatched yet
async fn dispatch_if_sent(
    state: &AppState,
    notifier: &dyn AlertNotifier,
    alert: &AlertSnapshot,
    last_dispatched: &mut Option<Uuid>,
) {
    // A lagged receiver may only see the alert after it was resolved
    let was_sent = alert.phase == AlertPhase::Sent
        || (alert.phase == AlertPhase::Resolved && alert.sent_at.is_some());
    if !was_sent || *last_dispatched == Some(alert.id) {
        return;
    }
    *last_dispatched = Some(alert.id);

    info!("Dispatching alert {} to {} contacts", alert.id, state.config.contacts.len());
    if let Err(e) = notifier.notify(alert, &state.config.contacts).await {
        error!("Failed to notify contacts for alert {}: {}", alert.id, e);
        if let Err(e) = state.add_error(format!("Alert notification failed: {}", e)) {
            error!("Failed to add notification error: {}", e);
        }
    }
}
