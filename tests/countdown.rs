use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use segura_alert::{
    services::{AlertNotifier, EmergencyContact},
    state::{AlertPhase, AlertSnapshot, AppState},
    tasks::{alert_dispatch_task, countdown_timer_task},
    AppConfig,
};
use tokio::time::sleep;
use uuid::Uuid;

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Uuid>>,
}

impl RecordingNotifier {
    fn sent(&self) -> Vec<Uuid> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertNotifier for RecordingNotifier {
    async fn notify(&self, alert: &AlertSnapshot, _contacts: &[EmergencyContact]) -> Result<(), String> {
        self.sent.lock().unwrap().push(alert.id);
        Ok(())
    }
}

struct FailingNotifier;

#[async_trait]
impl AlertNotifier for FailingNotifier {
    async fn notify(&self, _alert: &AlertSnapshot, _contacts: &[EmergencyContact]) -> Result<(), String> {
        Err("gateway unreachable".to_string())
    }
}

async fn start(notifier: Arc<dyn AlertNotifier>) -> Arc<AppState> {
    let state = Arc::new(AppState::new(AppConfig::default()));
    tokio::spawn(countdown_timer_task(Arc::clone(&state)));
    tokio::spawn(alert_dispatch_task(Arc::clone(&state), notifier));
    tokio::task::yield_now().await;
    state
}

#[tokio::test(start_paused = true)]
async fn countdown_sends_alert_and_notifies_once() {
    let notifier = Arc::new(RecordingNotifier::default());
    let state = start(notifier.clone()).await;

    let alert_id = state.trigger_alert().unwrap().alert.id;

    sleep(Duration::from_millis(29_500)).await;
    let alert = state.get_alert().unwrap();
    assert_eq!(alert.phase, AlertPhase::CountingDown);
    assert_eq!(alert.seconds_remaining, 1);
    assert_eq!(state.get_countdown_state().remaining_seconds(), Some(1));
    assert!(notifier.sent().is_empty());

    sleep(Duration::from_secs(1)).await;
    let alert = state.get_alert().unwrap();
    assert_eq!(alert.phase, AlertPhase::Sent);
    assert_eq!(alert.seconds_remaining, 0);
    assert!(!state.get_countdown_state().is_active());

    sleep(Duration::from_secs(30)).await;
    assert_eq!(notifier.sent(), vec![alert_id]);
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_the_timer() {
    let notifier = Arc::new(RecordingNotifier::default());
    let state = start(notifier.clone()).await;

    state.trigger_alert().unwrap();
    sleep(Duration::from_millis(5_500)).await;

    let cancelled = state.cancel_alert().unwrap().alert;
    assert_eq!(cancelled.phase, AlertPhase::Cancelled);
    assert_eq!(cancelled.seconds_remaining, 25);

    sleep(Duration::from_secs(60)).await;
    let alert = state.get_alert().unwrap();
    assert_eq!(alert.phase, AlertPhase::Cancelled);
    assert_eq!(alert.seconds_remaining, 25);
    assert!(!state.get_countdown_state().is_active());
    assert!(notifier.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn send_now_notifies_without_waiting() {
    let notifier = Arc::new(RecordingNotifier::default());
    let state = start(notifier.clone()).await;

    state.trigger_alert().unwrap();
    sleep(Duration::from_millis(2_500)).await;
    let alert_id = state.send_alert_now().unwrap().alert.id;

    sleep(Duration::from_millis(100)).await;
    assert_eq!(notifier.sent(), vec![alert_id]);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(state.get_alert().unwrap().phase, AlertPhase::Sent);
    assert_eq!(notifier.sent(), vec![alert_id]);
}

#[tokio::test(start_paused = true)]
async fn new_emergency_after_cancel_counts_down_again() {
    let notifier = Arc::new(RecordingNotifier::default());
    let state = start(notifier.clone()).await;

    let first = state.trigger_alert().unwrap().alert.id;
    sleep(Duration::from_millis(3_500)).await;
    state.cancel_alert().unwrap();

    let second = state.trigger_alert().unwrap().alert.id;
    assert_ne!(first, second);

    sleep(Duration::from_millis(10_500)).await;
    assert_eq!(state.get_alert().unwrap().seconds_remaining, 20);

    sleep(Duration::from_secs(20)).await;
    assert_eq!(state.get_alert().unwrap().phase, AlertPhase::Sent);
    assert_eq!(notifier.sent(), vec![second]);

    let history = state.get_history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, first);
}

#[tokio::test(start_paused = true)]
async fn notifier_failure_is_reported_in_errors() {
    let state = start(Arc::new(FailingNotifier)).await;

    state.trigger_alert().unwrap();
    state.send_alert_now().unwrap();
    sleep(Duration::from_millis(100)).await;

    let errors = state.get_errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("gateway unreachable"));
}
