//! Contact notification for sent alerts

use async_trait::async_trait;
use tracing::{info, warn};

use super::contacts::{EmergencyContact, Location};
use crate::state::AlertSnapshot;

/// Delivers a sent alert to emergency contacts
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, alert: &AlertSnapshot, contacts: &[EmergencyContact]) -> Result<(), String>;
}

/// Text sent to every contact
pub fn alert_message(alert: &AlertSnapshot, location: Option<&Location>) -> String {
    let mut message = String::from("Emergency alert: I need help.");
    if let Some(location) = location {
        message.push_str(&format!(" I am here: {}", location.map_link()));
    }
    if let Some(triggered_at) = alert.triggered_at {
        message.push_str(&format!(" (triggered {})", triggered_at.format("%d/%m/%Y %H:%M:%S UTC")));
    }
    message
}

/// Notifier that only writes to the log
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    location: Option<Location>,
}

impl LogNotifier {
    pub fn new(location: Option<Location>) -> Self {
        Self { location }
    }
}

#[async_trait]
impl AlertNotifier for LogNotifier {
    async fn notify(&self, alert: &AlertSnapshot, contacts: &[EmergencyContact]) -> Result<(), String> {
        if contacts.is_empty() {
            warn!("Alert {} sent with no emergency contacts configured", alert.id);
            return Err("No emergency contacts configured".to_string());
        }

        let message = alert_message(alert, self.location.as_ref());
        for contact in contacts {
            info!("Notifying {} about alert {}: {}", contact, alert.id, message);
        }

        info!("Alert {} delivered to {} contacts", alert.id, contacts.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::state::AlertLifecycle;

    fn sent_alert() -> AlertSnapshot {
        let mut alert = AlertLifecycle::default();
        let at = Utc.with_ymd_and_hms(2025, 6, 15, 14, 30, 0).unwrap();
        alert.trigger(at);
        alert.send_now(at);
        alert.snapshot()
    }

    #[test]
    fn message_includes_location_and_time() {
        let location = Location {
            latitude: -15.7942,
            longitude: -47.8822,
        };
        let message = alert_message(&sent_alert(), Some(&location));

        assert!(message.contains("https://maps.google.com/?q=-15.7942,-47.8822"));
        assert!(message.contains("15/06/2025 14:30:00"));
    }

    #[tokio::test]
    async fn log_notifier_requires_contacts() {
        let notifier = LogNotifier::default();
        let alert = sent_alert();

        assert!(notifier.notify(&alert, &[]).await.is_err());
        assert!(notifier
            .notify(&alert, &EmergencyContact::defaults())
            .await
            .is_ok());
    }
}
