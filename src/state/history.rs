//! Session history of finished alerts

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::alert::{AlertPhase, AlertSnapshot, ResolutionFeedback, SendReason};

/// One archived alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: Uuid,
    /// Final phase, Cancelled or Resolved
    pub outcome: AlertPhase,
    pub send_reason: Option<SendReason>,
    pub triggered_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub feedback: Option<ResolutionFeedback>,
    pub observation: Option<String>,
}

impl From<AlertSnapshot> for AlertRecord {
    fn from(snapshot: AlertSnapshot) -> Self {
        Self {
            id: snapshot.id,
            outcome: snapshot.phase,
            send_reason: snapshot.send_reason,
            triggered_at: snapshot.triggered_at,
            finished_at: snapshot.finished_at,
            feedback: snapshot.resolution_feedback,
            observation: snapshot.observation,
        }
    }
}

/// In-memory alert history, oldest entries dropped past `limit`
#[derive(Debug, Clone)]
pub struct AlertHistory {
    records: VecDeque<AlertRecord>,
    limit: usize,
}

impl AlertHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(limit.min(64)),
            limit,
        }
    }

    /// Archive a finished alert. Only terminal snapshots are kept.
    pub fn push(&mut self, snapshot: AlertSnapshot) -> bool {
        if !snapshot.phase.is_terminal() || self.limit == 0 {
            return false;
        }

        while self.records.len() >= self.limit {
            self.records.pop_front();
        }
        self.records.push_back(snapshot.into());
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records, oldest first
    pub fn records(&self) -> Vec<AlertRecord> {
        self.records.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::alert::AlertLifecycle;

    fn cancelled() -> AlertSnapshot {
        let mut alert = AlertLifecycle::default();
        alert.trigger(Utc::now());
        alert.cancel(Utc::now());
        alert.snapshot()
    }

    #[test]
    fn only_terminal_alerts_are_archived() {
        let mut history = AlertHistory::new(10);

        assert!(!history.push(AlertLifecycle::default().snapshot()));
        assert!(history.push(cancelled()));
        assert_eq!(history.len(), 1);
        assert_eq!(history.records()[0].outcome, AlertPhase::Cancelled);
    }

    #[test]
    fn oldest_record_is_dropped_at_limit() {
        let mut history = AlertHistory::new(2);
        let first = cancelled();
        let second = cancelled();
        let third = cancelled();

        history.push(first);
        history.push(second.clone());
        history.push(third.clone());

        let ids: Vec<Uuid> = history.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, third.id]);
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        let mut history = AlertHistory::new(0);
        assert!(!history.push(cancelled()));
        assert!(history.is_empty());
    }
}
