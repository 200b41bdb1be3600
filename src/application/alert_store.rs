// Alert lifecycle store - Reconciles refreshed alerts with user actions
use crate::domain::alert::{Alert, AlertSignature, Severity};
use crate::domain::geo::CoordinateBucket;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Conditions seen for the first time (or again after a dismissal)
    pub inserted: usize,
    /// Conditions already tracked by an active alert
    pub refreshed: usize,
}

/// Long-lived alert history for the session.
///
/// Alerts are kept in insertion order. `open` maps each condition signature to the
/// one alert still active for it, so a refresh reporting the same condition folds
/// into that alert instead of creating another. Flags change only through
/// `acknowledge` and `dismiss`.
///
/// Nothing is evicted: dismissed alerts and alerts for earlier selections stay for
/// the lifetime of the process so `get` can still answer for them.
#[derive(Debug, Default)]
pub struct AlertLifecycleStore {
    alerts: Vec<Alert>,
    index: HashMap<String, usize>,
    open: HashMap<AlertSignature, usize>,
}

impl AlertLifecycleStore {
    pub fn merge(&mut self, new_alerts: Vec<Alert>) -> MergeSummary {
        let mut summary = MergeSummary::default();

        for alert in new_alerts {
            let signature = alert.signature();

            if let Some(&position) = self.open.get(&signature) {
                // Keep id, timestamp and flags; only the reading moves
                self.alerts[position].message = alert.message;
                summary.refreshed += 1;
                continue;
            }

            if self.index.contains_key(&alert.id) {
                tracing::warn!("Ignoring alert with reused id {}", alert.id);
                continue;
            }

            let position = self.alerts.len();
            self.index.insert(alert.id.clone(), position);
            if alert.is_active {
                self.open.insert(signature, position);
            }
            self.alerts.push(alert);
            summary.inserted += 1;
        }

        summary
    }

    /// Returns false when nothing changed (unknown id or already acknowledged)
    pub fn acknowledge(&mut self, alert_id: &str) -> bool {
        let Some(&position) = self.index.get(alert_id) else {
            tracing::debug!("Acknowledge for unknown alert {}", alert_id);
            return false;
        };

        let alert = &mut self.alerts[position];
        if alert.acknowledged {
            return false;
        }
        alert.acknowledged = true;
        true
    }

    /// Returns false when nothing changed (unknown id or already dismissed)
    pub fn dismiss(&mut self, alert_id: &str) -> bool {
        let Some(&position) = self.index.get(alert_id) else {
            tracing::debug!("Dismiss for unknown alert {}", alert_id);
            return false;
        };

        let alert = &mut self.alerts[position];
        if !alert.is_active {
            return false;
        }
        alert.is_active = false;

        let signature = alert.signature();
        if self.open.get(&signature) == Some(&position) {
            self.open.remove(&signature);
        }
        true
    }

    /// Actionable alerts, newest first; equal timestamps keep insertion order
    pub fn active_alerts(&self) -> Vec<Alert> {
        let mut active: Vec<Alert> = self
            .alerts
            .iter()
            .filter(|alert| alert.is_actionable())
            .cloned()
            .collect();
        active.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        active
    }

    /// Actionable alerts raised within one coordinate bucket, newest first
    pub fn active_alerts_at(&self, bucket: CoordinateBucket) -> Vec<Alert> {
        let mut active = self.active_alerts();
        active.retain(|alert| alert.coordinates.bucket() == bucket);
        active
    }

    pub fn critical_count(&self) -> usize {
        self.alerts
            .iter()
            .filter(|alert| alert.is_actionable() && alert.severity == Severity::Critical)
            .count()
    }

    pub fn get(&self, alert_id: &str) -> Option<&Alert> {
        self.index.get(alert_id).map(|&position| &self.alerts[position])
    }

    /// Full history in insertion order, dismissed alerts included
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }
}
