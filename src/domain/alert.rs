// Alert domain model
use super::geo::{CoordinateBucket, Coordinates};
use super::risk::HazardKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub hazard: HazardKind,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub coordinates: Coordinates,
    pub location: String,
    pub is_active: bool,
    pub acknowledged: bool,
}

/// Identity of the condition an alert reports, independent of when it fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertSignature {
    pub hazard: HazardKind,
    pub bucket: CoordinateBucket,
    pub severity: Severity,
}

impl Alert {
    /// Still needs the user's attention
    pub fn is_actionable(&self) -> bool {
        self.is_active && !self.acknowledged
    }

    pub fn signature(&self) -> AlertSignature {
        AlertSignature {
            hazard: self.hazard,
            bucket: self.coordinates.bucket(),
            severity: self.severity,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_alert(id: &str, hazard: HazardKind, severity: Severity, timestamp: DateTime<Utc>) -> Alert {
    let coordinates = Coordinates::new(28.6, 77.2).unwrap();
    Alert {
        id: id.to_string(),
        hazard,
        title: format!("{} alert", hazard.slug()),
        message: "test".to_string(),
        severity,
        timestamp,
        coordinates,
        location: coordinates.label(),
        is_active: true,
        acknowledged: false,
    }
}
