// Alert generator - Threshold policy turning risk scores into alerts
use crate::domain::alert::{Alert, Severity};
use crate::domain::geo::Coordinates;
use crate::domain::risk::{HazardKind, RiskScore};
use chrono::{DateTime, Utc};
use uuid::Uuid;

const FLOOD_THRESHOLD: u8 = 70;
const FLOOD_CRITICAL: u8 = 85;
const LANDSLIDE_THRESHOLD: u8 = 60;
const LANDSLIDE_CRITICAL: u8 = 80;
/// Rough stand-in for "mountainous terrain"; misfires for high ground further south
const LANDSLIDE_MIN_LAT: f64 = 25.0;
const EARTHQUAKE_THRESHOLD: u8 = 50;
const EARTHQUAKE_HIGH: u8 = 75;

/// Stateless policy. Every call produces brand new alerts; deduplication against
/// earlier refreshes happens in the lifecycle store.
#[derive(Debug, Clone, Default)]
pub struct AlertGenerator;

impl AlertGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, score: &RiskScore, coordinates: &Coordinates, at: DateTime<Utc>) -> Vec<Alert> {
        let mut alerts = Vec::new();

        let flood = score.flood();
        if flood > FLOOD_THRESHOLD {
            let severity = if flood > FLOOD_CRITICAL {
                Severity::Critical
            } else {
                Severity::High
            };
            alerts.push(build_alert(
                HazardKind::Flood,
                severity,
                "High Flood Risk Alert",
                format!(
                    "Flood risk is currently {}%. Monitor water levels and prepare for potential evacuation.",
                    flood
                ),
                coordinates,
                at,
            ));
        }

        let landslide = score.landslide();
        if landslide > LANDSLIDE_THRESHOLD && coordinates.lat() > LANDSLIDE_MIN_LAT {
            let severity = if landslide > LANDSLIDE_CRITICAL {
                Severity::Critical
            } else {
                Severity::Medium
            };
            alerts.push(build_alert(
                HazardKind::Landslide,
                severity,
                "Landslide Risk Warning",
                format!(
                    "Landslide risk is elevated at {}% due to weather conditions and terrain.",
                    landslide
                ),
                coordinates,
                at,
            ));
        }

        let earthquake = score.earthquake();
        if earthquake > EARTHQUAKE_THRESHOLD {
            let severity = if earthquake > EARTHQUAKE_HIGH {
                Severity::High
            } else {
                Severity::Medium
            };
            alerts.push(build_alert(
                HazardKind::Earthquake,
                severity,
                "Seismic Activity Alert",
                format!(
                    "Earthquake risk is {}%. Recent seismic activity detected in the region.",
                    earthquake
                ),
                coordinates,
                at,
            ));
        }

        if !alerts.is_empty() {
            tracing::debug!("Generated {} alerts for {}", alerts.len(), coordinates.label());
        }

        alerts
    }
}

fn build_alert(
    hazard: HazardKind,
    severity: Severity,
    title: &str,
    message: String,
    coordinates: &Coordinates,
    at: DateTime<Utc>,
) -> Alert {
    Alert {
        id: format!("{}-{}", hazard.slug(), Uuid::new_v4()),
        hazard,
        title: title.to_string(),
        message,
        severity,
        timestamp: at,
        coordinates: *coordinates,
        location: format!("Lat: {:.4}, Lng: {:.4}", coordinates.lat(), coordinates.lng()),
        is_active: true,
        acknowledged: false,
    }
}
