// Location snapshot - the unit handed to consumers on every refresh
use super::alert::Alert;
use super::environment::{ElevationSample, SeismicEvent, WeatherObservation};
use super::geo::Coordinates;
use super::risk::{HazardKind, RiskLevel, RiskScore};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSnapshot {
    pub coordinates: Coordinates,
    pub location_name: String,
    pub weather: WeatherObservation,
    pub elevation: ElevationSample,
    pub seismic: Vec<SeismicEvent>,
    pub risk_score: RiskScore,
    pub risk_level: RiskLevel,
    pub dominant_hazard: HazardKind,
    pub alerts: Vec<Alert>,
    pub last_updated: DateTime<Utc>,
    /// Built from fallback data because the environment gateway failed
    pub degraded: bool,
}
