// Risk scoring engine - Turns environmental signals into per-hazard scores
use crate::domain::environment::{ElevationSample, WeatherObservation};
use crate::domain::error::DomainError;
use crate::domain::geo::{stable_unit, Coordinates};
use crate::domain::risk::{HazardKind, RiskScore};
use chrono::{DateTime, Utc};

const DEFAULT_BASELINE_WINDOW_SECS: i64 = 3600;

/// Stateless scorer. The only knob is the width of the time window that keeps
/// the tsunami and earthquake baselines stable between refreshes.
#[derive(Debug, Clone)]
pub struct RiskScoringEngine {
    baseline_window_secs: i64,
}

impl Default for RiskScoringEngine {
    fn default() -> Self {
        Self::new(DEFAULT_BASELINE_WINDOW_SECS)
    }
}

impl RiskScoringEngine {
    pub fn new(baseline_window_secs: i64) -> Self {
        Self {
            baseline_window_secs: baseline_window_secs.max(1),
        }
    }

    pub fn score(
        &self,
        weather: &WeatherObservation,
        elevation: &ElevationSample,
        coordinates: &Coordinates,
        at: DateTime<Utc>,
    ) -> Result<RiskScore, DomainError> {
        weather.validate()?;
        elevation.validate()?;

        let humidity = weather.humidity;
        let meters = elevation.elevation;

        let flood = humidity * 0.8 + if meters < 100.0 { 30.0 } else { 0.0 };
        let heavy_rain = humidity * 0.6 + weather.cloud_cover * 0.4;
        let landslide = if meters > 500.0 {
            to_score(meters / 50.0 + humidity * 0.3, 100.0)
        } else {
            to_score(humidity * 0.2, 30.0)
        };

        let tsunami = self.tsunami_baseline(coordinates, meters, at);
        let earthquake = self.earthquake_baseline(coordinates, at);

        let score = RiskScore::from_components(
            to_score(flood, 100.0),
            to_score(heavy_rain, 100.0),
            landslide,
            to_score(tsunami, 100.0),
            to_score(earthquake, 100.0),
        );

        tracing::debug!(
            "Scored {}: flood={} heavy_rain={} landslide={} tsunami={} earthquake={} overall={}",
            coordinates.label(),
            score.flood(),
            score.heavy_rain(),
            score.landslide(),
            score.tsunami(),
            score.earthquake(),
            score.overall()
        );

        Ok(score)
    }

    /// Coastal lowlands (south of 15N or east of 75E, under 50m) sit in 10..50, elsewhere 0..15
    fn tsunami_baseline(&self, coordinates: &Coordinates, meters: f64, at: DateTime<Utc>) -> f64 {
        let u = self.draw(HazardKind::Tsunami, coordinates, at);
        if meters < 50.0 && (coordinates.lat() < 15.0 || coordinates.lng() > 75.0) {
            10.0 + u * 40.0
        } else {
            u * 15.0
        }
    }

    /// North of 28N (Himalayan belt) sits in 20..80, elsewhere 10..40
    fn earthquake_baseline(&self, coordinates: &Coordinates, at: DateTime<Utc>) -> f64 {
        let u = self.draw(HazardKind::Earthquake, coordinates, at);
        if coordinates.lat() > 28.0 {
            20.0 + u * 60.0
        } else {
            10.0 + u * 30.0
        }
    }

    fn draw(&self, hazard: HazardKind, coordinates: &Coordinates, at: DateTime<Utc>) -> f64 {
        let window = at.timestamp().div_euclid(self.baseline_window_secs);
        stable_unit(hazard.slug(), coordinates.bucket(), window)
    }
}

fn to_score(value: f64, max: f64) -> u8 {
    value.clamp(0.0, max).round() as u8
}
