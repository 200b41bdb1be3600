// Snapshot service - Fetch, score and derive alerts for one coordinate
use crate::application::alert_generator::AlertGenerator;
use crate::application::environment_gateway::{EnvironmentGateway, LocationNameResolver};
use crate::application::fallback::{fallback_forecast, fallback_report};
use crate::application::risk_scoring::RiskScoringEngine;
use crate::domain::environment::{EnvironmentReport, Forecast};
use crate::domain::error::DomainError;
use crate::domain::geo::Coordinates;
use crate::domain::risk::RiskScore;
use crate::domain::snapshot::LocationSnapshot;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub const MAX_FORECAST_DAYS: u8 = 10;

#[derive(Clone)]
pub struct SnapshotService {
    gateway: Arc<dyn EnvironmentGateway>,
    resolver: Arc<dyn LocationNameResolver>,
    scoring: RiskScoringEngine,
    generator: AlertGenerator,
}

impl SnapshotService {
    pub fn new(
        gateway: Arc<dyn EnvironmentGateway>,
        resolver: Arc<dyn LocationNameResolver>,
        scoring: RiskScoringEngine,
    ) -> Self {
        Self {
            gateway,
            resolver,
            scoring,
            generator: AlertGenerator::new(),
        }
    }

    /// One-shot snapshot. Alerts are the freshly derived ones; no lifecycle state is touched.
    ///
    /// Gateway failures never surface here: the snapshot is built from fallback
    /// data and flagged `degraded` instead.
    pub async fn get_snapshot(&self, coordinates: Coordinates) -> Result<LocationSnapshot, DomainError> {
        let at = Utc::now();

        let (fetched, location_name) = tokio::join!(
            self.gateway.fetch(coordinates),
            self.resolve_name(coordinates)
        );

        let (report, mut degraded) = match fetched {
            Ok(report) => (report, false),
            Err(e) => {
                tracing::warn!("Environment gateway failed for {}: {}", coordinates.label(), e);
                (fallback_report(&coordinates, at), true)
            }
        };

        let (report, risk_score) = match self.score(&report, &coordinates, at) {
            Ok(score) => (report, score),
            Err(e) => {
                tracing::warn!("Rejected gateway data for {}: {}", coordinates.label(), e);
                degraded = true;
                let fallback = fallback_report(&coordinates, at);
                let score = self.score(&fallback, &coordinates, at)?;
                (fallback, score)
            }
        };

        let alerts = self.generator.generate(&risk_score, &coordinates, at);

        Ok(LocationSnapshot {
            coordinates,
            location_name,
            weather: report.weather,
            elevation: report.elevation,
            seismic: report.seismic,
            risk_score,
            risk_level: risk_score.level(),
            dominant_hazard: risk_score.dominant_hazard(),
            alerts,
            last_updated: at,
            degraded,
        })
    }

    pub async fn forecast(&self, coordinates: Coordinates, days: u8) -> Forecast {
        let days = days.clamp(1, MAX_FORECAST_DAYS);
        match self.gateway.forecast(coordinates, days).await {
            Ok(forecast) => Forecast {
                coordinates,
                days: forecast,
                degraded: false,
            },
            Err(e) => {
                tracing::warn!("Forecast unavailable for {}: {}", coordinates.label(), e);
                Forecast {
                    coordinates,
                    days: fallback_forecast(Utc::now(), days),
                    degraded: true,
                }
            }
        }
    }

    async fn resolve_name(&self, coordinates: Coordinates) -> String {
        match self.resolver.resolve(coordinates).await {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!("Location name lookup failed for {}: {}", coordinates.label(), e);
                coordinates.label()
            }
        }
    }

    fn score(
        &self,
        report: &EnvironmentReport,
        coordinates: &Coordinates,
        at: DateTime<Utc>,
    ) -> Result<RiskScore, DomainError> {
        self.scoring.score(&report.weather, &report.elevation, coordinates, at)
    }
}
