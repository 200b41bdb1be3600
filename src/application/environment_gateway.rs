// Gateway traits for environmental data access
use crate::domain::environment::{EnvironmentReport, ForecastDay};
use crate::domain::geo::Coordinates;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("environment provider unavailable: {0}")]
    Unavailable(String),

    #[error("environment provider timed out")]
    Timeout,

    #[error("environment provider returned malformed data: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait EnvironmentGateway: Send + Sync {
    /// Current weather, elevation and recent seismic activity around a coordinate
    async fn fetch(&self, coordinates: Coordinates) -> Result<EnvironmentReport, GatewayError>;

    /// Daily forecast starting today
    async fn forecast(&self, coordinates: Coordinates, days: u8) -> Result<Vec<ForecastDay>, GatewayError>;
}

#[async_trait]
pub trait LocationNameResolver: Send + Sync {
    /// Human readable place name, best effort
    async fn resolve(&self, coordinates: Coordinates) -> Result<String, GatewayError>;
}
