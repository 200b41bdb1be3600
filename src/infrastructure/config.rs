use crate::application::refresh_scheduler::DEFAULT_REFRESH_INTERVAL;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub weather_api: WeatherApiSettings,
    pub refresh: RefreshSettings,
    pub scoring: ScoringSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherApiSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshSettings {
    pub interval_secs: u64,
    /// Selected at startup
    pub default_lat: f64,
    pub default_lng: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoringSettings {
    /// Width of the window keeping tsunami/earthquake baselines stable
    pub baseline_window_secs: i64,
}

impl AppConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl WeatherApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl RefreshSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("weather_api.base_url", "https://api.weatherapi.com/v1")?
        .set_default("weather_api.api_key", "")?
        .set_default("weather_api.timeout_secs", 10)?
        .set_default("refresh.interval_secs", DEFAULT_REFRESH_INTERVAL.as_secs())?
        // New Delhi
        .set_default("refresh.default_lat", 28.6139)?
        .set_default("refresh.default_lng", 77.2090)?
        .set_default("scoring.baseline_window_secs", 3600)
}

/// Defaults, then `config/hazard-watch.*` if present, then `HAZARD_WATCH__SECTION__KEY` variables
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = with_defaults()?
        .add_source(config::File::with_name("config/hazard-watch").required(false))
        .add_source(
            config::Environment::with_prefix("HAZARD_WATCH")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
