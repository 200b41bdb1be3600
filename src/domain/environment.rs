// Environmental observation models
use super::error::{ensure_finite, ensure_range, DomainError};
use super::geo::Coordinates;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObservation {
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity, 0-100
    pub humidity: f64,
    /// km/h
    pub wind_speed: f64,
    /// Millibars
    pub pressure: f64,
    /// Kilometers
    pub visibility: f64,
    /// Percent of sky covered, 0-100
    pub cloud_cover: f64,
    /// Millimeters, never negative
    pub precipitation: f64,
    /// Percent, 0-100
    pub rain_chance: f64,
    pub condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<f64>,
}

impl WeatherObservation {
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_finite("temperature", self.temperature)?;
        ensure_range("humidity", self.humidity, 0.0, 100.0)?;
        ensure_finite("windSpeed", self.wind_speed)?;
        ensure_finite("pressure", self.pressure)?;
        ensure_finite("visibility", self.visibility)?;
        ensure_range("cloudCover", self.cloud_cover, 0.0, 100.0)?;
        ensure_range("precipitation", self.precipitation, 0.0, f64::MAX)?;
        ensure_range("rainChance", self.rain_chance, 0.0, 100.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevationSample {
    /// Meters above sea level
    pub elevation: f64,
    pub source: String,
    pub accuracy: String,
}

impl ElevationSample {
    pub fn new(elevation: f64, source: impl Into<String>, accuracy: impl Into<String>) -> Self {
        Self {
            elevation,
            source: source.into(),
            accuracy: accuracy.into(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_finite("elevation", self.elevation)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeismicEvent {
    pub magnitude: f64,
    /// Kilometers
    pub depth: f64,
    pub location: String,
    pub coordinates: Coordinates,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub max_temp: f64,
    pub min_temp: f64,
    pub condition: String,
    pub icon: String,
    pub chance_of_rain: f64,
    pub precipitation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub coordinates: Coordinates,
    pub days: Vec<ForecastDay>,
    pub degraded: bool,
}

/// Everything the gateway knows about one coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentReport {
    pub weather: WeatherObservation,
    pub elevation: ElevationSample,
    pub seismic: Vec<SeismicEvent>,
}

#[cfg(test)]
pub(crate) fn sample_weather(humidity: f64, cloud_cover: f64) -> WeatherObservation {
    WeatherObservation {
        temperature: 28.0,
        humidity,
        wind_speed: 12.0,
        pressure: 1013.0,
        visibility: 10.0,
        cloud_cover,
        precipitation: 0.0,
        rain_chance: 25.0,
        condition: "Partly Cloudy".to_string(),
        icon: None,
        feels_like: None,
        uv_index: None,
    }
}
