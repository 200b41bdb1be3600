// WeatherAPI.com gateway implementation
use crate::application::environment_gateway::{EnvironmentGateway, GatewayError, LocationNameResolver};
use crate::domain::environment::{EnvironmentReport, ForecastDay, WeatherObservation};
use crate::domain::geo::Coordinates;
use crate::domain::terrain::{estimate_elevation, recent_seismic_events};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WeatherApiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: ApiLocation,
    current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
struct ApiLocation {
    name: String,
    region: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temp_c: f64,
    wind_kph: f64,
    pressure_mb: f64,
    precip_mm: f64,
    humidity: f64,
    cloud: f64,
    feelslike_c: f64,
    vis_km: f64,
    uv: f64,
    condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    forecast: Option<ApiForecast>,
}

#[derive(Debug, Deserialize)]
struct ApiForecast {
    forecastday: Vec<ApiForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ApiForecastDay {
    date: NaiveDate,
    day: ApiDay,
}

#[derive(Debug, Deserialize)]
struct ApiDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    totalprecip_mm: f64,
    #[serde(default)]
    daily_chance_of_rain: f64,
    condition: ApiCondition,
}

impl WeatherApiGateway {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build WeatherAPI HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn build_url(&self, endpoint: &str, coordinates: &Coordinates, extra: &str) -> String {
        let query = format!("{},{}", coordinates.lat(), coordinates.lng());
        format!(
            "{}/{}?key={}&q={}{}",
            self.base_url,
            endpoint,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&query),
            extra
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GatewayError> {
        if self.api_key.is_empty() {
            return Err(GatewayError::Unavailable("no WeatherAPI key configured".to_string()));
        }

        let response = self.client.get(url).send().await.map_err(map_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Unavailable(format!(
                "WeatherAPI responded with status {}: {}",
                status, body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Malformed(e.to_string()))
    }

    async fn current(&self, coordinates: &Coordinates) -> Result<CurrentResponse, GatewayError> {
        let url = self.build_url("current.json", coordinates, "&aqi=no");
        tracing::debug!("Fetching current weather for {}", coordinates.label());
        self.get_json(&url).await
    }
}

#[async_trait]
impl EnvironmentGateway for WeatherApiGateway {
    async fn fetch(&self, coordinates: Coordinates) -> Result<EnvironmentReport, GatewayError> {
        let response = self.current(&coordinates).await?;

        Ok(EnvironmentReport {
            weather: to_observation(&response.current),
            elevation: estimate_elevation(&coordinates),
            seismic: recent_seismic_events(Utc::now()),
        })
    }

    async fn forecast(&self, coordinates: Coordinates, days: u8) -> Result<Vec<ForecastDay>, GatewayError> {
        let url = self.build_url(
            "forecast.json",
            &coordinates,
            &format!("&days={}&aqi=no&alerts=no", days),
        );
        tracing::debug!("Fetching {}-day forecast for {}", days, coordinates.label());

        let response: ForecastResponse = self.get_json(&url).await?;
        let forecast = response
            .forecast
            .ok_or_else(|| GatewayError::Malformed("response has no forecast block".to_string()))?;

        Ok(forecast.forecastday.into_iter().map(to_forecast_day).collect())
    }
}

#[async_trait]
impl LocationNameResolver for WeatherApiGateway {
    async fn resolve(&self, coordinates: Coordinates) -> Result<String, GatewayError> {
        let response = self.current(&coordinates).await?;
        let location = response.location;
        Ok(format!("{}, {}, {}", location.name, location.region, location.country))
    }
}

fn map_request_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Unavailable(error.to_string())
    }
}

fn to_observation(current: &ApiCurrent) -> WeatherObservation {
    WeatherObservation {
        temperature: current.temp_c.round(),
        humidity: current.humidity,
        wind_speed: current.wind_kph.round(),
        pressure: current.pressure_mb.round(),
        visibility: current.vis_km.round(),
        cloud_cover: current.cloud,
        precipitation: round_tenth(current.precip_mm),
        rain_chance: rain_chance(current.humidity, current.cloud, current.precip_mm),
        condition: current.condition.text.clone(),
        icon: Some(current.condition.icon.clone()),
        feels_like: Some(current.feelslike_c.round()),
        uv_index: Some(current.uv),
    }
}

fn to_forecast_day(day: ApiForecastDay) -> ForecastDay {
    ForecastDay {
        date: day.date,
        max_temp: day.day.maxtemp_c.round(),
        min_temp: day.day.mintemp_c.round(),
        condition: day.day.condition.text,
        icon: day.day.condition.icon,
        chance_of_rain: day.day.daily_chance_of_rain,
        precipitation: round_tenth(day.day.totalprecip_mm),
    }
}

/// Estimated chance of rain from current conditions, 0-100
fn rain_chance(humidity: f64, cloud: f64, precipitation: f64) -> f64 {
    if precipitation > 0.0 {
        return 90.0;
    }
    match (humidity, cloud) {
        (h, c) if h > 80.0 && c > 70.0 => 75.0,
        (h, c) if h > 70.0 && c > 60.0 => 60.0,
        (h, c) if h > 60.0 && c > 50.0 => 45.0,
        (h, c) if h > 50.0 && c > 40.0 => 30.0,
        (h, c) => ((h + c) / 4.0).round().max(0.0),
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
