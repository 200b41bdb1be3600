// Test doubles for the environment gateway
use crate::application::environment_gateway::{EnvironmentGateway, GatewayError, LocationNameResolver};
use crate::domain::environment::{ElevationSample, EnvironmentReport, ForecastDay, sample_weather};
use crate::domain::geo::{CoordinateBucket, Coordinates};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Answers with fixed wet, low-lying conditions (flood score 100) unless told to fail
#[derive(Default)]
pub struct StubGateway {
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
    humidity: Mutex<Option<f64>>,
    delays: Mutex<HashMap<CoordinateBucket, Duration>>,
}

impl StubGateway {
    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.fail.store(true, Ordering::SeqCst);
        gateway
    }

    pub fn set_humidity(&self, humidity: f64) {
        *self.humidity.lock().unwrap() = Some(humidity);
    }

    pub fn delay(&self, coordinates: Coordinates, delay: Duration) {
        self.delays.lock().unwrap().insert(coordinates.bucket(), delay);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EnvironmentGateway for StubGateway {
    async fn fetch(&self, coordinates: Coordinates) -> Result<EnvironmentReport, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.delays.lock().unwrap().get(&coordinates.bucket()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("stub offline".to_string()));
        }

        let humidity = self.humidity.lock().unwrap().unwrap_or(95.0);
        Ok(EnvironmentReport {
            weather: sample_weather(humidity, 80.0),
            elevation: ElevationSample::new(40.0, "stub", "high"),
            seismic: Vec::new(),
        })
    }

    async fn forecast(&self, _coordinates: Coordinates, days: u8) -> Result<Vec<ForecastDay>, GatewayError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::Timeout);
        }
        Ok((0..days)
            .map(|_| ForecastDay {
                date: Utc::now().date_naive(),
                max_temp: 31.0,
                min_temp: 24.0,
                condition: "Heavy rain".to_string(),
                icon: String::new(),
                chance_of_rain: 95.0,
                precipitation: 40.0,
            })
            .collect())
    }
}

pub struct StubResolver {
    pub name: Option<String>,
}

#[async_trait]
impl LocationNameResolver for StubResolver {
    async fn resolve(&self, _coordinates: Coordinates) -> Result<String, GatewayError> {
        self.name
            .clone()
            .ok_or_else(|| GatewayError::Unavailable("no geocoder".to_string()))
    }
}
