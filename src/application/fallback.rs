// Fallback data used when the environment gateway cannot answer
use crate::domain::environment::{EnvironmentReport, ForecastDay, WeatherObservation};
use crate::domain::geo::Coordinates;
use crate::domain::terrain::{estimate_elevation, recent_seismic_events};
use chrono::{DateTime, Duration, Utc};

/// Mild, partly cloudy conditions; scores low enough not to raise weather alerts
pub fn fallback_weather() -> WeatherObservation {
    WeatherObservation {
        temperature: 28.0,
        humidity: 65.0,
        wind_speed: 12.0,
        pressure: 1013.0,
        visibility: 10.0,
        cloud_cover: 40.0,
        precipitation: 0.2,
        rain_chance: 25.0,
        condition: "Partly Cloudy".to_string(),
        icon: Some("//cdn.weatherapi.com/weather/64x64/day/116.png".to_string()),
        feels_like: Some(32.0),
        uv_index: Some(6.0),
    }
}

pub fn fallback_report(coordinates: &Coordinates, at: DateTime<Utc>) -> EnvironmentReport {
    EnvironmentReport {
        weather: fallback_weather(),
        elevation: estimate_elevation(coordinates),
        seismic: recent_seismic_events(at),
    }
}

/// Repeating sunny / cloudy / light rain pattern starting today
pub fn fallback_forecast(at: DateTime<Utc>, days: u8) -> Vec<ForecastDay> {
    const PATTERN: [(f64, f64, &str, &str, f64, f64); 3] = [
        (30.0, 22.0, "Sunny", "//cdn.weatherapi.com/weather/64x64/day/113.png", 10.0, 0.0),
        (28.0, 20.0, "Partly Cloudy", "//cdn.weatherapi.com/weather/64x64/day/116.png", 20.0, 0.1),
        (26.0, 18.0, "Light Rain", "//cdn.weatherapi.com/weather/64x64/day/296.png", 80.0, 2.5),
    ];

    (0..days)
        .map(|offset| {
            let (max_temp, min_temp, condition, icon, chance_of_rain, precipitation) =
                PATTERN[usize::from(offset) % PATTERN.len()];
            ForecastDay {
                date: (at + Duration::days(i64::from(offset))).date_naive(),
                max_temp,
                min_temp,
                condition: condition.to_string(),
                icon: icon.to_string(),
                chance_of_rain,
                precipitation,
            }
        })
        .collect()
}
