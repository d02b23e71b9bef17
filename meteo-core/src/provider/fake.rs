//! Scripted in-memory provider for controller and shell tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde_json::json;
use std::time::Duration;

use crate::{
    error::ClientError,
    model::{CurrentConditions, DailySeries, ForecastRecord, Place},
};

use super::WeatherProvider;

#[derive(Debug, Default)]
pub(crate) struct FakeProvider {
    pub search_calls: Mutex<Vec<String>>,
    pub forecast_calls: Mutex<Vec<(f64, f64)>>,
    places: Mutex<Vec<Place>>,
    search_failure: Mutex<Option<fn() -> ClientError>>,
    forecast_failure: Mutex<Option<fn() -> ClientError>>,
    delay: Mutex<Duration>,
}

impl FakeProvider {
    pub fn with_places(places: Vec<Place>) -> Self {
        let fake = Self::default();
        *fake.places.lock() = places;
        fake
    }

    pub fn fail_search(&self, make: fn() -> ClientError) {
        *self.search_failure.lock() = Some(make);
    }

    pub fn fail_forecast(&self, make: fn() -> ClientError) {
        *self.forecast_failure.lock() = Some(make);
    }

    /// Latency applied to every call; use with paused tokio time.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.search_calls.lock().clone()
    }

    async fn wait(&self) {
        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn search_places(&self, query: &str) -> Result<Vec<Place>, ClientError> {
        self.search_calls.lock().push(query.to_string());
        self.wait().await;

        if let Some(make) = *self.search_failure.lock() {
            return Err(make());
        }

        let needle = query.to_lowercase();
        Ok(self
            .places
            .lock()
            .iter()
            .filter(|p| p.name.to_lowercase().starts_with(&needle))
            .cloned()
            .collect())
    }

    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastRecord, ClientError> {
        self.forecast_calls.lock().push((latitude, longitude));
        self.wait().await;

        if let Some(make) = *self.forecast_failure.lock() {
            return Err(make());
        }

        Ok(sample_forecast())
    }
}

pub(crate) fn place(id: i64, name: &str, admin1: Option<&str>, country: Option<&str>) -> Place {
    Place {
        id,
        name: name.to_string(),
        latitude: 51.5072,
        longitude: -0.1276,
        admin1: admin1.map(Into::into),
        country: country.map(Into::into),
        country_code: None,
        population: None,
        timezone: None,
        elevation: None,
    }
}

pub(crate) fn london() -> Place {
    Place {
        population: Some(8_961_989),
        ..place(2643743, "London", Some("England"), Some("United Kingdom"))
    }
}

/// Seven days starting Monday 2024-01-15.
pub(crate) fn sample_forecast() -> ForecastRecord {
    let dates = (15..22)
        .filter_map(|d| NaiveDate::from_ymd_opt(2024, 1, d))
        .collect::<Vec<_>>();

    let daily = DailySeries::new(
        dates,
        vec![3, 61, 80, 0, 1, 2, 1234],
        vec![8.4, 9.6, 7.2, 5.5, 4.9, 6.0, 2.1],
        vec![3.2, 4.0, 2.6, -0.4, -1.5, 0.0, -2.7],
        vec![Some(20.0), Some(85.0), Some(60.0), Some(0.0), Some(5.0), Some(10.0), None],
    )
    .unwrap();

    ForecastRecord {
        current: CurrentConditions {
            time: NaiveDate::from_ymd_opt(2024, 1, 15)
                .and_then(|d| d.and_hms_opt(14, 0, 0))
                .unwrap(),
            temperature_c: 7.6,
            humidity_pct: 81.0,
            precipitation_mm: 0.2,
            weather_code: 3,
            wind_speed_kmh: 14.5,
            wind_direction_deg: 247.0,
        },
        daily,
        timezone: Some("Europe/London".to_string()),
    }
}

/// Open-Meteo forecast payload for London, seven days from 2024-01-15.
pub(crate) fn forecast_body() -> serde_json::Value {
    json!({
        "latitude": 51.5,
        "longitude": -0.12,
        "generationtime_ms": 0.05,
        "utc_offset_seconds": 0,
        "timezone": "Europe/London",
        "timezone_abbreviation": "GMT",
        "elevation": 23.0,
        "current": {
            "time": "2024-01-15T14:00",
            "interval": 900,
            "temperature_2m": 7.6,
            "relative_humidity_2m": 81,
            "precipitation": 0.2,
            "weather_code": 3,
            "wind_speed_10m": 14.4,
            "wind_direction_10m": 247
        },
        "daily": {
            "time": ["2024-01-15", "2024-01-16", "2024-01-17", "2024-01-18",
                     "2024-01-19", "2024-01-20", "2024-01-21"],
            "weather_code": [3, 61, 80, 0, 1, 2, 71],
            "temperature_2m_max": [8.4, 9.1, 7.2, 5.5, 4.9, 6.0, 2.1],
            "temperature_2m_min": [3.2, 4.0, 2.6, -0.4, -1.5, 0.0, -2.7],
            "precipitation_probability_max": [20, 85, 60, 0, 5, 10, null]
        }
    })
}
