use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    Config,
    error::ClientError,
    model::{CurrentConditions, DailySeries, ForecastRecord, Place},
};

use super::WeatherProvider;

const SEARCH_RESULT_COUNT: &str = "10";
const SEARCH_LANGUAGE: &str = "en";
const FORECAST_DAYS: &str = "7";
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,precipitation,weather_code,wind_speed_10m,wind_direction_10m";
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_probability_max";

/// Client for the free Open-Meteo geocoding and forecast APIs. No API key needed.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoProvider {
    pub fn new(
        geocoding_url: impl Into<String>,
        forecast_url: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("meteo/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, geocoding_url: geocoding_url.into(), forecast_url: forecast_url.into() })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(&config.endpoints.geocoding, &config.endpoints.forecast, config.timeout())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let res = request.send().await.map_err(|e| {
            warn!(what, error = %e, "request failed");
            ClientError::RemoteUnavailable(format!("Failed to send {what} request: {e}"))
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            ClientError::RemoteUnavailable(format!("Failed to read {what} response body: {e}"))
        })?;

        if !status.is_success() {
            warn!(what, %status, body = %truncate_body(&body), "request returned error status");
            return Err(ClientError::RemoteUnavailable(format!(
                "{what} request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse {what} JSON: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct OmSearchResponse {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: String,
    temperature_2m: f64,
    relative_humidity_2m: f64,
    precipitation: f64,
    weather_code: i32,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    weather_code: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    precipitation_probability_max: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    timezone: Option<String>,
    current: OmCurrent,
    daily: OmDaily,
}

impl TryFrom<OmForecastResponse> for ForecastRecord {
    type Error = ClientError;

    fn try_from(parsed: OmForecastResponse) -> Result<Self, Self::Error> {
        let current = CurrentConditions {
            time: parse_local_time(&parsed.current.time)?,
            temperature_c: parsed.current.temperature_2m,
            humidity_pct: parsed.current.relative_humidity_2m,
            precipitation_mm: parsed.current.precipitation,
            weather_code: parsed.current.weather_code,
            wind_speed_kmh: parsed.current.wind_speed_10m,
            wind_direction_deg: parsed.current.wind_direction_10m,
        };

        let dates = parsed
            .daily
            .time
            .iter()
            .map(|d| {
                NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .map_err(|e| ClientError::ParseError(format!("Invalid daily date '{d}': {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let daily = DailySeries::new(
            dates,
            parsed.daily.weather_code,
            parsed.daily.temperature_2m_max,
            parsed.daily.temperature_2m_min,
            parsed.daily.precipitation_probability_max,
        )?;

        Ok(ForecastRecord { current, daily, timezone: parsed.timezone })
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn search_places(&self, query: &str) -> Result<Vec<Place>, ClientError> {
        if query.trim().is_empty() {
            return Err(ClientError::InvalidInput("Location query is required".to_string()));
        }

        debug!(url = %self.geocoding_url, query, "searching places");

        let request = self.http.get(&self.geocoding_url).query(&[
            ("name", query),
            ("count", SEARCH_RESULT_COUNT),
            ("language", SEARCH_LANGUAGE),
            ("format", "json"),
        ]);

        let parsed: OmSearchResponse = self.get_json("geocoding", request).await?;
        debug!(matches = parsed.results.len(), "geocoding finished");
        Ok(parsed.results)
    }

    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastRecord, ClientError> {
        debug!(url = %self.forecast_url, latitude, longitude, "fetching forecast");

        let request = self.http.get(&self.forecast_url).query(&[
            ("latitude", latitude.to_string().as_str()),
            ("longitude", longitude.to_string().as_str()),
            ("current", CURRENT_FIELDS),
            ("daily", DAILY_FIELDS),
            ("timezone", "auto"),
            ("forecast_days", FORECAST_DAYS),
        ]);

        let parsed: OmForecastResponse = self.get_json("forecast", request).await?;
        ForecastRecord::try_from(parsed)
    }
}

/// Open-Meteo reports local times without seconds, e.g. `2024-01-15T14:00`.
fn parse_local_time(s: &str) -> Result<NaiveDateTime, ClientError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| ClientError::ParseError(format!("Invalid timestamp '{s}': {e}")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let end = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
