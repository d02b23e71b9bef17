use crate::{
    Config,
    error::ClientError,
    model::{ForecastRecord, Place},
    provider::open_meteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod open_meteo;

#[cfg(test)]
pub(crate) mod fake;

/// Source of place matches and forecasts.
///
/// Implementations perform no retries; a failed call is reported once and the
/// caller decides what to do with it.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Geocode a free-text query into candidate places.
    ///
    /// Fails with [`ClientError::InvalidInput`] when the query is blank, before any
    /// request is made. An empty list means the service found no match.
    async fn search_places(&self, query: &str) -> Result<Vec<Place>, ClientError>;

    /// Current conditions and the 7-day outlook for a coordinate.
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastRecord, ClientError>;
}

/// Construct the Open-Meteo provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    config.validate()?;
    let provider = OpenMeteoProvider::from_config(config)?;
    Ok(Arc::new(provider))
}
