//! Core library for the `meteo` forecast app.
//!
//! This crate defines:
//! - Configuration handling
//! - The Open-Meteo client behind the [`WeatherProvider`] abstraction
//! - The debounced location search, the application state machine and the
//!   render-ready forecast view
//!
//! It is used by `meteo-cli`, but carries no terminal code so other front ends can
//! drive the same components.

pub mod app;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod search;
pub mod view;
pub mod weather_code;

pub use app::{App, AppState};
pub use config::Config;
pub use error::{ClientError, Operation};
pub use model::{CurrentConditions, DailySeries, DayForecast, ForecastRecord, LocationChosen, Place};
pub use provider::{WeatherProvider, open_meteo::OpenMeteoProvider, provider_from_config};
pub use search::{SearchController, SearchState};
pub use view::ForecastView;
pub use weather_code::{WeatherCodeEntry, describe};
