use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// A geocoding match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub elevation: Option<f64>,
}

impl Place {
    /// `name[, admin1][, country]`, skipping absent or blank parts.
    pub fn display_name(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        parts.extend(
            [self.admin1.as_deref(), self.country.as_deref()]
                .into_iter()
                .flatten()
                .filter(|s| !s.trim().is_empty()),
        );
        parts.join(", ")
    }
}

/// Emitted by the search controller when the user picks a place.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationChosen {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

impl From<&Place> for LocationChosen {
    fn from(place: &Place) -> Self {
        Self {
            latitude: place.latitude,
            longitude: place.longitude,
            display_name: place.display_name(),
        }
    }
}

/// Instantaneous conditions at the forecast location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    /// Local time at the location.
    pub time: NaiveDateTime,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub precipitation_mm: f64,
    pub weather_code: i32,
    pub wind_speed_kmh: f64,
    pub wind_direction_deg: f64,
}

/// Index-aligned daily aggregates. Only constructible through [`DailySeries::new`],
/// which guarantees the sequences are non-empty and of equal length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeries {
    dates: Vec<NaiveDate>,
    weather_codes: Vec<i32>,
    max_temps_c: Vec<f64>,
    min_temps_c: Vec<f64>,
    precipitation_probabilities: Vec<Option<f64>>,
}

/// One row of [`DailySeries`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub weather_code: i32,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub precipitation_probability: Option<f64>,
}

impl DailySeries {
    pub fn new(
        dates: Vec<NaiveDate>,
        weather_codes: Vec<i32>,
        max_temps_c: Vec<f64>,
        min_temps_c: Vec<f64>,
        precipitation_probabilities: Vec<Option<f64>>,
    ) -> Result<Self, ClientError> {
        let len = dates.len();
        if len == 0 {
            return Err(ClientError::ParseError("daily series is empty".to_string()));
        }

        let lengths = [
            ("weather_code", weather_codes.len()),
            ("temperature_2m_max", max_temps_c.len()),
            ("temperature_2m_min", min_temps_c.len()),
            ("precipitation_probability_max", precipitation_probabilities.len()),
        ];
        if let Some((field, other)) = lengths.iter().find(|(_, l)| *l != len) {
            return Err(ClientError::ParseError(format!(
                "daily series length mismatch: time has {len} entries, {field} has {other}"
            )));
        }

        Ok(Self { dates, weather_codes, max_temps_c, min_temps_c, precipitation_probabilities })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always false for a constructed series; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<DayForecast> {
        Some(DayForecast {
            date: *self.dates.get(index)?,
            weather_code: *self.weather_codes.get(index)?,
            max_temp_c: *self.max_temps_c.get(index)?,
            min_temp_c: *self.min_temps_c.get(index)?,
            precipitation_probability: *self.precipitation_probabilities.get(index)?,
        })
    }

    pub fn days(&self) -> impl Iterator<Item = DayForecast> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

/// Current conditions plus the daily outlook for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRecord {
    pub current: CurrentConditions,
    pub daily: DailySeries,
    /// IANA timezone the service resolved for the coordinates.
    pub timezone: Option<String>,
}
