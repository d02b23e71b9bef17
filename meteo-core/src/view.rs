//! Render-ready view of a forecast.
//!
//! Everything here is a pure function of a [`ForecastRecord`] and a display name,
//! so any front end (terminal, web, GUI) can draw the same numbers.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    model::{DayForecast, ForecastRecord},
    weather_code::{self, WeatherCodeEntry},
};

const COMPASS_POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastView {
    pub location_name: String,
    /// Local observation time, e.g. `Mon, Jan 15 2024 14:00`.
    pub updated_at: String,
    pub current: CurrentView,
    pub days: Vec<DayView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentView {
    pub temperature_c: i64,
    pub humidity_pct: i64,
    pub precipitation_mm: f64,
    pub wind_speed_kmh: i64,
    pub wind_compass: &'static str,
    pub wind_direction_deg: i64,
    pub weather: WeatherCodeEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub label: String,
    pub date: NaiveDate,
    pub high_c: i64,
    pub low_c: i64,
    pub precipitation_probability_pct: Option<i64>,
    pub weather: WeatherCodeEntry,
}

impl ForecastView {
    pub fn new(record: &ForecastRecord, location_name: &str) -> Self {
        let current = &record.current;

        Self {
            location_name: location_name.to_string(),
            updated_at: current.time.format("%a, %b %-d %Y %H:%M").to_string(),
            current: CurrentView {
                temperature_c: round(current.temperature_c),
                humidity_pct: round(current.humidity_pct),
                precipitation_mm: current.precipitation_mm,
                wind_speed_kmh: round(current.wind_speed_kmh),
                wind_compass: compass_point(current.wind_direction_deg),
                wind_direction_deg: round(current.wind_direction_deg),
                weather: weather_code::describe(current.weather_code),
            },
            days: record.daily.days().enumerate().map(|(i, day)| DayView::new(i, day)).collect(),
        }
    }
}

impl DayView {
    fn new(index: usize, day: DayForecast) -> Self {
        Self {
            label: day_label(index, day.date),
            date: day.date,
            high_c: round(day.max_temp_c),
            low_c: round(day.min_temp_c),
            precipitation_probability_pct: day.precipitation_probability.map(round),
            weather: weather_code::describe(day.weather_code),
        }
    }
}

/// "Today", "Tomorrow", then e.g. "Wed, Jan 17".
pub fn day_label(index: usize, date: NaiveDate) -> String {
    match index {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a, %b %-d").to_string(),
    }
}

/// Eight-point compass bucket: `round(deg / 45) mod 8`.
pub fn compass_point(degrees: f64) -> &'static str {
    let bucket = round_half_up(degrees / 45.0).rem_euclid(8.0) as usize;
    COMPASS_POINTS[bucket % COMPASS_POINTS.len()]
}

/// Group thousands with commas: `8961989` -> `8,961,989`.
pub fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// Halves go up, so -1.5 displays as -1 rather than -2.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn round(value: f64) -> i64 {
    round_half_up(value) as i64
}
