//! Plain-text rendering of the core view models.

use std::fmt;

use meteo_core::{ForecastView, Place, view::format_population};

pub const ATTRIBUTION: &str = "Weather data provided by Open-Meteo (https://open-meteo.com/)";

/// One suggestion line, e.g. `📍 London, England, United Kingdom (Pop: 8,961,989)`.
pub fn suggestion(place: &Place) -> String {
    match place.population {
        Some(pop) => format!("📍 {} (Pop: {})", place.display_name(), format_population(pop)),
        None => format!("📍 {}", place.display_name()),
    }
}

pub fn forecast(view: &ForecastView) -> String {
    ForecastText(view).to_string()
}

struct ForecastText<'a>(&'a ForecastView);

impl fmt::Display for ForecastText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        let current = &view.current;

        writeln!(f, "\nWeather in {}", view.location_name)?;
        writeln!(f, "Last updated: {}\n", view.updated_at)?;

        writeln!(
            f,
            "  {}°C  {} {}",
            current.temperature_c, current.weather.icon, current.weather.description
        )?;
        writeln!(f, "  💧 Humidity        {}%", current.humidity_pct)?;
        writeln!(f, "  🌧️ Precipitation   {} mm", current.precipitation_mm)?;
        writeln!(f, "  💨 Wind Speed      {} km/h", current.wind_speed_kmh)?;
        writeln!(
            f,
            "  🧭 Wind Direction  {} ({}°)",
            current.wind_compass, current.wind_direction_deg
        )?;

        writeln!(f, "\n7-Day Forecast")?;
        for day in &view.days {
            let rain = day
                .precipitation_probability_pct
                .map(|p| format!("{p}%"))
                .unwrap_or_else(|| "–".to_string());

            writeln!(
                f,
                "  {:<12} {}  {:>4}° / {:>4}°  💧 {:>4}  {}",
                day.label, day.weather.icon, day.high_c, day.low_c, rain, day.weather.description
            )?;
        }

        Ok(())
    }
}
