//! WMO weather interpretation codes as reported by Open-Meteo.
//!
//! See <https://open-meteo.com/en/docs#weathervariables>.

use serde::Serialize;

/// Human description and icon for a weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherCodeEntry {
    pub description: &'static str,
    pub icon: &'static str,
}

impl WeatherCodeEntry {
    const fn new(description: &'static str, icon: &'static str) -> Self {
        Self { description, icon }
    }
}

/// Returned for any code missing from the table.
pub const UNKNOWN: WeatherCodeEntry = WeatherCodeEntry::new("Unknown", "❓");

/// Look up the description and icon for a weather code. Never fails.
pub fn describe(code: i32) -> WeatherCodeEntry {
    match code {
        0 => WeatherCodeEntry::new("Clear sky", "☀️"),
        1 => WeatherCodeEntry::new("Mainly clear", "🌤️"),
        2 => WeatherCodeEntry::new("Partly cloudy", "⛅"),
        3 => WeatherCodeEntry::new("Overcast", "☁️"),
        45 => WeatherCodeEntry::new("Fog", "🌫️"),
        48 => WeatherCodeEntry::new("Depositing rime fog", "🌫️"),
        51 => WeatherCodeEntry::new("Light drizzle", "🌦️"),
        53 => WeatherCodeEntry::new("Moderate drizzle", "🌦️"),
        55 => WeatherCodeEntry::new("Dense drizzle", "🌦️"),
        56 => WeatherCodeEntry::new("Light freezing drizzle", "🌦️"),
        57 => WeatherCodeEntry::new("Dense freezing drizzle", "🌦️"),
        61 => WeatherCodeEntry::new("Slight rain", "🌧️"),
        63 => WeatherCodeEntry::new("Moderate rain", "🌧️"),
        65 => WeatherCodeEntry::new("Heavy rain", "🌧️"),
        66 => WeatherCodeEntry::new("Light freezing rain", "🌧️"),
        67 => WeatherCodeEntry::new("Heavy freezing rain", "🌧️"),
        71 => WeatherCodeEntry::new("Slight snow fall", "🌨️"),
        73 => WeatherCodeEntry::new("Moderate snow fall", "🌨️"),
        75 => WeatherCodeEntry::new("Heavy snow fall", "🌨️"),
        77 => WeatherCodeEntry::new("Snow grains", "🌨️"),
        80 => WeatherCodeEntry::new("Slight rain showers", "🌦️"),
        81 => WeatherCodeEntry::new("Moderate rain showers", "🌦️"),
        82 => WeatherCodeEntry::new("Violent rain showers", "🌦️"),
        85 => WeatherCodeEntry::new("Slight snow showers", "🌨️"),
        86 => WeatherCodeEntry::new("Heavy snow showers", "🌨️"),
        95 => WeatherCodeEntry::new("Thunderstorm", "⛈️"),
        96 => WeatherCodeEntry::new("Thunderstorm with slight hail", "⛈️"),
        99 => WeatherCodeEntry::new("Thunderstorm with heavy hail", "⛈️"),
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_have_descriptions() {
        assert_eq!(describe(0).description, "Clear sky");
        assert_eq!(describe(3).description, "Overcast");
        assert_eq!(describe(63).description, "Moderate rain");
        assert_eq!(describe(99).description, "Thunderstorm with heavy hail");
    }

    #[test]
    fn unknown_codes_fall_back() {
        for code in [-1, 4, 44, 50, 100, 1000, i32::MIN, i32::MAX] {
            assert_eq!(describe(code), UNKNOWN, "code {code}");
        }
    }

    #[test]
    fn every_table_code_is_known() {
        let codes = [
            0, 1, 2, 3, 45, 48, 51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 71, 73, 75, 77, 80, 81,
            82, 85, 86, 95, 96, 99,
        ];
        for code in codes {
            assert_ne!(describe(code), UNKNOWN, "code {code}");
        }
    }
}
