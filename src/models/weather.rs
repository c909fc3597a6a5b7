//! Weather reading model and display methods

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions at a resolved place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherReading {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Wind speed as reported by the provider (km/h for Open-Meteo)
    pub wind_speed: f64,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction: f64,
    /// When the provider observed these conditions
    pub observed_at: DateTime<Utc>,
    /// WMO weather interpretation code
    pub weather_code: Option<u8>,
}

impl WeatherReading {
    /// Convert wind direction from degrees to cardinal direction
    #[must_use]
    pub fn wind_direction_to_cardinal(degrees: f64) -> &'static str {
        if !degrees.is_finite() {
            return "Unknown";
        }
        const POINTS: [&str; 16] = [
            "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W",
            "WNW", "NW", "NNW",
        ];
        let index = (degrees.rem_euclid(360.0) / 22.5).round() as usize % POINTS.len();
        POINTS[index]
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temperature)
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!(
            "{:.1} km/h {} ({:.0}°)",
            self.wind_speed,
            Self::wind_direction_to_cardinal(self.wind_direction),
            self.wind_direction
        )
    }

    /// Human-readable description of the weather code, when one was reported
    #[must_use]
    pub fn description(&self) -> Option<&'static str> {
        self.weather_code.map(weather_code_to_description)
    }
}

/// Convert WMO weather code to human-readable description
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn reading() -> WeatherReading {
        WeatherReading {
            temperature: 12.34,
            wind_speed: 9.8,
            wind_direction: 225.0,
            observed_at: Utc::now(),
            weather_code: Some(3),
        }
    }

    #[rstest]
    #[case(0.0, "N")]
    #[case(360.0, "N")]
    #[case(11.0, "N")]
    #[case(12.0, "NNE")]
    #[case(90.0, "E")]
    #[case(225.0, "SW")]
    #[case(350.0, "N")]
    #[case(-90.0, "W")]
    #[case(f64::NAN, "Unknown")]
    fn test_cardinal_directions(#[case] degrees: f64, #[case] expected: &str) {
        assert_eq!(WeatherReading::wind_direction_to_cardinal(degrees), expected);
    }

    #[test]
    fn test_formatting() {
        let reading = reading();
        assert_eq!(reading.format_temperature(), "12.3°C");
        assert_eq!(reading.format_wind(), "9.8 km/h SW (225°)");
        assert_eq!(reading.description(), Some("Overcast"));
    }

    #[test]
    fn test_missing_weather_code_has_no_description() {
        let reading = WeatherReading {
            weather_code: None,
            ..reading()
        };
        assert_eq!(reading.description(), None);
        assert_eq!(weather_code_to_description(42), "Unknown");
    }
}
