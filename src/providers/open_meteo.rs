use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::WeatherProvider;
use crate::config::WeatherConfig;
use crate::models::WeatherReading;

/// Weather provider backed by the Open-Meteo forecast API (no API key required)
#[derive(Debug, Clone)]
pub struct OpenMeteoWeather {
    client: Client,
    base_url: String,
}

/// Forecast response, reduced to the `current_weather` block
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    time: String,
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: Option<u8>,
}

impl OpenMeteoWeather {
    /// Create a new weather client
    pub fn new(config: &WeatherConfig) -> crate::Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Open-Meteo reports local wall-clock time (`timezone=auto`) plus the UTC offset
fn parse_observed_at(time: &str, utc_offset_seconds: i32) -> DateTime<Utc> {
    let local = NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M")
        .ok()
        .zip(FixedOffset::east_opt(utc_offset_seconds))
        .and_then(|(naive, offset)| naive.and_local_timezone(offset).single());

    match local {
        Some(observed) => observed.with_timezone(&Utc),
        None => DateTime::parse_from_rfc3339(time).map_or_else(
            |_| {
                warn!("Unparsable observation time '{}', using now", time);
                Utc::now()
            },
            |dt| dt.with_timezone(&Utc),
        ),
    }
}

fn into_reading(response: ForecastResponse) -> Result<WeatherReading> {
    let current = response
        .current_weather
        .ok_or_else(|| anyhow!("No current weather data available from Open-Meteo"))?;

    Ok(WeatherReading {
        temperature: current.temperature,
        wind_speed: current.windspeed,
        wind_direction: current.winddirection,
        observed_at: parse_observed_at(&current.time, response.utc_offset_seconds),
        weather_code: current.weathercode,
    })
}

#[async_trait]
impl WeatherProvider for OpenMeteoWeather {
    #[instrument(skip(self))]
    async fn current_weather(&self, latitude: f64, longitude: f64) -> Result<WeatherReading> {
        info!(
            "Getting current weather for coordinates: {:.4}, {:.4}",
            latitude, longitude
        );
        let start_time = Instant::now();

        let url = format!("{}/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo")?
            .error_for_status()
            .context("Open-Meteo returned an error status")?;

        let forecast: ForecastResponse = response
            .json()
            .await
            .context("Failed to parse Open-Meteo weather response")?;

        debug!(
            "Open-Meteo answered in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );

        into_reading(forecast)
    }
}
