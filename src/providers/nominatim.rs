use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, instrument};

use super::GeocodeResolver;
use crate::config::GeocodingConfig;
use crate::models::GeoLocation;

/// Geocoder backed by the OpenStreetMap Nominatim search API
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    result_limit: u32,
}

/// The fields we read from a Nominatim candidate; the rest stays in the raw payload
#[derive(Debug, Deserialize)]
struct NominatimCandidate {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

impl NominatimGeocoder {
    /// Create a new geocoder
    pub fn new(config: &GeocodingConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            result_limit: config.result_limit,
        })
    }

    async fn search(&self, place_text: &str) -> Result<Vec<Value>> {
        let url = format!("{}/search", self.base_url);
        let limit = self.result_limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", place_text),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to Nominatim")?
            .error_for_status()
            .context("Nominatim returned an error status")?;

        response
            .json()
            .await
            .context("Failed to parse Nominatim search response")
    }
}

/// Turn one raw Nominatim candidate into a location, keeping the raw JSON
fn parse_candidate(raw: Value, place_text: &str) -> Result<GeoLocation> {
    let candidate: NominatimCandidate = serde_json::from_value(raw.clone())
        .context("Nominatim candidate is missing coordinates")?;

    let latitude: f64 = candidate
        .lat
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid latitude '{}' from Nominatim", candidate.lat))?;
    let longitude: f64 = candidate
        .lon
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid longitude '{}' from Nominatim", candidate.lon))?;

    let display_name = candidate
        .display_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| place_text.to_string());

    Ok(GeoLocation::new(latitude, longitude, display_name).with_raw(raw))
}

#[async_trait]
impl GeocodeResolver for NominatimGeocoder {
    #[instrument(skip(self), fields(place = place_text))]
    async fn lookup(&self, place_text: &str) -> Result<Option<GeoLocation>> {
        info!("Geocoding location: '{}'", place_text);
        let start_time = Instant::now();

        let candidates = self.search(place_text).await?;
        debug!(
            "Nominatim returned {} candidates in {:.3}s",
            candidates.len(),
            start_time.elapsed().as_secs_f64()
        );

        candidates
            .into_iter()
            .next()
            .map(|raw| parse_candidate(raw, place_text))
            .transpose()
    }
}
