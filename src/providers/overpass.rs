use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, instrument};

use super::{NearbyQuery, PlacesProvider};
use crate::config::PlacesConfig;
use crate::models::{Coordinates, PlaceElement};

/// Places provider backed by the OpenStreetMap Overpass API
#[derive(Debug, Clone)]
pub struct OverpassPlaces {
    client: Client,
    base_url: String,
    /// Server-side query timeout, kept in step with the client timeout
    server_timeout_seconds: u32,
}

/// Overpass JSON response. A body without `elements` reads as zero results.
#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type", default)]
    kind: String,
    id: u64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

impl From<OverpassElement> for PlaceElement {
    fn from(element: OverpassElement) -> Self {
        let position = element.lat.zip(element.lon).map(|(lat, lon)| Coordinates::new(lat, lon));
        let id = if element.kind.is_empty() {
            element.id.to_string()
        } else {
            format!("{}/{}", element.kind, element.id)
        };

        Self {
            id,
            tags: element.tags,
            position,
            centroid: element
                .center
                .map(|center| Coordinates::new(center.lat, center.lon)),
        }
    }
}

impl OverpassPlaces {
    /// Create a new Overpass client
    pub fn new(config: &PlacesConfig) -> crate::Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            server_timeout_seconds: config.timeout_seconds,
        })
    }
}

/// Overpass QL for tourism and amenity nodes and ways around a point
fn build_query(query: &NearbyQuery, server_timeout_seconds: u32) -> String {
    let around = format!(
        "around:{},{},{}",
        query.radius_meters, query.latitude, query.longitude
    );
    format!(
        "[out:json][timeout:{server_timeout_seconds}];\n\
         (\n  \
         node({around})[tourism];\n  \
         node({around})[amenity];\n  \
         way({around})[tourism];\n  \
         way({around})[amenity];\n\
         );\n\
         out center {};\n",
        query.limit
    )
}

#[async_trait]
impl PlacesProvider for OverpassPlaces {
    #[instrument(skip(self))]
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<PlaceElement>> {
        info!(
            "Searching places within {}m of ({:.4}, {:.4})",
            query.radius_meters, query.latitude, query.longitude
        );
        let start_time = Instant::now();

        let url = format!("{}/interpreter", self.base_url);
        let body = build_query(query, self.server_timeout_seconds);
        debug!("Overpass query: {}", body);

        let response = self
            .client
            .post(&url)
            .form(&[("data", body)])
            .send()
            .await
            .context("Failed to send request to Overpass")?
            .error_for_status()
            .context("Overpass returned an error status")?;

        let parsed: OverpassResponse = response
            .json()
            .await
            .context("Failed to parse Overpass response")?;

        info!(
            "Overpass returned {} elements in {:.3}s",
            parsed.elements.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(parsed.elements.into_iter().map(PlaceElement::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_query() {
        let query = NearbyQuery {
            latitude: 48.85,
            longitude: 2.35,
            radius_meters: 3000,
            limit: 20,
        };
        let ql = build_query(&query, 25);
        assert!(ql.starts_with("[out:json][timeout:25];"));
        assert!(ql.contains("node(around:3000,48.85,2.35)[tourism];"));
        assert!(ql.contains("way(around:3000,48.85,2.35)[amenity];"));
        assert!(ql.trim_end().ends_with("out center 20;"));
    }

    #[test]
    fn test_elements_convert_with_centroid_and_tags() {
        let body = json!({
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 48.8584, "lon": 2.2945,
                 "tags": {"name": "Tour Eiffel", "tourism": "attraction"}},
                {"type": "way", "id": 2, "center": {"lat": 48.8606, "lon": 2.3376},
                 "tags": {"name": "Musée du Louvre", "tourism": "museum"}},
                {"type": "node", "id": 3, "lat": 48.86, "lon": 2.35}
            ]
        });

        let response: OverpassResponse = serde_json::from_value(body).unwrap();
        let elements: Vec<PlaceElement> =
            response.elements.into_iter().map(PlaceElement::from).collect();

        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].id, "node/1");
        assert_eq!(elements[0].position, Some(Coordinates::new(48.8584, 2.2945)));
        assert_eq!(elements[1].id, "way/2");
        assert_eq!(elements[1].position, None);
        assert_eq!(elements[1].centroid, Some(Coordinates::new(48.8606, 2.3376)));
        assert_eq!(elements[1].name(), Some("Musée du Louvre"));
        assert!(elements[2].tags.is_empty());
    }

    #[test]
    fn test_unexpected_shape_reads_as_no_elements() {
        let response: OverpassResponse =
            serde_json::from_value(json!({"remark": "runtime error"})).unwrap();
        assert!(response.elements.is_empty());
    }

    #[test]
    fn test_client_creation() {
        let client = OverpassPlaces::new(&PlacesConfig::default()).unwrap();
        assert_eq!(client.base_url, "https://overpass-api.de/api");
        assert_eq!(client.server_timeout_seconds, 25);
    }
}
