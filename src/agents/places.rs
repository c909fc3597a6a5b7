use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{Agent, Capability};
use crate::error::ErrorKind;
use crate::models::{Coordinates, GeoLocation, PlaceElement, PlaceOfInterest, PlacesResult};
use crate::providers::{GeocodeResolver, NearbyQuery, PlacesProvider};

/// Named points of interest around the resolved place, nearest first
#[derive(Debug, Clone)]
pub struct NearbyPlaces {
    provider: Arc<dyn PlacesProvider>,
    default_radius_meters: u32,
    result_limit: usize,
}

impl NearbyPlaces {
    pub fn new(
        provider: Arc<dyn PlacesProvider>,
        default_radius_meters: u32,
        result_limit: usize,
    ) -> Self {
        Self {
            provider,
            default_radius_meters,
            result_limit,
        }
    }
}

/// Keep named elements with a usable coordinate, nearest first, at most `limit`
#[must_use]
pub fn rank_places(
    origin: Coordinates,
    elements: Vec<PlaceElement>,
    limit: usize,
) -> Vec<PlaceOfInterest> {
    let mut places: Vec<PlaceOfInterest> = elements
        .into_iter()
        .filter_map(|element| {
            let name = element.name()?.to_string();
            let anchor = element.anchor()?;
            let distance_meters = origin.distance_meters(&anchor);
            if !distance_meters.is_finite() {
                return None;
            }
            Some(PlaceOfInterest {
                id: element.id,
                name,
                tags: element.tags,
                latitude: anchor.latitude,
                longitude: anchor.longitude,
                distance_meters,
            })
        })
        .collect();

    places.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    places.truncate(limit);
    places
}

#[async_trait]
impl Capability for NearbyPlaces {
    /// Search radius in meters
    type Request = u32;
    type Payload = Vec<PlaceOfInterest>;

    const NAME: &'static str = "places";
    const UNAVAILABLE: ErrorKind = ErrorKind::PlacesUnavailable;

    async fn fetch(
        &self,
        location: &GeoLocation,
        radius_meters: &u32,
    ) -> anyhow::Result<Vec<PlaceOfInterest>> {
        let query = NearbyQuery {
            latitude: location.latitude,
            longitude: location.longitude,
            radius_meters: *radius_meters,
            limit: self.result_limit,
        };
        let elements = self.provider.nearby(&query).await?;
        let received = elements.len();

        let places = rank_places(location.coordinates(), elements, self.result_limit);
        debug!(
            "Kept {} of {} elements around '{}'",
            places.len(),
            received,
            location.display_name
        );
        Ok(places)
    }
}

pub type PlacesAgent = Agent<NearbyPlaces>;

impl Agent<NearbyPlaces> {
    pub fn places(
        resolver: Arc<dyn GeocodeResolver>,
        capability: NearbyPlaces,
        call_timeout: Duration,
    ) -> Self {
        Self::new(resolver, capability, call_timeout)
    }

    /// Radius used when the caller does not choose one
    #[must_use]
    pub fn default_radius(&self) -> u32 {
        self.capability().default_radius_meters
    }

    /// Places around a free-text place phrase within `radius_meters`
    #[instrument(skip(self))]
    pub async fn handle(&self, place_text: &str, radius_meters: u32) -> PlacesResult {
        self.run(place_text, &radius_meters).await
    }

    /// Places around a free-text place phrase within the default radius
    pub async fn handle_default(&self, place_text: &str) -> PlacesResult {
        self.handle(place_text, self.default_radius()).await
    }

    /// Places around a place the caller already resolved
    pub async fn handle_resolved(
        &self,
        location: Option<&GeoLocation>,
        radius_meters: u32,
    ) -> PlacesResult {
        self.run_resolved(location, &radius_meters).await
    }
}
