//! Location model for resolved places and plain coordinates

use haversine::{Location as HaversineLocation, Units, distance};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in meters
    #[must_use]
    pub fn distance_meters(&self, other: &Coordinates) -> f64 {
        distance_meters(self, other)
    }
}

/// Haversine distance on a spherical earth (radius 6371 km), in meters
#[must_use]
pub fn distance_meters(from: &Coordinates, to: &Coordinates) -> f64 {
    let from = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from, to, Units::Kilometers) * 1000.0
}

/// A place name resolved by the geocoder.
///
/// Lives for one request only; both agents read it, nobody mutates it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeoLocation {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Canonical name reported by the geocoder
    pub display_name: String,
    /// Untouched provider candidate
    #[serde(default)]
    pub provider_raw: Value,
}

impl GeoLocation {
    /// Create a new location without a provider payload
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, display_name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            display_name: display_name.into(),
            provider_raw: Value::Null,
        }
    }

    /// Attach the provider's raw candidate
    #[must_use]
    pub fn with_raw(mut self, raw: Value) -> Self {
        self.provider_raw = raw;
        self
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hundredth_degree_at_equator() {
        let origin = Coordinates::new(0.0, 0.0);
        let north = Coordinates::new(0.01, 0.0);
        let meters = origin.distance_meters(&north);
        assert!((meters - 1113.0).abs() / 1113.0 < 0.01, "got {meters}");
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_on_self() {
        let paris = Coordinates::new(48.8566, 2.3522);
        let eiffel = Coordinates::new(48.8584, 2.2945);
        assert_eq!(paris.distance_meters(&paris), 0.0);
        let there = paris.distance_meters(&eiffel);
        let back = eiffel.distance_meters(&paris);
        assert!((there - back).abs() < 1e-6);
        assert!(there > 4000.0 && there < 4500.0, "got {there}");
    }

    #[test]
    fn test_location_formatting() {
        let location = GeoLocation::new(48.856_613, 2.352_222, "Paris, France");
        assert_eq!(location.format_coordinates(), "48.8566, 2.3522");
        assert_eq!(location.coordinates(), Coordinates::new(48.856_613, 2.352_222));
        assert!(location.provider_raw.is_null());
    }
}
