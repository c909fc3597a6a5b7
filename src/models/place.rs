//! Points of interest and the raw elements they are built from

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Coordinates;

/// An element as returned by a places provider, before filtering and ranking
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PlaceElement {
    /// Provider identifier, e.g. `node/123`
    pub id: String,
    /// Free-form provider tags, the display name lives under `name`
    pub tags: BTreeMap<String, String>,
    /// Direct coordinate, present for point features
    pub position: Option<Coordinates>,
    /// Centre of an area feature
    pub centroid: Option<Coordinates>,
}

impl PlaceElement {
    /// Non-empty `name` tag, if any
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.tags
            .get("name")
            .map(String::as_str)
            .filter(|name| !name.trim().is_empty())
    }

    /// Where distance is measured to: the direct coordinate, else the centroid
    #[must_use]
    pub fn anchor(&self) -> Option<Coordinates> {
        self.position.or(self.centroid)
    }
}

/// A named point of interest with its distance from the resolved place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlaceOfInterest {
    pub id: String,
    pub name: String,
    pub tags: BTreeMap<String, String>,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_meters: f64,
}

impl PlaceOfInterest {
    /// Short category label taken from the most descriptive tag
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        ["tourism", "amenity", "operator"]
            .iter()
            .find_map(|key| self.tags.get(*key))
            .map(String::as_str)
    }

    /// Distance rounded to whole meters, e.g. `420 m` or `2.3 km`
    #[must_use]
    pub fn format_distance(&self) -> String {
        if self.distance_meters < 1000.0 {
            format!("{:.0} m", self.distance_meters)
        } else {
            format!("{:.1} km", self.distance_meters / 1000.0)
        }
    }
}
