//! Data models for the tourism planner
//!
//! This module contains the core domain models organized by concern:
//! - Location: resolved places and raw coordinates
//! - Weather: current conditions at a resolved place
//! - Place: points of interest around a resolved place
//! - Response: per-agent results and the aggregated envelope

pub mod location;
pub mod place;
pub mod response;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{Coordinates, GeoLocation, distance_meters};
pub use place::{PlaceElement, PlaceOfInterest};
pub use response::{AgentResult, PlacesResult, ResponseEnvelope, WeatherResult};
pub use weather::WeatherReading;
