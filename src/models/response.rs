//! Agent results and the aggregated response envelope

use serde::{Deserialize, Serialize};

use super::{GeoLocation, PlaceOfInterest, WeatherReading};
use crate::error::ErrorKind;

/// Outcome of one agent invocation: a payload at a location, or an error kind.
///
/// Serializes as either `{"location": .., "payload": ..}` or `{"error": ".."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentResult<T> {
    Found { location: GeoLocation, payload: T },
    Failed { error: ErrorKind },
}

pub type WeatherResult = AgentResult<WeatherReading>;
pub type PlacesResult = AgentResult<Vec<PlaceOfInterest>>;

impl<T> AgentResult<T> {
    #[must_use]
    pub fn found(location: GeoLocation, payload: T) -> Self {
        Self::Found { location, payload }
    }

    #[must_use]
    pub fn failed(error: ErrorKind) -> Self {
        Self::Failed { error }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    #[must_use]
    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            Self::Found { .. } => None,
            Self::Failed { error } => Some(*error),
        }
    }

    #[must_use]
    pub fn location(&self) -> Option<&GeoLocation> {
        match self {
            Self::Found { location, .. } => Some(location),
            Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Found { payload, .. } => Some(payload),
            Self::Failed { .. } => None,
        }
    }
}

/// Everything the orchestrator learned about one query.
///
/// A capability's field is present exactly when the query asked for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub original_query: String,
    pub resolved_place_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub places: Option<PlacesResult>,
}
