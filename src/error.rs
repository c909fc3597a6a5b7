//! Error types and handling for the tourism planner
//!
//! Two layers live here: [`ErrorKind`] is the data-level failure an agent
//! reports inside its result, while [`PlannerError`] covers infrastructure
//! problems (configuration, HTTP client setup, whole-query deadlines).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by an agent as part of its result.
///
/// These never cross an agent boundary as a Rust error; the orchestrator
/// copies them into the response envelope unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Geocoding yielded no match or the geocoding provider failed
    #[error("place not found")]
    PlaceNotFound,

    /// Weather provider failed or returned no current conditions
    #[error("weather service unavailable")]
    WeatherUnavailable,

    /// Places provider failed or timed out
    #[error("places service unavailable")]
    PlacesUnavailable,
}

impl ErrorKind {
    /// Message suitable for showing to the person who asked the question
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::PlaceNotFound => "I don't think this place exists.",
            ErrorKind::WeatherUnavailable => "Weather service unavailable.",
            ErrorKind::PlacesUnavailable => "Places service unavailable.",
        }
    }
}

/// Main error type for the planner's infrastructure
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// HTTP client construction errors
    #[error("HTTP client error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// A whole query did not finish before its deadline
    #[error("Query timed out after {:.1}s", .after.as_secs_f64())]
    Timeout { after: Duration },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    #[must_use]
    pub fn timeout(after: Duration) -> Self {
        Self::Timeout { after }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            PlannerError::Http { .. } => {
                "Unable to set up connections to external services.".to_string()
            }
            PlannerError::Timeout { .. } => {
                "The request took too long. Please try again.".to_string()
            }
            PlannerError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
