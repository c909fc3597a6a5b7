//! Tourism planner - multi-agent answers to travel questions
//!
//! A free-text query is classified into weather and/or places intent, its
//! place phrase is geocoded once, and the matching agents run concurrently.
//! A failing agent never hides the other agent's result.

pub mod agents;
pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod providers;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use agents::{Agent, Capability, PlacesAgent, WeatherAgent};
pub use classifier::{Intent, Topic, classify};
pub use config::PlannerConfig;
pub use error::{ErrorKind, PlannerError};
pub use models::{
    AgentResult, GeoLocation, PlaceOfInterest, PlacesResult, ResponseEnvelope, WeatherReading,
    WeatherResult,
};
pub use orchestrator::Orchestrator;
pub use providers::{GeocodeResolver, NearbyQuery, PlacesProvider, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;
