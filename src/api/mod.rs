//! JSON HTTP API over the orchestrator and both agents

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{PlacesResult, ResponseEnvelope, WeatherResult};
use crate::orchestrator::Orchestrator;
use crate::VERSION;

/// Radii outside this range are rejected before any provider is called
const MAX_RADIUS_METERS: u32 = 50_000;

type SharedOrchestrator = Arc<Orchestrator>;

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct PlaceParams {
    #[serde(default)]
    pub place: String,
    pub radius: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

pub fn router(orchestrator: SharedOrchestrator) -> Router {
    Router::new()
        .route("/query", get(get_query))
        .route("/weather", get(get_weather))
        .route("/places", get(get_places))
        .route("/health", get(get_health))
        .with_state(orchestrator)
}

fn non_empty(text: &str) -> Result<&str, StatusCode> {
    let text = text.trim();
    if text.is_empty() {
        Err(StatusCode::BAD_REQUEST)
    } else {
        Ok(text)
    }
}

async fn get_query(
    State(orchestrator): State<SharedOrchestrator>,
    Query(params): Query<QueryParams>,
) -> Result<Json<ResponseEnvelope>, StatusCode> {
    non_empty(&params.q)?;
    Ok(Json(orchestrator.handle(&params.q).await))
}

async fn get_weather(
    State(orchestrator): State<SharedOrchestrator>,
    Query(params): Query<PlaceParams>,
) -> Result<Json<WeatherResult>, StatusCode> {
    let place = non_empty(&params.place)?.to_lowercase();
    Ok(Json(orchestrator.weather_agent().handle(&place).await))
}

async fn get_places(
    State(orchestrator): State<SharedOrchestrator>,
    Query(params): Query<PlaceParams>,
) -> Result<Json<PlacesResult>, StatusCode> {
    let place = non_empty(&params.place)?.to_lowercase();
    let agent = orchestrator.places_agent();
    let radius = params.radius.unwrap_or_else(|| agent.default_radius());
    if !(1..=MAX_RADIUS_METERS).contains(&radius) {
        debug!("Rejecting radius {}", radius);
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(agent.handle(&place, radius).await))
}

async fn get_health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    })
}
