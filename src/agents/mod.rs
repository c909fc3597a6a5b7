//! Child agents
//!
//! Every agent has the same shape: resolve the place, make one provider call,
//! wrap success or failure into an [`AgentResult`]. [`Agent`] implements that
//! shape once; a [`Capability`] supplies the provider call and the error kind
//! reported when it fails.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ErrorKind;
use crate::models::{AgentResult, GeoLocation};
use crate::providers::GeocodeResolver;

pub mod places;
pub mod weather;

pub use places::{NearbyPlaces, PlacesAgent, rank_places};
pub use weather::{CurrentWeather, WeatherAgent};

/// The provider-specific half of an agent
#[async_trait]
pub trait Capability: Send + Sync {
    /// Extra input beyond the resolved location
    type Request: Send + Sync;
    type Payload: Send;

    /// Used in logs
    const NAME: &'static str;
    /// Reported when [`Capability::fetch`] fails or times out
    const UNAVAILABLE: ErrorKind;

    async fn fetch(&self, location: &GeoLocation, request: &Self::Request)
    -> anyhow::Result<Self::Payload>;
}

/// Resolve, fetch once, report. No retries.
#[derive(Debug)]
pub struct Agent<C> {
    resolver: Arc<dyn GeocodeResolver>,
    capability: C,
    call_timeout: Duration,
    resolve_timeout: Duration,
}

impl<C: Capability> Agent<C> {
    /// Geocoding is bounded by `call_timeout` until [`Agent::with_resolve_timeout`] says otherwise
    pub fn new(resolver: Arc<dyn GeocodeResolver>, capability: C, call_timeout: Duration) -> Self {
        Self {
            resolver,
            capability,
            call_timeout,
            resolve_timeout: call_timeout,
        }
    }

    #[must_use]
    pub fn with_resolve_timeout(mut self, resolve_timeout: Duration) -> Self {
        self.resolve_timeout = resolve_timeout;
        self
    }

    #[must_use]
    pub fn capability(&self) -> &C {
        &self.capability
    }

    /// Resolve `place_text` with this agent's resolver, then fetch.
    pub async fn run(&self, place_text: &str, request: &C::Request) -> AgentResult<C::Payload> {
        let location = self.resolver.resolve(place_text, self.resolve_timeout).await;
        self.run_resolved(location.as_ref(), request).await
    }

    /// Fetch for a place somebody else already resolved. `None` means it was not found.
    pub async fn run_resolved(
        &self,
        location: Option<&GeoLocation>,
        request: &C::Request,
    ) -> AgentResult<C::Payload> {
        let Some(location) = location else {
            debug!("{} agent: place not found", C::NAME);
            return AgentResult::failed(ErrorKind::PlaceNotFound);
        };

        match tokio::time::timeout(self.call_timeout, self.capability.fetch(location, request))
            .await
        {
            Ok(Ok(payload)) => AgentResult::found(location.clone(), payload),
            Ok(Err(err)) => {
                warn!(
                    "{} provider failed for '{}': {:#}",
                    C::NAME,
                    location.display_name,
                    err
                );
                AgentResult::failed(C::UNAVAILABLE)
            }
            Err(_) => {
                warn!(
                    "{} provider timed out after {:.1}s for '{}'",
                    C::NAME,
                    self.call_timeout.as_secs_f64(),
                    location.display_name
                );
                AgentResult::failed(C::UNAVAILABLE)
            }
        }
    }
}
