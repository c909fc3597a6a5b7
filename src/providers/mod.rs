//! Downstream data providers
//!
//! Each provider is an opaque network service behind a narrow async trait so
//! any implementation satisfying the contract can be swapped in:
//! - [`GeocodeResolver`]: place phrase to coordinates (Nominatim)
//! - [`WeatherProvider`]: coordinates to current conditions (Open-Meteo)
//! - [`PlacesProvider`]: coordinates and radius to raw elements (Overpass)

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::models::{GeoLocation, PlaceElement, WeatherReading};

pub mod nominatim;
pub mod open_meteo;
pub mod overpass;

pub use nominatim::NominatimGeocoder;
pub use open_meteo::OpenMeteoWeather;
pub use overpass::OverpassPlaces;

/// Turns a place phrase into coordinates.
#[async_trait]
pub trait GeocodeResolver: Send + Sync + Debug {
    /// One provider round trip. `Ok(None)` means the provider had no candidate.
    async fn lookup(&self, place_text: &str) -> anyhow::Result<Option<GeoLocation>>;

    /// Best match for `place_text`, or `None` when it cannot be resolved.
    ///
    /// Empty phrases never reach the provider. The lookup is bounded by
    /// `timeout`, and every failure mode collapses to `None`.
    async fn resolve(&self, place_text: &str, timeout: Duration) -> Option<GeoLocation> {
        let place_text = place_text.trim();
        if place_text.is_empty() {
            debug!("Empty place phrase, skipping geocoding");
            return None;
        }

        match tokio::time::timeout(timeout, self.lookup(place_text)).await {
            Ok(Ok(Some(location))) => Some(location),
            Ok(Ok(None)) => {
                debug!("No geocoding candidate for '{}'", place_text);
                None
            }
            Ok(Err(err)) => {
                warn!("Geocoding '{}' failed: {:#}", place_text, err);
                None
            }
            Err(_) => {
                warn!(
                    "Geocoding '{}' timed out after {:.1}s",
                    place_text,
                    timeout.as_secs_f64()
                );
                None
            }
        }
    }
}

/// Current conditions at a coordinate.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Errors when the call fails or the response has no current conditions.
    async fn current_weather(&self, latitude: f64, longitude: f64) -> anyhow::Result<WeatherReading>;
}

/// Parameters of a nearby search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: u32,
    /// Upper bound on elements requested from the provider
    pub limit: usize,
}

/// Points of interest around a coordinate.
#[async_trait]
pub trait PlacesProvider: Send + Sync + Debug {
    /// Raw, unfiltered elements. An empty list is a valid answer.
    async fn nearby(&self, query: &NearbyQuery) -> anyhow::Result<Vec<PlaceElement>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

    #[derive(Debug, Default)]
    struct ScriptedGeocoder {
        calls: AtomicUsize,
        fail: bool,
        hang: bool,
    }

    #[async_trait]
    impl GeocodeResolver for ScriptedGeocoder {
        async fn lookup(&self, place_text: &str) -> anyhow::Result<Option<GeoLocation>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if self.fail {
                return Err(anyhow!("connection reset"));
            }
            Ok((place_text == "paris").then(|| GeoLocation::new(48.85, 2.35, "Paris")))
        }
    }

    #[tokio::test]
    async fn test_empty_phrase_short_circuits() {
        let geocoder = ScriptedGeocoder::default();
        assert!(geocoder.resolve("", LOOKUP_TIMEOUT).await.is_none());
        assert!(geocoder.resolve("   ", LOOKUP_TIMEOUT).await.is_none());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_trims_and_returns_candidate() {
        let geocoder = ScriptedGeocoder::default();
        let location = geocoder.resolve("  paris ", LOOKUP_TIMEOUT).await.unwrap();
        assert_eq!(location.display_name, "Paris");
        assert!(geocoder.resolve("atlantis", LOOKUP_TIMEOUT).await.is_none());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_collapses_to_none() {
        let geocoder = ScriptedGeocoder {
            fail: true,
            ..Default::default()
        };
        assert!(geocoder.resolve("paris", LOOKUP_TIMEOUT).await.is_none());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_provider_times_out_to_none() {
        let geocoder = ScriptedGeocoder {
            hang: true,
            ..Default::default()
        };
        let started = tokio::time::Instant::now();
        assert!(geocoder.resolve("paris", LOOKUP_TIMEOUT).await.is_none());
        let elapsed = started.elapsed();
        assert!(elapsed >= LOOKUP_TIMEOUT);
        assert!(elapsed < Duration::from_secs(3600));
    }
}
