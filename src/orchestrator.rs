//! Query orchestration
//!
//! Classifies a query, resolves its place once and fans out to the requested
//! agents concurrently. The orchestrator itself never fails: every provider
//! problem ends up as an [`ErrorKind`](crate::ErrorKind) inside the envelope.

use std::sync::Arc;
use std::time::Duration;

use futures::future::OptionFuture;
use tracing::{debug, info, instrument};

use crate::agents::{NearbyPlaces, PlacesAgent, WeatherAgent};
use crate::classifier::classify;
use crate::config::PlannerConfig;
use crate::models::ResponseEnvelope;
use crate::providers::{
    GeocodeResolver, NominatimGeocoder, OpenMeteoWeather, OverpassPlaces, PlacesProvider,
    WeatherProvider,
};
use crate::{PlannerError, Result};

/// Owns the resolver and both agents; share one instance behind an `Arc`
#[derive(Debug)]
pub struct Orchestrator {
    resolver: Arc<dyn GeocodeResolver>,
    resolve_timeout: Duration,
    weather: WeatherAgent,
    places: PlacesAgent,
}

impl Orchestrator {
    /// Both agents should hold the same resolver as `resolver`
    pub fn new(
        resolver: Arc<dyn GeocodeResolver>,
        resolve_timeout: Duration,
        weather: WeatherAgent,
        places: PlacesAgent,
    ) -> Self {
        Self {
            resolver,
            resolve_timeout,
            weather,
            places,
        }
    }

    /// Wire up the HTTP-backed providers described by `config`
    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        let resolver: Arc<dyn GeocodeResolver> =
            Arc::new(NominatimGeocoder::new(&config.geocoding)?);
        let weather_provider: Arc<dyn WeatherProvider> =
            Arc::new(OpenMeteoWeather::new(&config.weather)?);
        let places_provider: Arc<dyn PlacesProvider> =
            Arc::new(OverpassPlaces::new(&config.places)?);

        Ok(Self::with_providers(
            resolver,
            weather_provider,
            places_provider,
            config,
        ))
    }

    /// Build agents around arbitrary providers, taking limits and timeouts from `config`
    pub fn with_providers(
        resolver: Arc<dyn GeocodeResolver>,
        weather_provider: Arc<dyn WeatherProvider>,
        places_provider: Arc<dyn PlacesProvider>,
        config: &PlannerConfig,
    ) -> Self {
        let resolve_timeout = config.geocoding.timeout();
        let weather = WeatherAgent::weather(
            resolver.clone(),
            weather_provider,
            config.weather.timeout(),
        )
        .with_resolve_timeout(resolve_timeout);
        let places = PlacesAgent::places(
            resolver.clone(),
            NearbyPlaces::new(
                places_provider,
                config.places.default_radius_meters,
                config.places.result_limit,
            ),
            config.places.timeout(),
        )
        .with_resolve_timeout(resolve_timeout);
        Self::new(resolver, resolve_timeout, weather, places)
    }

    #[must_use]
    pub fn weather_agent(&self) -> &WeatherAgent {
        &self.weather
    }

    #[must_use]
    pub fn places_agent(&self) -> &PlacesAgent {
        &self.places
    }

    /// Answer one raw query
    #[instrument(skip(self))]
    pub async fn handle(&self, raw_query: &str) -> ResponseEnvelope {
        let intent = classify(raw_query);
        debug!(
            "Intent: weather={} places={} place='{}'",
            intent.wants_weather, intent.wants_places, intent.place_text
        );

        let location = if intent.wants_any() {
            self.resolver
                .resolve(&intent.place_text, self.resolve_timeout)
                .await
        } else {
            None
        };

        let weather = OptionFuture::from(
            intent
                .wants_weather
                .then(|| self.weather.handle_resolved(location.as_ref())),
        );
        let places = OptionFuture::from(intent.wants_places.then(|| {
            self.places
                .handle_resolved(location.as_ref(), self.places.default_radius())
        }));
        let (weather, places) = tokio::join!(weather, places);

        info!(
            "Answered '{}': weather={:?} places={:?}",
            raw_query,
            weather.as_ref().map(|r| r.error()),
            places.as_ref().map(|r| r.error())
        );

        ResponseEnvelope {
            original_query: raw_query.to_string(),
            resolved_place_text: intent.place_text,
            weather,
            places,
        }
    }

    /// Like [`Orchestrator::handle`], but gives up after `deadline`.
    ///
    /// In-flight provider calls are dropped on timeout and no envelope is produced.
    pub async fn handle_with_deadline(
        &self,
        raw_query: &str,
        deadline: Duration,
    ) -> Result<ResponseEnvelope> {
        tokio::time::timeout(deadline, self.handle(raw_query))
            .await
            .map_err(|_| PlannerError::timeout(deadline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::{
        FakeGeocoder, FakePlaces, FakeWeather, SilentGeocoder, WeatherBehavior, element,
        sunny_reading,
    };
    use crate::error::ErrorKind;

    fn build(weather: WeatherBehavior, places: FakePlaces) -> (Arc<FakeGeocoder>, Orchestrator) {
        let geocoder = Arc::new(FakeGeocoder::default());
        let orchestrator = Orchestrator::with_providers(
            geocoder.clone(),
            Arc::new(FakeWeather(weather)),
            Arc::new(places),
            &PlannerConfig::default(),
        );
        (geocoder, orchestrator)
    }

    #[tokio::test]
    async fn test_weather_only_query() {
        let (_, orchestrator) = build(WeatherBehavior::Sunny, FakePlaces::failing());
        let envelope = orchestrator.handle("Weather in Paris").await;

        assert_eq!(envelope.original_query, "Weather in Paris");
        assert_eq!(envelope.resolved_place_text, "paris");
        let weather = envelope.weather.unwrap();
        assert_eq!(weather.location().unwrap().display_name, "Paris, France");
        assert_eq!(weather.payload(), Some(&sunny_reading()));
        assert!(envelope.places.is_none());
    }

    #[tokio::test]
    async fn test_places_only_query_with_unresolvable_phrase() {
        let (_, orchestrator) = build(
            WeatherBehavior::Sunny,
            FakePlaces::serving(vec![element("node/1", Some("Senso-ji"), Some((35.71, 139.79)))]),
        );
        let envelope = orchestrator.handle("Attractions near Tokyo").await;

        assert_eq!(envelope.resolved_place_text, "attractions near tokyo");
        assert!(envelope.weather.is_none());
        assert_eq!(
            envelope.places.unwrap().error(),
            Some(ErrorKind::PlaceNotFound)
        );
    }

    #[tokio::test]
    async fn test_ambiguous_query_asks_both_and_resolves_once() {
        let (geocoder, orchestrator) = build(
            WeatherBehavior::Sunny,
            FakePlaces::serving(vec![element("node/1", Some("Louvre"), Some((48.8606, 2.3376)))]),
        );
        let envelope = orchestrator.handle("Paris").await;

        assert!(envelope.weather.unwrap().is_found());
        let places = envelope.places.unwrap();
        assert_eq!(places.payload().unwrap()[0].name, "Louvre");
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_result() {
        let (_, orchestrator) = build(
            WeatherBehavior::Fails,
            FakePlaces::serving(Vec::new()),
        );
        let envelope = orchestrator.handle("paris").await;

        assert_eq!(
            envelope.weather.unwrap().error(),
            Some(ErrorKind::WeatherUnavailable)
        );
        assert_eq!(envelope.places.unwrap().payload(), Some(&Vec::new()));
    }

    #[tokio::test]
    async fn test_unknown_place_fails_both_agents() {
        let (_, orchestrator) = build(WeatherBehavior::Sunny, FakePlaces::failing());
        let envelope = orchestrator.handle("Atlantis").await;

        assert_eq!(
            envelope.weather.unwrap().error(),
            Some(ErrorKind::PlaceNotFound)
        );
        assert_eq!(
            envelope.places.unwrap().error(),
            Some(ErrorKind::PlaceNotFound)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_is_bounded_by_agent_timeout() {
        let (_, orchestrator) = build(WeatherBehavior::Hangs, FakePlaces::serving(Vec::new()));
        let envelope = orchestrator.handle("paris").await;

        assert_eq!(
            envelope.weather.unwrap().error(),
            Some(ErrorKind::WeatherUnavailable)
        );
        assert!(envelope.places.unwrap().is_found());
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_geocoder_is_bounded_by_geocoding_timeout() {
        let config = PlannerConfig::default();
        let orchestrator = Orchestrator::with_providers(
            Arc::new(SilentGeocoder),
            Arc::new(FakeWeather(WeatherBehavior::Sunny)),
            Arc::new(FakePlaces::serving(Vec::new())),
            &config,
        );

        let started = tokio::time::Instant::now();
        let envelope = orchestrator.handle("weather in paris").await;
        let elapsed = started.elapsed();

        assert_eq!(
            envelope.weather.unwrap().error(),
            Some(ErrorKind::PlaceNotFound)
        );
        assert!(elapsed >= config.geocoding.timeout());
        assert!(elapsed < Duration::from_secs(60));

        let direct = orchestrator.places_agent().handle("paris", 500).await;
        assert_eq!(direct.error(), Some(ErrorKind::PlaceNotFound));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_publishes_nothing() {
        let (_, orchestrator) = build(WeatherBehavior::Hangs, FakePlaces::serving(Vec::new()));
        let result = orchestrator
            .handle_with_deadline("weather in paris", Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(PlannerError::Timeout { .. })));

        let (_, orchestrator) = build(WeatherBehavior::Sunny, FakePlaces::serving(Vec::new()));
        let envelope = orchestrator
            .handle_with_deadline("weather in paris", Duration::from_secs(1))
            .await
            .unwrap();
        assert!(envelope.weather.unwrap().is_found());
    }

    #[test]
    fn test_from_config_builds_shared_instance() {
        let orchestrator = Orchestrator::from_config(&PlannerConfig::default()).unwrap();
        assert_eq!(orchestrator.places_agent().default_radius(), 3000);
    }
}
