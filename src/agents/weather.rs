use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use super::{Agent, Capability};
use crate::error::ErrorKind;
use crate::models::{GeoLocation, WeatherReading, WeatherResult};
use crate::providers::{GeocodeResolver, WeatherProvider};

/// Current conditions at the resolved place
#[derive(Debug, Clone)]
pub struct CurrentWeather {
    provider: Arc<dyn WeatherProvider>,
}

impl CurrentWeather {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Capability for CurrentWeather {
    type Request = ();
    type Payload = WeatherReading;

    const NAME: &'static str = "weather";
    const UNAVAILABLE: ErrorKind = ErrorKind::WeatherUnavailable;

    async fn fetch(&self, location: &GeoLocation, _request: &()) -> anyhow::Result<WeatherReading> {
        self.provider
            .current_weather(location.latitude, location.longitude)
            .await
    }
}

pub type WeatherAgent = Agent<CurrentWeather>;

impl Agent<CurrentWeather> {
    pub fn weather(
        resolver: Arc<dyn GeocodeResolver>,
        provider: Arc<dyn WeatherProvider>,
        call_timeout: Duration,
    ) -> Self {
        Self::new(resolver, CurrentWeather::new(provider), call_timeout)
    }

    /// Current weather for a free-text place phrase
    #[instrument(skip(self))]
    pub async fn handle(&self, place_text: &str) -> WeatherResult {
        self.run(place_text, &()).await
    }

    /// Current weather for a place the caller already resolved
    pub async fn handle_resolved(&self, location: Option<&GeoLocation>) -> WeatherResult {
        self.run_resolved(location, &()).await
    }
}
