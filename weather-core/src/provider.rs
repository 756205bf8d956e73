use crate::{
    Config, WeatherError,
    model::{ForecastItem, WeatherReading},
    provider::rapidapi::RapidApiClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod rapidapi;

/// Lookup operations against the weather provider.
///
/// Implementations make a single attempt per call and hand back errors
/// already normalized into [`WeatherError`].
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_current(&self, city: &str) -> Result<WeatherReading, WeatherError>;

    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<Vec<ForecastItem>, WeatherError>;
}

/// Construct the HTTP client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherClient>> {
    let client = RapidApiClient::new(&config.provider)?;
    Ok(Arc::new(client))
}
