use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    Client, Response,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    WeatherError,
    config::ProviderConfig,
    forecast::{self, ForecastResponse},
    model::{Coordinates, ForecastItem, WeatherReading},
};

use super::WeatherClient;

/// Client for the RapidAPI-hosted current weather and forecast endpoints.
#[derive(Debug, Clone)]
pub struct RapidApiClient {
    http: Client,
    current_url: String,
    forecast_url: String,
}

impl RapidApiClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let headers = auth_headers(config)?;
        let http = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            current_url: config.current_url.clone(),
            forecast_url: config.forecast_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WeatherError> {
        debug!(url, "sending weather request");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(WeatherError::network)?;

        read_json(res).await
    }
}

fn auth_headers(config: &ProviderConfig) -> Result<HeaderMap> {
    let api_key = config.require_api_key()?;

    let mut headers = HeaderMap::new();
    let mut key = HeaderValue::from_str(api_key).context("API key is not a valid header value")?;
    key.set_sensitive(true);

    headers.insert(
        HeaderName::from_bytes(config.key_header.as_bytes())
            .with_context(|| format!("Invalid key header name: {}", config.key_header))?,
        key,
    );
    headers.insert(
        HeaderName::from_bytes(config.host_header.as_bytes())
            .with_context(|| format!("Invalid host header name: {}", config.host_header))?,
        HeaderValue::from_str(&config.api_host)
            .with_context(|| format!("Invalid API host: {}", config.api_host))?,
    );

    Ok(headers)
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, WeatherError> {
    let status = res.status();
    let body = res.text().await.map_err(WeatherError::network)?;

    if !status.is_success() {
        return Err(WeatherError::from_response(status, &body));
    }

    serde_json::from_str(&body).map_err(WeatherError::malformed)
}

fn log_failure<T>(operation: &str, result: Result<T, WeatherError>) -> Result<T, WeatherError> {
    if let Err(err) = &result {
        warn!(operation, kind = err.kind(), cause = %err.cause(), "weather request failed");
    }
    result
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: String,
    temperature: f64,
    description: String,
    humidity: f64,
    wind_speed: f64,
    units: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl From<CurrentResponse> for WeatherReading {
    fn from(r: CurrentResponse) -> Self {
        let coordinates = match (r.lat, r.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
            _ => None,
        };

        Self {
            location: r.location,
            temperature: r.temperature,
            description: r.description,
            humidity: r.humidity,
            wind_speed: r.wind_speed,
            units: r.units,
            coordinates,
        }
    }
}

#[async_trait]
impl WeatherClient for RapidApiClient {
    #[instrument(skip(self))]
    async fn fetch_current(&self, city: &str) -> Result<WeatherReading, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return log_failure(
                "current",
                Err(WeatherError::InvalidInput("City name cannot be empty".to_string())),
            );
        }

        let result = self
            .get_json::<CurrentResponse>(&self.current_url, &[("units", "metric"), ("location", city)])
            .await
            .map(WeatherReading::from);

        log_failure("current", result)
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<Vec<ForecastItem>, WeatherError> {
        let url = format!("{}/{lat}/{lon}", self.forecast_url);

        let result = self
            .get_json::<ForecastResponse>(&url, &[])
            .await
            .and_then(|parsed| forecast::daily_items(&parsed.list));

        log_failure("forecast", result)
    }
}
