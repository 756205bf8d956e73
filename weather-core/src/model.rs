use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// A trimmed city name that is long enough to be sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub const EMPTY_MESSAGE: &'static str = "Please enter a city name";

    pub fn parse(text: &str, min_len: usize) -> Result<Self, WeatherError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(WeatherError::InvalidInput(Self::EMPTY_MESSAGE.to_string()));
        }
        if trimmed.chars().count() < min_len {
            return Err(WeatherError::InvalidInput(format!(
                "City name must be at least {min_len} characters"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions for one location, in the units the provider applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub location: String,
    pub temperature: f64,
    pub description: String,
    pub humidity: f64,
    pub wind_speed: f64,
    pub units: String,
    pub coordinates: Option<Coordinates>,
}

/// One representative forecast entry per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastItem {
    pub day: String,
    pub date: NaiveDate,
    pub icon: String,
    pub temperature: i64,
    pub description: String,
}

/// View-model published by the search controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub reading: Option<WeatherReading>,
    pub forecast: Vec<ForecastItem>,
    pub error: Option<String>,
    pub loading: bool,
    pub last_updated: Option<String>,
}

impl SearchState {
    pub fn has_result(&self) -> bool {
        self.reading.is_some()
    }
}
