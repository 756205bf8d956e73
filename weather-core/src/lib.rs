//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider client and its error taxonomy
//! - Shared domain models (readings, forecast days, search state)
//! - A debounced search controller that a front end drives with input changes
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod controller;
pub mod error;
pub mod forecast;
pub mod icon;
pub mod model;
pub mod provider;

pub use config::{Config, ProviderConfig, SearchConfig};
pub use controller::SearchController;
pub use error::WeatherError;
pub use icon::{icon_code, icon_url, weather_icon_url};
pub use model::{Coordinates, ForecastItem, SearchQuery, SearchState, WeatherReading};
pub use provider::{WeatherClient, client_from_config, rapidapi::RapidApiClient};
