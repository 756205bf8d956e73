use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::{error::WeatherError, model::ForecastItem};

/// Number of days kept from the provider feed.
pub const FORECAST_DAYS: usize = 5;

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub list: Vec<ForecastEntry>,
}

/// Every field is required so an incomplete feed fails to parse.
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastEntry {
    pub dt: i64,
    pub main: ForecastMain,
    pub weather: Vec<ForecastWeather>,
    pub dt_txt: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastMain {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastWeather {
    pub icon: String,
    pub description: String,
}

/// Collapse a multi-entry-per-day feed to the first entry of each calendar
/// date, in feed order, keeping at most [`FORECAST_DAYS`] days.
pub(crate) fn daily_items(entries: &[ForecastEntry]) -> Result<Vec<ForecastItem>, WeatherError> {
    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(FORECAST_DAYS);

    for entry in entries {
        if items.len() == FORECAST_DAYS {
            break;
        }

        let date = entry_date(&entry.dt_txt)?;
        if !seen.insert(date) {
            continue;
        }

        let weather = entry.weather.first().ok_or_else(|| {
            WeatherError::malformed(format!("forecast entry {} has no weather data", entry.dt_txt))
        })?;

        debug!(
            %date,
            dt = entry.dt,
            min = entry.main.temp_min,
            max = entry.main.temp_max,
            "forecast day"
        );
        items.push(ForecastItem {
            day: date.format("%A").to_string(),
            date,
            icon: weather.icon.clone(),
            temperature: entry.main.temp.round() as i64,
            description: weather.description.clone(),
        });
    }

    Ok(items)
}

// "2024-01-15 12:00:00" -> 2024-01-15
fn entry_date(dt_txt: &str) -> Result<NaiveDate, WeatherError> {
    let day = dt_txt.split([' ', 'T']).next().unwrap_or_default();

    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| WeatherError::malformed(format!("invalid dt_txt {dt_txt:?}: {e}")))
}
