//! WeatherAPI forecast client
//!
//! This module fetches current conditions and the multi-day forecast from the
//! WeatherAPI `forecast.json` endpoint and projects the payload into a
//! [`WeatherSnapshot`]. It is the only place that knows the upstream schema.

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{ForecastDay, WeatherSnapshot};
use crate::config::WeatherConfig;
use crate::location::LocationQuery;

/// Base URL for the WeatherAPI service
pub const WEATHER_API_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Number of forecast days requested, today included
pub const DEFAULT_FORECAST_DAYS: u8 = 7;

/// Message carried by non-2xx failures
const STATUS_ERROR_MESSAGE: &str = "Something went wrong";

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("{message} ({status})")]
    Status { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Client for fetching weather snapshots from WeatherAPI
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    forecast_days: u8,
}

impl WeatherClient {
    /// Create a new WeatherClient against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            forecast_days: DEFAULT_FORECAST_DAYS,
        }
    }

    /// Create a WeatherClient from the `[weather]` config section
    pub fn from_config(config: &WeatherConfig) -> Self {
        Self::with_base_url(config.base_url.clone(), config.api_key.clone())
            .with_forecast_days(config.forecast_days)
    }

    /// Override the number of forecast days requested
    pub fn with_forecast_days(mut self, days: u8) -> Self {
        self.forecast_days = days;
        self
    }

    /// Fetch a snapshot for the given location
    ///
    /// Every failure (network, non-2xx status, malformed payload) is logged and
    /// turned into `None`, so callers only ever see "update" or "no update".
    pub async fn fetch_snapshot(&self, query: &LocationQuery) -> Option<WeatherSnapshot> {
        match self.try_fetch_snapshot(query).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(location = %query, error = %e, "weather fetch failed");
                None
            }
        }
    }

    /// Fetch a snapshot for the given location, surfacing the failure reason
    ///
    /// # Returns
    /// * `Ok(WeatherSnapshot)` - Current conditions and upcoming days
    /// * `Err(WeatherError)` - If the request, status check, or parsing fails
    pub async fn try_fetch_snapshot(
        &self,
        query: &LocationQuery,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/forecast.json", self.base_url.trim_end_matches('/'));
        let days = self.forecast_days.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query.as_str()),
                ("days", days.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                message: STATUS_ERROR_MESSAGE.to_string(),
            });
        }

        let text = response.text().await?;
        tracing::debug!(location = %query, payload = %text, "weather payload received");

        parse_snapshot(&text)
    }
}

/// Parse a raw `forecast.json` body into a WeatherSnapshot
pub fn parse_snapshot(body: &str) -> Result<WeatherSnapshot, WeatherError> {
    let response: ForecastResponse = serde_json::from_str(body)?;
    Ok(project(response))
}

/// Project the upstream payload into the view model
fn project(response: ForecastResponse) -> WeatherSnapshot {
    let current = response.current;
    let location = response.location;

    // The first upstream day is today; only future days are kept
    let forecast = response
        .forecast
        .forecastday
        .into_iter()
        .skip(1)
        .map(|day| ForecastDay {
            date: day.date,
            condition_text: day.day.condition.text,
        })
        .collect();

    WeatherSnapshot {
        temp_celsius: round_half_up(current.temp_c),
        condition_text: current.condition.text,
        icon_url: current.condition.icon,
        cloud_pct: current.cloud,
        humidity_pct: current.humidity,
        wind_kph: current.wind_kph,
        uv_index: current.uv,
        last_updated: current.last_updated,
        country: location.country,
        lat: location.lat,
        lon: location.lon,
        forecast,
    }
}

/// Round to the nearest integer, with halves going towards positive infinity
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// WeatherAPI forecast.json response structure
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentWeather,
    location: LocationInfo,
    forecast: Forecast,
}

/// Current conditions block
#[derive(Debug, Deserialize)]
struct CurrentWeather {
    cloud: u8,
    condition: Condition,
    temp_c: f64,
    wind_kph: f64,
    humidity: u8,
    last_updated: String,
    uv: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    icon: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct LocationInfo {
    country: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    forecastday: Vec<UpstreamForecastDay>,
}

#[derive(Debug, Deserialize)]
struct UpstreamForecastDay {
    date: NaiveDate,
    day: DaySummary,
}

#[derive(Debug, Deserialize)]
struct DaySummary {
    condition: DayCondition,
}

#[derive(Debug, Deserialize)]
struct DayCondition {
    text: String,
}
