//! Core data models for Skycast
//!
//! This module contains the view-model types produced by the weather fetcher
//! and the clients for the upstream geolocation, geocoding and weather services.

pub mod geolocation;
pub mod geonames;
pub mod weather;

pub use geolocation::{DeniedPosition, FixedPosition, IpPositionSource, PositionSource};
pub use geonames::{GeocodeError, GeonamesClient};
pub use weather::{WeatherClient, WeatherError};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A geographic position reported by a position source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Current conditions plus the upcoming-days forecast for one location
///
/// Built fresh for every successful fetch and replaced wholesale by the next
/// one. The forecast never contains the current day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Temperature in Celsius, rounded to the nearest degree
    pub temp_celsius: i64,
    /// Upstream condition description, e.g. "Partly cloudy"
    pub condition_text: String,
    /// Condition icon reference as given by the weather service
    pub icon_url: String,
    /// Cloud cover percentage (0-100)
    pub cloud_pct: u8,
    /// Relative humidity percentage (0-100)
    pub humidity_pct: u8,
    /// Wind speed in km/h
    pub wind_kph: f64,
    /// UV index
    pub uv_index: f64,
    /// Upstream "last updated" local timestamp, e.g. "2024-07-15 14:00"
    pub last_updated: String,
    /// Country of the resolved location
    pub country: String,
    /// Latitude of the resolved location
    pub lat: f64,
    /// Longitude of the resolved location
    pub lon: f64,
    /// Upcoming days, earliest first
    pub forecast: Vec<ForecastDay>,
}

/// A single upcoming day in the forecast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Calendar date of the forecast day
    pub date: NaiveDate,
    /// Upstream condition description for the day
    pub condition_text: String,
}

impl ForecastDay {
    /// Short English weekday name for the day, e.g. "Tue"
    pub fn weekday_name(&self) -> &'static str {
        match self.date.weekday() {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }
}
