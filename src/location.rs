//! Location resolution
//!
//! Turns either the device position (reverse geocoded) or free-form user text
//! into a [`LocationQuery`], the place name handed to the weather fetcher.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::data::{GeocodeError, GeonamesClient, PositionSource};

/// Errors that can occur while resolving the device location
#[derive(Debug, Error)]
pub enum LocationError {
    /// Geolocation is disabled for this session
    #[error("Geolocation permission denied")]
    PermissionDenied,

    /// The device position could not be determined
    #[error("Position unavailable: {0}")]
    Unavailable(String),

    /// The position could not be turned into a place name
    #[error("Reverse geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),
}

/// A display-ready place name used to query the weather service
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationQuery(String);

impl LocationQuery {
    /// Wrap a place name verbatim
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty query must not be sent to the weather service
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize typed text into a query
///
/// Each whitespace-separated word gets its first character upper-cased; the
/// rest of the word is left as typed. Words are rejoined with single spaces,
/// so blank input gives an empty query.
pub fn resolve_from_text(raw: &str) -> LocationQuery {
    let words: Vec<String> = raw.split_whitespace().map(capitalize_first).collect();
    LocationQuery(words.join(" "))
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolves the device position into a place name
#[derive(Clone)]
pub struct LocationResolver {
    position: Arc<dyn PositionSource>,
    geocoder: GeonamesClient,
}

impl LocationResolver {
    pub fn new(position: Arc<dyn PositionSource>, geocoder: GeonamesClient) -> Self {
        Self { position, geocoder }
    }

    /// Resolve the current device position to a place name
    ///
    /// # Returns
    /// * `Ok(LocationQuery)` - Name of the nearest place, verbatim from GeoNames
    /// * `Err(LocationError)` - If geolocation is denied, unavailable, or the
    ///   reverse lookup fails
    pub async fn resolve_from_geolocation(&self) -> Result<LocationQuery, LocationError> {
        let coords = self.position.current_position().await?;
        tracing::debug!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            "device position acquired"
        );

        let name = self.geocoder.nearest_place_name(coords).await?;
        Ok(LocationQuery::new(name))
    }
}

impl fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationResolver")
            .field("geocoder", &self.geocoder)
            .finish_non_exhaustive()
    }
}
