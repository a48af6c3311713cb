//! GeoNames reverse geocoding client
//!
//! Converts coordinates into the nearest populated place name using the
//! GeoNames `findNearbyPlaceNameJSON` service.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::Coordinates;
use crate::config::GeocodingConfig;

/// Base URL for the GeoNames web services
pub const GEONAMES_BASE_URL: &str = "http://api.geonames.org";

/// Errors that can occur when reverse geocoding
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Reverse geocoding failed ({status})")]
    Status { status: u16 },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The service answered 200 with an error status object
    #[error("GeoNames error: {message}")]
    Service { message: String },

    /// The service returned no places near the coordinates
    #[error("No place found near the given coordinates")]
    NoResults,
}

/// Client for the GeoNames nearby-place lookup
#[derive(Debug, Clone)]
pub struct GeonamesClient {
    client: Client,
    base_url: String,
    username: String,
}

impl GeonamesClient {
    /// Create a new client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            username: username.into(),
        }
    }

    /// Create a client from the `[geocoding]` config section
    pub fn from_config(config: &GeocodingConfig) -> Self {
        Self::with_base_url(config.base_url.clone(), config.username.clone())
    }

    /// Look up the name of the place nearest to `coords`
    ///
    /// # Returns
    /// * `Ok(String)` - The `name` of the first result
    /// * `Err(GeocodeError)` - If the request fails or no place is returned
    pub async fn nearest_place_name(&self, coords: Coordinates) -> Result<String, GeocodeError> {
        let url = format!(
            "{}/findNearbyPlaceNameJSON",
            self.base_url.trim_end_matches('/')
        );
        let lat = coords.latitude.to_string();
        let lng = coords.longitude.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lng", lng.as_str()),
                ("username", self.username.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let name = parse_place_name(&text)?;
        tracing::info!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            place = %name,
            "reverse geocoded position"
        );
        Ok(name)
    }
}

/// Extract the first place name from a `findNearbyPlaceNameJSON` body
fn parse_place_name(body: &str) -> Result<String, GeocodeError> {
    let response: NearbyResponse = serde_json::from_str(body)?;
    if let Some(status) = response.status {
        return Err(GeocodeError::Service {
            message: status.message,
        });
    }
    response
        .geonames
        .into_iter()
        .next()
        .map(|place| place.name)
        .ok_or(GeocodeError::NoResults)
}

/// GeoNames nearby-place response
#[derive(Debug, Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    geonames: Vec<NearbyPlace>,
    status: Option<ServiceStatus>,
}

#[derive(Debug, Deserialize)]
struct ServiceStatus {
    message: String,
}

#[derive(Debug, Deserialize)]
struct NearbyPlace {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_first_place_name() {
        let body = r#"{
            "geonames": [
                { "name": "Westminster", "adminName1": "England", "countryName": "United Kingdom" },
                { "name": "Lambeth", "adminName1": "England", "countryName": "United Kingdom" }
            ]
        }"#;
        assert_eq!(parse_place_name(body).unwrap(), "Westminster");
    }

    #[test]
    fn test_parse_empty_results() {
        let body = r#"{ "geonames": [] }"#;
        assert!(matches!(parse_place_name(body), Err(GeocodeError::NoResults)));
    }

    #[test]
    fn test_parse_service_status_payload() {
        // GeoNames reports account problems with a 200 and a status object
        let body = r#"{ "status": { "message": "user account not enabled", "value": 10 } }"#;
        match parse_place_name(body) {
            Err(GeocodeError::Service { message }) => {
                assert_eq!(message, "user account not enabled")
            }
            other => panic!("Expected service error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_nearest_place_name_service_error_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/findNearbyPlaceNameJSON"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": { "message": "invalid user", "value": 10 }
            })))
            .mount(&mock_server)
            .await;

        let client = GeonamesClient::with_base_url(mock_server.uri(), "nobody");
        let err = client
            .nearest_place_name(Coordinates::new(51.5, -0.12))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "GeoNames error: invalid user");
    }

    #[tokio::test]
    async fn test_nearest_place_name() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/findNearbyPlaceNameJSON"))
            .and(query_param("lat", "51.5"))
            .and(query_param("lng", "-0.12"))
            .and(query_param("username", "demo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "geonames": [{ "name": "Westminster", "adminName1": "England" }]
            })))
            .mount(&mock_server)
            .await;

        let client = GeonamesClient::with_base_url(mock_server.uri(), "demo");
        let name = client
            .nearest_place_name(Coordinates::new(51.5, -0.12))
            .await
            .unwrap();

        assert_eq!(name, "Westminster");
    }

    #[tokio::test]
    async fn test_nearest_place_name_status_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/findNearbyPlaceNameJSON"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = GeonamesClient::with_base_url(mock_server.uri(), "demo");
        let result = client
            .nearest_place_name(Coordinates::new(51.5, -0.12))
            .await;

        assert!(matches!(result, Err(GeocodeError::Status { status: 401 })));
    }
}
