//! Device position sources
//!
//! A terminal has no browser geolocation API, so the "device position" comes
//! from one of several sources: an IP-based lookup service, coordinates given
//! on the command line, or nothing at all when geolocation is disabled.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::Coordinates;
use crate::location::LocationError;

/// Default IP geolocation endpoint
pub const IP_LOOKUP_URL: &str = "http://ip-api.com/json";

/// Something that can report the current position of the device
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Request the current coordinates
    ///
    /// Fails with `PermissionDenied` when the user has disabled geolocation and
    /// with `Unavailable` when no position can be determined.
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Position source that always reports the same coordinates
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Position source used when geolocation is turned off
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedPosition;

#[async_trait]
impl PositionSource for DeniedPosition {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::PermissionDenied)
    }
}

/// Position source backed by an ip-api compatible lookup service
#[derive(Debug, Clone)]
pub struct IpPositionSource {
    client: Client,
    url: String,
}

impl IpPositionSource {
    /// Create a source querying the given lookup URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl PositionSource for IpPositionSource {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LocationError::Unavailable(format!(
                "position lookup returned {}",
                status.as_u16()
            )));
        }

        let lookup: IpLookupResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        lookup.into_coordinates()
    }
}

/// ip-api response body
#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpLookupResponse {
    fn into_coordinates(self) -> Result<Coordinates, LocationError> {
        if self.status != "success" {
            let reason = self.message.unwrap_or(self.status);
            return Err(LocationError::Unavailable(reason));
        }

        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(LocationError::Unavailable(
                "position lookup returned no coordinates".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fixed_position() {
        let source = FixedPosition(Coordinates::new(51.5, -0.12));
        let coords = source.current_position().await.unwrap();
        assert_eq!(coords, Coordinates::new(51.5, -0.12));
    }

    #[tokio::test]
    async fn test_denied_position() {
        let result = DeniedPosition.current_position().await;
        assert!(matches!(result, Err(LocationError::PermissionDenied)));
    }

    #[tokio::test]
    async fn test_ip_lookup_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "country": "United Kingdom",
                "city": "London",
                "lat": 51.5,
                "lon": -0.12
            })))
            .mount(&mock_server)
            .await;

        let source = IpPositionSource::new(mock_server.uri());
        let coords = source.current_position().await.unwrap();
        assert_eq!(coords, Coordinates::new(51.5, -0.12));
    }

    #[tokio::test]
    async fn test_ip_lookup_failure_status_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail",
                "message": "private range"
            })))
            .mount(&mock_server)
            .await;

        let source = IpPositionSource::new(mock_server.uri());
        match source.current_position().await {
            Err(LocationError::Unavailable(reason)) => assert_eq!(reason, "private range"),
            other => panic!("Expected Unavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ip_lookup_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let source = IpPositionSource::new(mock_server.uri());
        assert!(matches!(
            source.current_position().await,
            Err(LocationError::Unavailable(_))
        ));
    }
}
