use crate::domain::ports::{GeoMatch, LocationLookup};
use crate::utils::error::{CheckError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Nominatim-style geocoder. Only answers "does this place exist".
pub struct NominatimLookup {
    client: Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl NominatimLookup {
    pub fn new(endpoint: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl LocationLookup for NominatimLookup {
    async fn locate(&self, location: &str) -> Result<Option<GeoMatch>> {
        tracing::debug!("Looking up location '{}' via {}", location, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", location), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CheckError::LookupError {
                message: format!("lookup service returned {}", response.status()),
            });
        }

        let places: Vec<Place> = response.json().await?;
        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let latitude = place.lat.parse::<f64>().map_err(|e| CheckError::LookupError {
            message: format!("invalid latitude '{}': {}", place.lat, e),
        })?;
        let longitude = place.lon.parse::<f64>().map_err(|e| CheckError::LookupError {
            message: format!("invalid longitude '{}': {}", place.lon, e),
        })?;

        Ok(Some(GeoMatch {
            latitude,
            longitude,
            display_name: place.display_name,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn lookup(server: &MockServer) -> NominatimLookup {
        NominatimLookup::new(server.url("/search"), "reality-check-test", Duration::from_secs(2))
            .unwrap()
    }

    #[tokio::test]
    async fn test_locate_parses_first_match() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "Springfield")
                .query_param("format", "json")
                .header("user-agent", "reality-check-test");
            then.status(200).json_body(serde_json::json!([
                {"lat": "39.7990", "lon": "-89.6440", "display_name": "Springfield, Illinois"}
            ]));
        });

        let found = lookup(&server).locate("Springfield").await.unwrap().unwrap();

        api_mock.assert();
        assert_eq!(found.display_name, "Springfield, Illinois");
        assert!((found.latitude - 39.799).abs() < 1e-9);
        assert!((found.longitude + 89.644).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_locate_empty_array_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(serde_json::json!([]));
        });

        assert_eq!(lookup(&server).locate("Atlantis").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_locate_server_error_is_lookup_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(503);
        });

        assert!(matches!(
            lookup(&server).locate("Springfield").await,
            Err(CheckError::LookupError { .. })
        ));
    }
}
