//! Nominatim-style forward geocoding client
//!
//! Resolves a free-form location string to a single best-match coordinate
//! pair. Calls are rate limited per the job's configured request rate; no
//! retry happens here. A failed lookup is isolated by the batch loop: the
//! item is logged and skipped, the job continues.

use crate::services::rate_limiter::RateLimiter;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const USER_AGENT: &str = concat!("fotodesk-geotag/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Geocoder errors
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The service returned an empty candidate list
    #[error("Location not found: {0}")]
    NotFound(String),

    /// Network failure or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<GeocodeError> for fotodesk_common::Error {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NotFound(loc) => fotodesk_common::Error::NotFound(loc),
            other => fotodesk_common::Error::Transport(other.to_string()),
        }
    }
}

/// Resolved latitude/longitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Search result element; the service returns coordinates as numeric strings
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Forward geocoding client with built-in rate limiting
pub struct Geocoder {
    http_client: reqwest::Client,
    base_url: String,
    rate_limiter: RateLimiter,
}

impl Geocoder {
    /// Create a client limited to `requests_per_second` lookups
    pub fn new(requests_per_second: f64) -> Result<Self, GeocodeError> {
        Self::with_base_url(requests_per_second, DEFAULT_BASE_URL)
    }

    /// Create a client against a non-default endpoint (used by tests)
    pub fn with_base_url(
        requests_per_second: f64,
        base_url: impl Into<String>,
    ) -> Result<Self, GeocodeError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            rate_limiter: RateLimiter::from_rate(requests_per_second),
        })
    }

    /// Resolve a location string to its single best-match coordinates
    ///
    /// Blocks (asynchronously) on the rate limiter first; the limiter is
    /// re-armed when the call finishes, successful or not.
    pub async fn lookup(&self, location: &str) -> Result<Coordinates, GeocodeError> {
        self.rate_limiter.acquire().await;
        let result = self.fetch(location).await;
        self.rate_limiter.mark().await;
        result
    }

    async fn fetch(&self, location: &str) -> Result<Coordinates, GeocodeError> {
        let url = format!("{}/search", self.base_url);

        tracing::debug!(location = %location, url = %url, "Querying geocoding service");

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", location), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api(status.as_u16(), error_text));
        }

        let places: Vec<Place> = response
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(location.to_string()))?;

        let latitude: f64 = place
            .lat
            .parse()
            .map_err(|_| GeocodeError::Parse(format!("bad latitude: {}", place.lat)))?;
        let longitude: f64 = place
            .lon
            .parse()
            .map_err(|_| GeocodeError::Parse(format!("bad longitude: {}", place.lon)))?;

        tracing::info!(
            location = %location,
            latitude,
            longitude,
            "Resolved location"
        );

        Ok(Coordinates {
            latitude,
            longitude,
        })
    }
}
