//! Road distance from an OSRM routing service.
//!
//! [`HttpDistanceProvider`] asks the OSRM Route API for the driving route
//! between two points and reports the first route's length in meters.
//!
//! # Example
//!
//! ```no_run
//! use freight_core::DistanceProvider;
//! use freight_data::HttpDistanceProvider;
//! use geo::Coord;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = HttpDistanceProvider::new("http://localhost:5000")?;
//! let meters = provider
//!     .distance_meters(Coord { x: 30.06, y: -1.95 }, Coord { x: 29.74, y: -2.6 })
//!     .await?;
//! # let _ = meters;
//! # Ok(())
//! # }
//! ```

mod route;

use async_trait::async_trait;
use freight_core::{DistanceProvider, ProviderError};
use geo::Coord;
use url::Url;

use crate::http::{Endpoint, HttpClientConfig, ProviderBuildError};
use route::RouteResponse;

/// Default base URL of the routing service.
pub const DEFAULT_OSRM_BASE_URL: &str = "http://localhost:5000";

/// HTTP distance provider using the OSRM Route API.
#[derive(Debug, Clone)]
pub struct HttpDistanceProvider {
    endpoint: Endpoint,
}

impl HttpDistanceProvider {
    /// Create a provider with default connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(&HttpClientConfig::new(base_url))
    }

    /// Create a provider with explicit connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: &HttpClientConfig) -> Result<Self, ProviderBuildError> {
        Ok(Self {
            endpoint: Endpoint::new(config)?,
        })
    }

    /// Build the Route API URL.
    ///
    /// The URL format is `{base_url}/route/v1/driving/{lon},{lat};{lon},{lat}`.
    fn build_route_url(&self, origin: Coord<f64>, destination: Coord<f64>) -> Url {
        let coords = format!(
            "{},{};{},{}",
            origin.x, origin.y, destination.x, destination.y
        );
        let mut url = self
            .endpoint
            .url(["route", "v1", "driving", coords.as_str()]);
        url.query_pairs_mut().append_pair("overview", "false");
        url
    }
}

/// Extract the first route's length from an OSRM response.
fn convert_response(response: RouteResponse) -> Result<f64, ProviderError> {
    if !response.is_ok() {
        return Err(ProviderError::ServiceError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }

    response
        .routes
        .and_then(|routes| routes.into_iter().next())
        .map(|route| route.distance)
        .filter(|meters| meters.is_finite() && *meters >= 0.0)
        .ok_or_else(|| ProviderError::ParseError {
            message: "OSRM response has no usable route distance".to_owned(),
        })
}

#[async_trait]
impl DistanceProvider for HttpDistanceProvider {
    async fn distance_meters(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<f64, ProviderError> {
        let url = self.build_route_url(origin, destination);
        let response: RouteResponse = self.endpoint.get_json(url).await?;
        convert_response(response)
    }
}
