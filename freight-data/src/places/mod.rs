//! Place search and place details over HTTP.
//!
//! [`HttpPlacesProvider`] implements both
//! [`GeocodingProvider`] and [`PlaceDetailsProvider`] against a Places-style
//! JSON API:
//!
//! - `GET {base}/place/autocomplete/json?input=..&components=country:..&key=..`
//! - `GET {base}/place/details/json?place_id=..&fields=geometry&key=..`
//!
//! An application-level status other than `OK` becomes
//! [`ProviderError::ServiceError`], except `ZERO_RESULTS` on search, which is
//! an empty candidate list.

mod wire;

use async_trait::async_trait;
use freight_core::{
    CandidateLocation, GeocodingProvider, PlaceDetailsProvider, PlaceId, ProviderError,
};
use geo::Coord;
use url::Url;

use crate::http::{Endpoint, HttpClientConfig, ProviderBuildError};
use wire::{AutocompleteResponse, DetailsResponse, OK, ZERO_RESULTS};

/// Default base URL of the places service.
pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Configuration for [`HttpPlacesProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacesConfig {
    /// Connection settings.
    pub http: HttpClientConfig,
    /// API key sent with every request.
    pub api_key: String,
    /// Default ISO 3166-1 alpha-2 country restriction for searches.
    pub country: Option<String>,
}

impl PlacesConfig {
    /// Create a configuration for the default service with `api_key`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: HttpClientConfig::new(DEFAULT_PLACES_BASE_URL),
            api_key: api_key.into(),
            country: None,
        }
    }

    /// Use connection settings `http`.
    #[must_use]
    pub fn with_http(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }

    /// Restrict searches to `country` unless the caller passes its own.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// HTTP place search and details.
#[derive(Debug, Clone)]
pub struct HttpPlacesProvider {
    endpoint: Endpoint,
    api_key: String,
    country: Option<String>,
}

impl HttpPlacesProvider {
    /// Build a provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(config: PlacesConfig) -> Result<Self, ProviderBuildError> {
        Ok(Self {
            endpoint: Endpoint::new(&config.http)?,
            api_key: config.api_key,
            country: config.country,
        })
    }

    fn autocomplete_url(&self, query: &str, country: Option<&str>) -> Url {
        let mut url = self.endpoint.url(["place", "autocomplete", "json"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("input", query);
            if let Some(code) = country.or(self.country.as_deref()) {
                pairs.append_pair("components", &format!("country:{code}"));
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    fn details_url(&self, place_id: &PlaceId) -> Url {
        let mut url = self.endpoint.url(["place", "details", "json"]);
        url.query_pairs_mut()
            .append_pair("place_id", place_id.as_str())
            .append_pair("fields", "geometry")
            .append_pair("key", &self.api_key);
        url
    }
}

fn convert_autocomplete(
    response: AutocompleteResponse,
) -> Result<Vec<CandidateLocation>, ProviderError> {
    match response.status.as_str() {
        OK => Ok(response
            .predictions
            .into_iter()
            .map(|p| CandidateLocation::new(p.place_id, p.description))
            .collect()),
        ZERO_RESULTS => Ok(Vec::new()),
        _ => Err(ProviderError::ServiceError {
            code: response.status,
            message: response.error_message.unwrap_or_default(),
        }),
    }
}

fn convert_details(response: DetailsResponse) -> Result<Coord<f64>, ProviderError> {
    if response.status != OK {
        return Err(ProviderError::ServiceError {
            code: response.status,
            message: response.error_message.unwrap_or_default(),
        });
    }
    let location = response
        .result
        .ok_or_else(|| ProviderError::ParseError {
            message: "place details response missing result".to_owned(),
        })?
        .geometry
        .location;
    if !location.lat.is_finite() || !location.lng.is_finite() {
        return Err(ProviderError::ParseError {
            message: format!("invalid coordinates {},{}", location.lat, location.lng),
        });
    }
    Ok(Coord {
        x: location.lng,
        y: location.lat,
    })
}

#[async_trait]
impl GeocodingProvider for HttpPlacesProvider {
    async fn search(
        &self,
        query: &str,
        country: Option<&str>,
    ) -> Result<Vec<CandidateLocation>, ProviderError> {
        let url = self.autocomplete_url(query, country);
        let response: AutocompleteResponse = self.endpoint.get_json(url).await?;
        convert_autocomplete(response)
    }
}

#[async_trait]
impl PlaceDetailsProvider for HttpPlacesProvider {
    async fn coordinates(&self, place_id: &PlaceId) -> Result<Coord<f64>, ProviderError> {
        let url = self.details_url(place_id);
        let response: DetailsResponse = self.endpoint.get_json(url).await?;
        convert_details(response)
    }
}
