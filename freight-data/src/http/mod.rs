//! Shared HTTP client configuration and error mapping.

use std::time::Duration;

use freight_core::ProviderError;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = "freight-booking/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error type for adapter construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL is not an absolute hierarchical URL.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// URL as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Connection settings shared by every HTTP adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Base URL of the service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Request timeout, applied to connecting and to the whole request.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpClientConfig {
    /// Create a configuration for the service at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// A configured client bound to one service's base URL.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    client: Client,
    base: Url,
    timeout: Duration,
}

impl Endpoint {
    pub(crate) fn new(config: &HttpClientConfig) -> Result<Self, ProviderBuildError> {
        let base = parse_base_url(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self {
            client,
            base,
            timeout: config.timeout,
        })
    }

    pub(crate) const fn client(&self) -> &Client {
        &self.client
    }

    /// Append `segments` to the base URL's path.
    pub(crate) fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        // The base was checked to be hierarchical when the endpoint was built.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Map a transport error onto the shared provider error.
    pub(crate) fn convert_error(&self, error: &reqwest::Error, url: &Url) -> ProviderError {
        if error.is_timeout() {
            return ProviderError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return ProviderError::HttpError {
                url: url.to_string(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        ProviderError::NetworkError {
            url: url.to_string(),
            message: error.to_string(),
        }
    }

    /// `GET` `url` and decode a JSON body, failing on non-success statuses.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        log::debug!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_error(&err, &url))?;
        decode_json(response).await
    }
}

/// Decode a JSON response body.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
    response.json().await.map_err(|err| ProviderError::ParseError {
        message: err.to_string(),
    })
}

fn parse_base_url(raw: &str) -> Result<Url, ProviderBuildError> {
    let invalid = |reason: String| ProviderBuildError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".to_owned()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn endpoint(base: &str) -> Endpoint {
        Endpoint::new(&HttpClientConfig::new(base)).expect("endpoint should build")
    }

    #[rstest]
    #[case("http://backend.example.com")]
    #[case("http://backend.example.com/")]
    fn url_joins_segments_without_doubled_slashes(#[case] base: &str) {
        let url = endpoint(base).url(["fleet", "available"]);
        assert_eq!(url.as_str(), "http://backend.example.com/fleet/available");
    }

    #[rstest]
    fn url_keeps_base_path_prefix() {
        let url = endpoint("https://maps.example.com/maps/api/").url(["place", "details", "json"]);
        assert_eq!(url.as_str(), "https://maps.example.com/maps/api/place/details/json");
    }

    #[rstest]
    #[case("not a url")]
    #[case("mailto:ops@example.com")]
    fn invalid_base_urls_are_rejected(#[case] base: &str) {
        let err = Endpoint::new(&HttpClientConfig::new(base)).expect_err("base should be rejected");
        assert!(matches!(err, ProviderBuildError::InvalidBaseUrl { .. }));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpClientConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }
}
