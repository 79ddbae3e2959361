//! Booking backend client: pricing, fleet inventory and assignments.
//!
//! | Operation | Request |
//! |---|---|
//! | price quote | `POST {base}/pricing/estimate` |
//! | roster | `GET {base}/fleet/available?date=YYYY-MM-DD[&capacity_min=..]` |
//! | assignment | `POST {base}/assignments` |
//! | split assignment | `POST {base}/assignments/split` |
//!
//! A non-success response whose JSON body carries a `message` becomes
//! [`ProviderError::Rejected`] with that message, so it can be shown to the
//! user verbatim.

use async_trait::async_trait;
use chrono::NaiveDate;
use freight_core::{
    AssignmentPayload, AssignmentRecord, FleetProvider, PricingProvider, ProviderError, Quote,
    QuoteRequest, Roster, SplitPayload, SubmissionProvider,
};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::http::{Endpoint, HttpClientConfig, ProviderBuildError, decode_json};

/// Error body returned by the backend on rejection.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Response to a split submission.
#[derive(Debug, Deserialize)]
struct SplitResponse {
    assignments: Vec<AssignmentRecord>,
}

/// HTTP client for the booking backend.
#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    endpoint: Endpoint,
}

impl HttpBackendClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(config: &HttpClientConfig) -> Result<Self, ProviderBuildError> {
        Ok(Self {
            endpoint: Endpoint::new(config)?,
        })
    }

    fn roster_url(&self, date: NaiveDate, capacity_min: Option<f64>) -> Url {
        let mut url = self.endpoint.url(["fleet", "available"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("date", &date.format("%Y-%m-%d").to_string());
            if let Some(capacity) = capacity_min {
                pairs.append_pair("capacity_min", &capacity.to_string());
            }
        }
        url
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<T, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|err| self.endpoint.convert_error(&err, url))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("backend answered {status} for {url}");
            return Err(rejection(status, &body, url));
        }
        decode_json(response).await
    }
}

/// Map a non-success response onto a provider error, keeping the backend's
/// message when it sent one.
fn rejection(status: StatusCode, body: &str, url: &Url) -> ProviderError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .filter(|message| !message.trim().is_empty());
    match message {
        Some(text) => ProviderError::Rejected {
            message: Some(text),
        },
        None => ProviderError::HttpError {
            url: url.to_string(),
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or_default().to_owned(),
        },
    }
}

#[async_trait]
impl PricingProvider for HttpBackendClient {
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, ProviderError> {
        let url = self.endpoint.url(["pricing", "estimate"]);
        log::debug!("POST {url}");
        let builder = self.endpoint.client().post(url.clone()).json(request);
        self.exchange(builder, &url).await
    }
}

#[async_trait]
impl FleetProvider for HttpBackendClient {
    async fn roster(
        &self,
        date: NaiveDate,
        capacity_min: Option<f64>,
    ) -> Result<Roster, ProviderError> {
        let url = self.roster_url(date, capacity_min);
        log::debug!("GET {url}");
        let builder = self.endpoint.client().get(url.clone());
        self.exchange(builder, &url).await
    }
}

#[async_trait]
impl SubmissionProvider for HttpBackendClient {
    async fn submit_assignment(
        &self,
        payload: &AssignmentPayload,
    ) -> Result<AssignmentRecord, ProviderError> {
        let url = self.endpoint.url(["assignments"]);
        log::debug!("POST {url}");
        let builder = self.endpoint.client().post(url.clone()).json(payload);
        self.exchange(builder, &url).await
    }

    async fn submit_split(
        &self,
        payload: &SplitPayload,
    ) -> Result<Vec<AssignmentRecord>, ProviderError> {
        let url = self.endpoint.url(["assignments", "split"]);
        log::debug!("POST {url}");
        let builder = self.endpoint.client().post(url.clone()).json(payload);
        let response: SplitResponse = self.exchange(builder, &url).await?;
        Ok(response.assignments)
    }
}
