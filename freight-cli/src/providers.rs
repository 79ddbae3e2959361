//! Collaborator wiring for the CLI commands.
//!
//! Commands ask a [`ProviderFactory`] for their collaborators so the
//! behaviour tests can swap the HTTP adapters for in-process stubs.

use std::sync::Arc;

use freight_core::{
    DistanceProvider, FleetProvider, GeocodingProvider, Notice, NoticeSink, PlaceDetailsProvider,
    PricingProvider, SubmissionProvider,
};
use freight_data::{
    HttpBackendClient, HttpClientConfig, HttpDistanceProvider, HttpPlacesProvider, PlacesConfig,
};
use parking_lot::Mutex;

use crate::CliError;

/// Place search and place details collaborators.
#[derive(Clone)]
pub(crate) struct PlaceProviders {
    pub(crate) geocoding: Arc<dyn GeocodingProvider>,
    pub(crate) details: Arc<dyn PlaceDetailsProvider>,
}

/// Booking backend collaborators.
#[derive(Clone)]
pub(crate) struct BackendProviders {
    pub(crate) pricing: Arc<dyn PricingProvider>,
    pub(crate) fleet: Arc<dyn FleetProvider>,
    pub(crate) submission: Arc<dyn SubmissionProvider>,
}

/// Builds the collaborators for the current invocation.
pub(crate) trait ProviderFactory {
    fn places(&self, base_url: &str, api_key: &str) -> Result<PlaceProviders, CliError>;
    fn distance(&self, base_url: &str) -> Result<Arc<dyn DistanceProvider>, CliError>;
    fn backend(&self, base_url: &str) -> Result<BackendProviders, CliError>;
}

/// Factory producing the `freight-data` HTTP adapters.
pub(crate) struct HttpProviders;

impl ProviderFactory for HttpProviders {
    fn places(&self, base_url: &str, api_key: &str) -> Result<PlaceProviders, CliError> {
        let config = PlacesConfig::new(api_key).with_http(HttpClientConfig::new(base_url));
        let provider =
            HttpPlacesProvider::new(config).map_err(|source| CliError::BuildProvider {
                base_url: base_url.to_owned(),
                source,
            })?;
        let shared = Arc::new(provider);
        Ok(PlaceProviders {
            geocoding: Arc::clone(&shared) as Arc<dyn GeocodingProvider>,
            details: shared,
        })
    }

    fn distance(&self, base_url: &str) -> Result<Arc<dyn DistanceProvider>, CliError> {
        let provider =
            HttpDistanceProvider::new(base_url).map_err(|source| CliError::BuildProvider {
                base_url: base_url.to_owned(),
                source,
            })?;
        Ok(Arc::new(provider))
    }

    fn backend(&self, base_url: &str) -> Result<BackendProviders, CliError> {
        let client = HttpBackendClient::new(&HttpClientConfig::new(base_url)).map_err(|source| {
            CliError::BuildProvider {
                base_url: base_url.to_owned(),
                source,
            }
        })?;
        let shared = Arc::new(client);
        Ok(BackendProviders {
            pricing: Arc::clone(&shared) as Arc<dyn PricingProvider>,
            fleet: Arc::clone(&shared) as Arc<dyn FleetProvider>,
            submission: shared,
        })
    }
}

/// Notice sink that keeps notices for the command's JSON output.
#[derive(Debug, Default)]
pub(crate) struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    /// Drain the notices received so far, oldest first.
    pub(crate) fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }
}

impl NoticeSink for NoticeLog {
    fn notify(&self, notice: Notice) {
        log::debug!("notice: {notice}");
        self.notices.lock().push(notice);
    }
}
