//! Test helpers: stub collaborators and planning request fixtures.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use freight_core::test_support::{StubDistance, StubFleet, StubPlaces, StubPricing, StubSubmission};
use freight_core::{
    DistanceProvider, FleetProvider, GeocodingProvider, PlaceDetailsProvider, PricingProvider,
    ProviderError, Roster, SubmissionProvider,
};
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::CliError;
use crate::providers::{BackendProviders, PlaceProviders, ProviderFactory};

/// Factory handing out shared stubs so tests can inspect the calls made.
pub(super) struct StubProviders {
    pub(super) places: Arc<StubPlaces>,
    pub(super) distance: Arc<StubDistance>,
    pub(super) pricing: Arc<StubPricing>,
    pub(super) fleet: Arc<StubFleet>,
    pub(super) submission: Arc<StubSubmission>,
}

impl Default for StubProviders {
    fn default() -> Self {
        Self {
            places: Arc::new(StubPlaces::new()),
            distance: Arc::new(StubDistance::with_meters(0.0)),
            pricing: Arc::new(StubPricing::with_error(pricing_down())),
            fleet: Arc::new(StubFleet::with_roster(Roster::default())),
            submission: Arc::new(StubSubmission::accepting()),
        }
    }
}

impl ProviderFactory for StubProviders {
    fn places(&self, _base_url: &str, _api_key: &str) -> Result<PlaceProviders, CliError> {
        Ok(PlaceProviders {
            geocoding: Arc::clone(&self.places) as Arc<dyn GeocodingProvider>,
            details: Arc::clone(&self.places) as Arc<dyn PlaceDetailsProvider>,
        })
    }

    fn distance(&self, _base_url: &str) -> Result<Arc<dyn DistanceProvider>, CliError> {
        Ok(Arc::clone(&self.distance) as Arc<dyn DistanceProvider>)
    }

    fn backend(&self, _base_url: &str) -> Result<BackendProviders, CliError> {
        Ok(BackendProviders {
            pricing: Arc::clone(&self.pricing) as Arc<dyn PricingProvider>,
            fleet: Arc::clone(&self.fleet) as Arc<dyn FleetProvider>,
            submission: Arc::clone(&self.submission) as Arc<dyn SubmissionProvider>,
        })
    }
}

pub(super) fn pricing_down() -> ProviderError {
    ProviderError::NetworkError {
        url: "http://localhost:8080/pricing/estimate".to_owned(),
        message: "connection refused".to_owned(),
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Temporary directory holding a planning request file.
pub(super) struct RequestDir {
    _dir: TempDir,
    pub(super) path: Utf8PathBuf,
}

impl RequestDir {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            _dir: dir,
            path: root.join("request.json"),
        }
    }

    pub(super) fn write(&self, request: &Value) {
        let payload = serde_json::to_string_pretty(request).expect("serialize request");
        write_utf8(&self.path, payload.as_bytes());
    }
}

/// Cargo of `weight_kg` from Kigali to Huye.
pub(super) fn cargo_json(weight_kg: f64) -> Value {
    json!({
        "id": "c-1",
        "weight_kg": weight_kg,
        "category": "general",
        "pickup": {"description": "Kigali", "coord": {"x": 30.06, "y": -1.95}},
        "destination": {"description": "Huye", "coord": {"x": 29.74, "y": -2.6}},
    })
}

/// Roster with one vehicle per capacity and drivers `d-1` and `d-2`.
pub(super) fn roster_json(capacities: &[f64]) -> Value {
    let vehicles: Vec<Value> = capacities
        .iter()
        .map(|capacity| json!({"id": format!("v-{capacity}"), "capacity_kg": capacity}))
        .collect();
    json!({
        "vehicles": vehicles,
        "drivers": [
            {"id": "d-1", "name": "Amina"},
            {"id": "d-2", "name": "Jean"},
        ],
    })
}
