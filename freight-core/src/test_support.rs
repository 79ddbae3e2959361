//! Deterministic collaborator stubs used by unit and behaviour tests.
//!
//! Every stub records the calls it receives so tests can assert how many
//! network round trips a component made. Stubs with a configurable delay
//! sleep on the Tokio clock, which lets tests drive them with paused time.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use geo::Coord;
use parking_lot::Mutex;

use crate::{
    AssignmentId, AssignmentPayload, AssignmentRecord, CandidateLocation, DistanceProvider,
    FleetProvider, GeocodingProvider, Notice, NoticeSink, PlaceDetailsProvider, PlaceId,
    PricingProvider, ProviderError, Quote, QuoteRequest, Roster, SplitPayload, SubmissionProvider,
};

/// Place search and details stub keyed by query text and place id.
///
/// Unknown queries return an empty candidate list; unknown place ids fail
/// with a service error.
#[derive(Debug, Default)]
pub struct StubPlaces {
    results: Mutex<HashMap<String, Result<Vec<CandidateLocation>, ProviderError>>>,
    coordinates: Mutex<HashMap<PlaceId, Coord<f64>>>,
    delays: Mutex<HashMap<String, Duration>>,
    searches: Mutex<Vec<String>>,
}

impl StubPlaces {
    /// Create a stub with no configured responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `query` with `candidates`.
    #[must_use]
    pub fn with_results(self, query: &str, candidates: Vec<CandidateLocation>) -> Self {
        self.results.lock().insert(query.to_owned(), Ok(candidates));
        self
    }

    /// Fail searches for `query` with `error`.
    #[must_use]
    pub fn with_error(self, query: &str, error: ProviderError) -> Self {
        self.results.lock().insert(query.to_owned(), Err(error));
        self
    }

    /// Delay the response to `query` by `delay` of Tokio time.
    #[must_use]
    pub fn with_delay(self, query: &str, delay: Duration) -> Self {
        self.delays.lock().insert(query.to_owned(), delay);
        self
    }

    /// Resolve `place_id` to `coord`.
    #[must_use]
    pub fn with_coordinates(self, place_id: &str, coord: Coord<f64>) -> Self {
        self.coordinates.lock().insert(PlaceId::new(place_id), coord);
        self
    }

    /// Queries received so far, in call order.
    #[must_use]
    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().clone()
    }
}

#[async_trait]
impl GeocodingProvider for StubPlaces {
    async fn search(
        &self,
        query: &str,
        _country: Option<&str>,
    ) -> Result<Vec<CandidateLocation>, ProviderError> {
        self.searches.lock().push(query.to_owned());
        let delay = self.delays.lock().get(query).copied();
        if let Some(pause) = delay {
            tokio::time::sleep(pause).await;
        }
        self.results
            .lock()
            .get(query)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[async_trait]
impl PlaceDetailsProvider for StubPlaces {
    async fn coordinates(&self, place_id: &PlaceId) -> Result<Coord<f64>, ProviderError> {
        self.coordinates
            .lock()
            .get(place_id)
            .copied()
            .ok_or_else(|| ProviderError::ServiceError {
                code: "NOT_FOUND".to_owned(),
                message: format!("unknown place {place_id}"),
            })
    }
}

/// Distance stub returning a fixed number of meters for every pair.
#[derive(Debug)]
pub struct StubDistance {
    response: Mutex<Result<f64, ProviderError>>,
    delay: Duration,
    calls: Mutex<Vec<(Coord<f64>, Coord<f64>)>>,
}

impl StubDistance {
    /// Answer every request with `meters`.
    #[must_use]
    pub fn with_meters(meters: f64) -> Self {
        Self {
            response: Mutex::new(Ok(meters)),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every request with `error`.
    #[must_use]
    pub fn with_error(error: ProviderError) -> Self {
        Self {
            response: Mutex::new(Err(error)),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Delay every response by `delay` of Tokio time.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Change the response for subsequent calls.
    pub fn respond_with(&self, response: Result<f64, ProviderError>) {
        *self.response.lock() = response;
    }

    /// Pairs requested so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<(Coord<f64>, Coord<f64>)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl DistanceProvider for StubDistance {
    async fn distance_meters(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<f64, ProviderError> {
        self.calls.lock().push((origin, destination));
        let response = self.response.lock().clone();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        response
    }
}

/// Pricing stub with a fixed answer.
#[derive(Debug)]
pub struct StubPricing {
    response: Result<Quote, ProviderError>,
    requests: Mutex<Vec<QuoteRequest>>,
}

impl StubPricing {
    /// Answer every request with `quote`.
    #[must_use]
    pub const fn with_quote(quote: Quote) -> Self {
        Self {
            response: Ok(quote),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail every request with `error`.
    #[must_use]
    pub const fn with_error(error: ProviderError) -> Self {
        Self {
            response: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<QuoteRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl PricingProvider for StubPricing {
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, ProviderError> {
        self.requests.lock().push(request.clone());
        self.response.clone()
    }
}

/// Fleet inventory stub with a fixed roster.
#[derive(Debug)]
pub struct StubFleet {
    response: Result<Roster, ProviderError>,
    requests: Mutex<Vec<(NaiveDate, Option<f64>)>>,
}

impl StubFleet {
    /// Answer every request with `roster`, honouring `capacity_min`.
    #[must_use]
    pub const fn with_roster(roster: Roster) -> Self {
        Self {
            response: Ok(roster),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail every request with `error`.
    #[must_use]
    pub const fn with_error(error: ProviderError) -> Self {
        Self {
            response: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<(NaiveDate, Option<f64>)> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl FleetProvider for StubFleet {
    async fn roster(
        &self,
        date: NaiveDate,
        capacity_min: Option<f64>,
    ) -> Result<Roster, ProviderError> {
        self.requests.lock().push((date, capacity_min));
        let mut roster = self.response.clone()?;
        if let Some(min) = capacity_min {
            roster.vehicles.retain(|vehicle| vehicle.capacity_kg >= min);
        }
        Ok(roster)
    }
}

/// Submission stub that either accepts everything or rejects everything.
#[derive(Debug, Default)]
pub struct StubSubmission {
    rejection: Option<ProviderError>,
    assignments: Mutex<Vec<AssignmentPayload>>,
    splits: Mutex<Vec<SplitPayload>>,
}

impl StubSubmission {
    /// Accept every submission.
    #[must_use]
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Reject every submission with `error`.
    #[must_use]
    pub fn rejecting(error: ProviderError) -> Self {
        Self {
            rejection: Some(error),
            ..Self::default()
        }
    }

    /// Assignment payloads received so far.
    #[must_use]
    pub fn assignments(&self) -> Vec<AssignmentPayload> {
        self.assignments.lock().clone()
    }

    /// Split payloads received so far.
    #[must_use]
    pub fn splits(&self) -> Vec<SplitPayload> {
        self.splits.lock().clone()
    }

    fn outcome(&self) -> Result<(), ProviderError> {
        self.rejection.clone().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl SubmissionProvider for StubSubmission {
    async fn submit_assignment(
        &self,
        payload: &AssignmentPayload,
    ) -> Result<AssignmentRecord, ProviderError> {
        self.assignments.lock().push(payload.clone());
        self.outcome()?;
        Ok(AssignmentRecord {
            id: AssignmentId::new("a-1"),
            cargo_id: payload.cargo_id.clone(),
            driver_id: payload.driver_id.clone(),
            vehicle_id: payload.vehicle_id.clone(),
            weight_kg: payload.weight_kg,
        })
    }

    async fn submit_split(
        &self,
        payload: &SplitPayload,
    ) -> Result<Vec<AssignmentRecord>, ProviderError> {
        self.splits.lock().push(payload.clone());
        self.outcome()?;
        Ok(payload
            .portions
            .iter()
            .enumerate()
            .map(|(index, portion)| AssignmentRecord {
                id: AssignmentId::new(format!("a-{}", index + 1)),
                cargo_id: payload.cargo_id.clone(),
                driver_id: portion.driver_id.clone(),
                vehicle_id: portion.vehicle_id.clone(),
                weight_kg: portion.weight_kg,
            })
            .collect())
    }
}

/// Sink collecting notices for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNoticeSink {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNoticeSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }
}

impl NoticeSink for RecordingNoticeSink {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}
