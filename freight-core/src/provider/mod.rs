//! Traits for the external collaborators the booking core calls out to.
//!
//! Every method is asynchronous and may suspend; the calling component owns
//! debouncing, caching and cancellation. Implementations are expected to
//! enforce their own request timeouts.

mod error;

use async_trait::async_trait;
use chrono::NaiveDate;
use geo::Coord;

use crate::{
    AssignmentPayload, AssignmentRecord, CandidateLocation, PlaceId, Quote, QuoteRequest, Roster,
    SplitPayload,
};

pub use error::ProviderError;

/// Free-text place search.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use freight_core::{CandidateLocation, GeocodingProvider, ProviderError};
///
/// struct Fixed;
///
/// #[async_trait]
/// impl GeocodingProvider for Fixed {
///     async fn search(
///         &self,
///         query: &str,
///         _country: Option<&str>,
///     ) -> Result<Vec<CandidateLocation>, ProviderError> {
///         Ok(vec![CandidateLocation::new("p-1", format!("{query}, Rwanda"))])
///     }
/// }
/// ```
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Return candidates matching `query`, optionally restricted to an
    /// ISO 3166-1 alpha-2 `country`.
    async fn search(
        &self,
        query: &str,
        country: Option<&str>,
    ) -> Result<Vec<CandidateLocation>, ProviderError>;
}

/// Resolve a selected candidate to coordinates.
#[async_trait]
pub trait PlaceDetailsProvider: Send + Sync {
    /// Return the position of `place_id` (`x = longitude`, `y = latitude`).
    async fn coordinates(&self, place_id: &PlaceId) -> Result<Coord<f64>, ProviderError>;
}

/// Road distance between two points.
#[async_trait]
pub trait DistanceProvider: Send + Sync {
    /// Return the route distance from `origin` to `destination` in meters.
    async fn distance_meters(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<f64, ProviderError>;
}

/// Price quotes.
#[async_trait]
pub trait PricingProvider: Send + Sync {
    /// Price the shipment described by `request`.
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, ProviderError>;
}

/// Fleet inventory lookups.
#[async_trait]
pub trait FleetProvider: Send + Sync {
    /// Vehicles and drivers available on `date`, optionally limited to
    /// vehicles with at least `capacity_min` kilograms of capacity.
    async fn roster(
        &self,
        date: NaiveDate,
        capacity_min: Option<f64>,
    ) -> Result<Roster, ProviderError>;
}

/// Creates assignment records on the backend.
#[async_trait]
pub trait SubmissionProvider: Send + Sync {
    /// Create one full or partial assignment.
    async fn submit_assignment(
        &self,
        payload: &AssignmentPayload,
    ) -> Result<AssignmentRecord, ProviderError>;

    /// Create every portion of a split assignment, or none of them.
    async fn submit_split(
        &self,
        payload: &SplitPayload,
    ) -> Result<Vec<AssignmentRecord>, ProviderError>;
}
