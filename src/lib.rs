//! Facade crate for the freight booking core.
//!
//! This crate re-exports the domain types and exposes the assignment
//! planner, the asynchronous estimators and the HTTP adapters behind feature
//! flags.

#![forbid(unsafe_code)]

pub use freight_core::{
    AssignmentId, AssignmentMode, AssignmentPayload, AssignmentRecord, CandidateLocation, Cargo,
    CargoError, CargoId, CategoryId, CostBreakdown, DistanceProvider, Driver, DriverAssignmentRow,
    DriverId, FifoCache, FleetProvider, GeocodingProvider, Location, LogNoticeSink,
    MAX_SPLIT_ROWS, MIN_SPLIT_ROWS, Notice, NoticeLevel, NoticeSink, PlaceDetailsProvider, PlaceId,
    PricingProvider, ProviderError, Quote, QuoteRequest, Roster, SplitPayload, SplitPortion,
    SubmissionProvider, Vehicle, VehicleId, VehicleStatus,
};

#[cfg(feature = "test-support")]
pub use freight_core::test_support;

#[cfg(feature = "planner")]
pub use freight_planner::{
    AssignmentPlanner, Recommendation, RowEditError, SubmitError, TieBreak, ValidationError,
    ValidationErrors,
};

#[cfg(feature = "resolve")]
pub use freight_resolve::{
    BookingSession, Channel, CostEstimator, DistanceEstimator, FallbackRates, LocationResolver,
    SessionConfig, SessionProviders,
};

#[cfg(feature = "http")]
pub use freight_data::{
    HttpBackendClient, HttpClientConfig, HttpDistanceProvider, HttpPlacesProvider,
};
