//! Core domain types for the freight booking engine.
//!
//! This crate defines cargo, fleet and assignment models together with the
//! traits used to reach external collaborators (place search, routing,
//! pricing, fleet inventory and the assignment backend). Constructors
//! validate their input and return `Result` so invalid cargo never reaches
//! the planner.

#![forbid(unsafe_code)]

mod assignment;
pub mod cache;
mod cargo;
mod fleet;
mod ids;
mod location;
mod notice;
mod pricing;
pub mod provider;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use assignment::{
    AssignmentMode, AssignmentPayload, AssignmentRecord, DriverAssignmentRow, MAX_SPLIT_ROWS,
    MIN_SPLIT_ROWS, SplitPayload, SplitPortion,
};
pub use cache::FifoCache;
pub use cargo::{Cargo, CargoError, Location};
pub use fleet::{Driver, Roster, Vehicle, VehicleStatus};
pub use ids::{AssignmentId, CargoId, CategoryId, DriverId, PlaceId, VehicleId};
pub use location::{CandidateLocation, coordinate_pair_key, meters_to_kilometers};
pub use notice::{LogNoticeSink, Notice, NoticeLevel, NoticeSink};
pub use pricing::{CostBreakdown, Quote, QuoteRequest};
pub use provider::{
    DistanceProvider, FleetProvider, GeocodingProvider, PlaceDetailsProvider, PricingProvider,
    ProviderError, SubmissionProvider,
};
