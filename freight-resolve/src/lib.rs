//! Debounced, cached and cancellable resolution for freight bookings.
//!
//! Responsibilities:
//! - Turn free-text queries into candidate locations per input channel
//!   ([`LocationResolver`]).
//! - Estimate road distance between the selected locations
//!   ([`DistanceEstimator`]).
//! - Price shipments with a local fallback ([`CostEstimator`]).
//!
//! Boundaries:
//! - Network access goes through the `freight_core` provider traits; this
//!   crate owns only latency control, caching and cancellation.
//! - Provider failures become user notices, never errors past the component.
//!
//! Invariants:
//! - At most one observable outstanding resolution per channel or
//!   estimator; superseded results never overwrite fresher state.
//! - Locks are never held across an `.await`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod cost;
mod debounce;
mod distance;
mod resolver;
mod session;

pub use cost::{CostError, CostEstimate, CostEstimator, CostSource, FALLBACK_NOTICE, FallbackRates};
pub use distance::{
    DISTANCE_FAILURE, DistanceEstimate, DistanceEstimator, DistanceState, EstimatorConfig,
};
pub use resolver::{
    Channel, ChannelState, DETAILS_FAILURE, LocationResolver, Resolution, ResolverConfig,
    SEARCH_FAILURE,
};
pub use session::{BookingSession, SessionConfig, SessionProviders};
