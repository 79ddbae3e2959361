//! Per-booking ownership of the resolution components.
//!
//! A [`BookingSession`] owns one [`LocationResolver`], one
//! [`DistanceEstimator`] and one [`CostEstimator`]. Their caches live as long
//! as the session; every scheduled task hangs off the session's cancellation
//! token, so ending the session stops all outstanding work.

use std::sync::Arc;

use freight_core::{
    CategoryId, DistanceProvider, GeocodingProvider, NoticeSink, PlaceDetailsProvider,
    PricingProvider,
};
use tokio_util::sync::CancellationToken;

use crate::{
    Channel, CostError, CostEstimate, CostEstimator, DistanceEstimate, DistanceEstimator,
    EstimatorConfig, FallbackRates, LocationResolver, ResolverConfig,
};

/// Collaborators used by a [`BookingSession`].
#[derive(Clone)]
pub struct SessionProviders {
    /// Free-text place search.
    pub geocoding: Arc<dyn GeocodingProvider>,
    /// Place coordinates.
    pub place_details: Arc<dyn PlaceDetailsProvider>,
    /// Road distance.
    pub distance: Arc<dyn DistanceProvider>,
    /// Price quotes.
    pub pricing: Arc<dyn PricingProvider>,
    /// User-visible notices.
    pub notices: Arc<dyn NoticeSink>,
}

impl std::fmt::Debug for SessionProviders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionProviders").finish_non_exhaustive()
    }
}

/// Tuning for every component of a [`BookingSession`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionConfig {
    /// Location search settings.
    pub resolver: ResolverConfig,
    /// Distance lookup settings.
    pub estimator: EstimatorConfig,
    /// Rates used when pricing fails.
    pub fallback: FallbackRates,
}

/// The resolution state of one booking.
///
/// Dropping the session cancels its outstanding work, as does
/// [`shutdown`](Self::shutdown).
#[derive(Debug)]
pub struct BookingSession {
    root: CancellationToken,
    resolver: LocationResolver,
    distance: DistanceEstimator,
    cost: CostEstimator,
}

impl BookingSession {
    /// Start a session.
    #[must_use]
    pub fn new(providers: SessionProviders, config: SessionConfig) -> Self {
        let root = CancellationToken::new();
        let resolver = LocationResolver::with_root(
            providers.geocoding,
            providers.place_details,
            Arc::clone(&providers.notices),
            config.resolver,
            root.child_token(),
        );
        let distance = DistanceEstimator::with_root(
            providers.distance,
            Arc::clone(&providers.notices),
            config.estimator,
            root.child_token(),
        );
        let cost = CostEstimator::new(providers.pricing, providers.notices, config.fallback);
        Self {
            root,
            resolver,
            distance,
            cost,
        }
    }

    /// Location search for the pickup and destination inputs.
    #[must_use]
    pub const fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    /// Route distance between the selected locations.
    #[must_use]
    pub const fn distance(&self) -> &DistanceEstimator {
        &self.distance
    }

    /// Shipment pricing.
    #[must_use]
    pub const fn cost(&self) -> &CostEstimator {
        &self.cost
    }

    /// Request the distance between the selected pickup and destination.
    ///
    /// Returns `None` until both locations are selected.
    pub fn refresh_distance(&self) -> Option<DistanceEstimate> {
        let pickup = self.resolver.state(Channel::Pickup).selected?;
        let destination = self.resolver.state(Channel::Destination).selected?;
        Some(self.distance.estimate(pickup.coord, destination.coord))
    }

    /// Price `weight_kg` of `category_id` over the current distance, or
    /// over zero kilometers while the distance is unresolved.
    ///
    /// # Errors
    ///
    /// Returns [`CostError`] when the weight is invalid.
    pub async fn estimate_cost(
        &self,
        weight_kg: f64,
        category_id: &CategoryId,
    ) -> Result<CostEstimate, CostError> {
        let distance_km = self.distance.kilometers_or_zero();
        self.cost.estimate(weight_kg, distance_km, category_id).await
    }

    /// Whether the session has ended.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }

    /// End the session, cancelling every pending timer and in-flight request.
    pub fn shutdown(&self) {
        self.root.cancel();
        self.resolver.shutdown();
        self.distance.shutdown();
    }
}

impl Drop for BookingSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
