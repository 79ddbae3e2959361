//! Shipment pricing with a local fallback.
//!
//! The pricing collaborator is authoritative. When it fails, a linear
//! estimate from [`FallbackRates`] is used instead and the user is told the
//! price is approximate.

use std::sync::Arc;

use freight_core::{
    CategoryId, CostBreakdown, Notice, NoticeSink, PricingProvider, QuoteRequest,
};
use thiserror::Error;

/// Notice shown when the fallback formula priced a shipment.
pub const FALLBACK_NOTICE: &str = "Live pricing is unavailable; showing an estimated price.";

/// Rates for the local linear cost formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackRates {
    /// Price per kilometer of route distance.
    pub per_km: f64,
    /// Price per kilogram of cargo.
    pub per_kg: f64,
}

impl FallbackRates {
    /// Rates used by the booking form.
    pub const BOOKING_FORM: Self = Self {
        per_km: 500.0,
        per_kg: 50.0,
    };

    /// Rates used by the quote preview.
    pub const QUOTE_PREVIEW: Self = Self {
        per_km: 1_000.0,
        per_kg: 100.0,
    };

    /// Price `weight_kg` over `distance_km`.
    ///
    /// # Examples
    /// ```
    /// use freight_resolve::FallbackRates;
    ///
    /// let breakdown = FallbackRates::BOOKING_FORM.breakdown(100.0, 12.0);
    /// assert_eq!(breakdown.distance_cost, 6_000.0);
    /// assert_eq!(breakdown.weight_cost, 5_000.0);
    /// ```
    #[must_use]
    pub fn breakdown(self, weight_kg: f64, distance_km: f64) -> CostBreakdown {
        CostBreakdown {
            distance_cost: self.per_km * distance_km,
            weight_cost: self.per_kg * weight_kg,
            category_adjustment: 0.0,
        }
    }
}

impl Default for FallbackRates {
    fn default() -> Self {
        Self::BOOKING_FORM
    }
}

/// Inputs rejected before any pricing is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CostError {
    /// Weight was zero, negative or not finite.
    #[error("weight must be a positive number of kilograms, got {weight_kg}")]
    InvalidWeight {
        /// Rejected weight.
        weight_kg: f64,
    },
    /// Distance was negative or not finite.
    #[error("distance must be zero or more kilometers, got {distance_km}")]
    InvalidDistance {
        /// Rejected distance.
        distance_km: f64,
    },
}

/// Where a [`CostEstimate`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostSource {
    /// The pricing collaborator.
    Provider,
    /// The local fallback formula.
    Fallback,
}

/// A priced shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct CostEstimate {
    /// Total price.
    pub cost: f64,
    /// Itemised components, if known.
    pub breakdown: Option<CostBreakdown>,
    /// Whether the price is authoritative.
    pub source: CostSource,
}

/// Prices shipments through a [`PricingProvider`], falling back to
/// [`FallbackRates`] on failure.
#[derive(Clone)]
pub struct CostEstimator {
    provider: Arc<dyn PricingProvider>,
    notices: Arc<dyn NoticeSink>,
    fallback: FallbackRates,
}

impl std::fmt::Debug for CostEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostEstimator")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl CostEstimator {
    /// Create an estimator.
    #[must_use]
    pub fn new(
        provider: Arc<dyn PricingProvider>,
        notices: Arc<dyn NoticeSink>,
        fallback: FallbackRates,
    ) -> Self {
        Self {
            provider,
            notices,
            fallback,
        }
    }

    /// Rates applied when the provider fails.
    #[must_use]
    pub const fn fallback(&self) -> FallbackRates {
        self.fallback
    }

    /// Price a shipment. Pass a distance of zero while it is unresolved.
    ///
    /// # Errors
    ///
    /// Returns [`CostError`] for invalid inputs. Provider failures are not
    /// errors; they produce a [`CostSource::Fallback`] estimate.
    pub async fn estimate(
        &self,
        weight_kg: f64,
        distance_km: f64,
        category_id: &CategoryId,
    ) -> Result<CostEstimate, CostError> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(CostError::InvalidWeight { weight_kg });
        }
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(CostError::InvalidDistance { distance_km });
        }

        let request = QuoteRequest {
            weight_kg,
            distance_km,
            category_id: category_id.clone(),
        };
        match self.provider.quote(&request).await {
            Ok(quote) => Ok(CostEstimate {
                cost: quote.cost,
                breakdown: quote.breakdown,
                source: CostSource::Provider,
            }),
            Err(err) => {
                log::warn!("pricing for category {category_id} failed, using fallback: {err}");
                let breakdown = self.fallback.breakdown(weight_kg, distance_km);
                self.notices.notify(Notice::info(FALLBACK_NOTICE));
                Ok(CostEstimate {
                    cost: breakdown.distance_cost + breakdown.weight_cost,
                    breakdown: Some(breakdown),
                    source: CostSource::Fallback,
                })
            }
        }
    }
}
