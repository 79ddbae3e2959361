//! Price quote request and response types.

use crate::CategoryId;

/// Inputs to a price quote.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuoteRequest {
    /// Cargo weight in kilograms.
    pub weight_kg: f64,
    /// Route distance in kilometers; zero while the distance is unresolved.
    pub distance_km: f64,
    /// Pricing category.
    pub category_id: CategoryId,
}

/// Itemised price components reported by the pricing collaborator.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostBreakdown {
    /// Component driven by distance.
    #[cfg_attr(feature = "serde", serde(default))]
    pub distance_cost: f64,
    /// Component driven by weight.
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight_cost: f64,
    /// Category surcharge or discount.
    #[cfg_attr(feature = "serde", serde(default))]
    pub category_adjustment: f64,
}

/// A price returned by the pricing collaborator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quote {
    /// Total price.
    pub cost: f64,
    /// Itemised components, when the collaborator provides them.
    #[cfg_attr(feature = "serde", serde(default))]
    pub breakdown: Option<CostBreakdown>,
}
