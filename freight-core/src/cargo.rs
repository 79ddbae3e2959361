//! Cargo shipments awaiting assignment.
//!
//! A [`Cargo`] is built by the surrounding booking flow and never changes
//! afterwards. Constructors validate weight and volume so downstream
//! components can rely on `weight_kg > 0`.

use geo::Coord;
use thiserror::Error;

use crate::{CargoId, CategoryId};

/// A named place with resolved coordinates (`x = longitude`, `y = latitude`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Human-readable description, usually the selected candidate's text.
    pub description: String,
    /// WGS84 position.
    pub coord: Coord<f64>,
}

impl Location {
    /// Build a location from a description and coordinates.
    pub fn new(description: impl Into<String>, coord: Coord<f64>) -> Self {
        Self {
            description: description.into(),
            coord,
        }
    }
}

/// Errors returned by [`Cargo::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CargoError {
    /// Weight was zero, negative or not finite.
    #[error("cargo weight must be a positive number of kilograms, got {weight_kg}")]
    InvalidWeight {
        /// Rejected weight.
        weight_kg: f64,
    },
    /// Volume was present but zero, negative or not finite.
    #[error("cargo volume must be positive when set, got {volume}")]
    InvalidVolume {
        /// Rejected volume.
        volume: f64,
    },
}

/// A shipment request with weight, optional volume and two locations.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use freight_core::{Cargo, CargoId, CategoryId, Location};
///
/// let pickup = Location::new("Kigali", Coord { x: 30.06, y: -1.95 });
/// let destination = Location::new("Huye", Coord { x: 29.74, y: -2.6 });
/// let cargo = Cargo::new(
///     CargoId::new("c-1"),
///     1_000.0,
///     Some(12.5),
///     CategoryId::new("general"),
///     pickup,
///     destination,
/// )?;
/// assert_eq!(cargo.weight_kg(), 1_000.0);
/// # Ok::<(), freight_core::CargoError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCargo", into = "RawCargo"))]
pub struct Cargo {
    id: CargoId,
    weight_kg: f64,
    volume: Option<f64>,
    category: CategoryId,
    pickup: Location,
    destination: Location,
}

impl Cargo {
    /// Validate and construct a [`Cargo`].
    ///
    /// # Errors
    ///
    /// Returns [`CargoError::InvalidWeight`] unless `weight_kg` is finite and
    /// positive, and [`CargoError::InvalidVolume`] when a volume is supplied
    /// that is not finite and positive.
    pub fn new(
        id: CargoId,
        weight_kg: f64,
        volume: Option<f64>,
        category: CategoryId,
        pickup: Location,
        destination: Location,
    ) -> Result<Self, CargoError> {
        if !is_positive(weight_kg) {
            return Err(CargoError::InvalidWeight { weight_kg });
        }
        if let Some(v) = volume
            && !is_positive(v)
        {
            return Err(CargoError::InvalidVolume { volume: v });
        }
        Ok(Self {
            id,
            weight_kg,
            volume,
            category,
            pickup,
            destination,
        })
    }

    /// Backend identifier of the cargo.
    #[must_use]
    pub const fn id(&self) -> &CargoId {
        &self.id
    }

    /// Total weight in kilograms. Always positive.
    #[must_use]
    pub const fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    /// Total volume, if the shipper declared one.
    #[must_use]
    pub const fn volume(&self) -> Option<f64> {
        self.volume
    }

    /// Pricing category.
    #[must_use]
    pub const fn category(&self) -> &CategoryId {
        &self.category
    }

    /// Where the cargo is collected.
    #[must_use]
    pub const fn pickup(&self) -> &Location {
        &self.pickup
    }

    /// Where the cargo is delivered.
    #[must_use]
    pub const fn destination(&self) -> &Location {
        &self.destination
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Unvalidated wire form of [`Cargo`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawCargo {
    id: CargoId,
    weight_kg: f64,
    #[serde(default)]
    volume: Option<f64>,
    category: CategoryId,
    pickup: Location,
    destination: Location,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCargo> for Cargo {
    type Error = CargoError;

    fn try_from(raw: RawCargo) -> Result<Self, Self::Error> {
        Self::new(
            raw.id,
            raw.weight_kg,
            raw.volume,
            raw.category,
            raw.pickup,
            raw.destination,
        )
    }
}

#[cfg(feature = "serde")]
impl From<Cargo> for RawCargo {
    fn from(cargo: Cargo) -> Self {
        Self {
            id: cargo.id,
            weight_kg: cargo.weight_kg,
            volume: cargo.volume,
            category: cargo.category,
            pickup: cargo.pickup,
            destination: cargo.destination,
        }
    }
}
