//! Assignment modes, split rows and the payloads sent to the backend.

use crate::{AssignmentId, CargoId, DriverId, VehicleId};

/// How a cargo is spread across vehicles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AssignmentMode {
    /// One vehicle carries the whole cargo.
    #[default]
    Full,
    /// One vehicle carries part of the cargo.
    Partial,
    /// Two to five vehicle/driver pairs carry disjoint portions.
    Split,
}

/// Smallest number of complete rows a split assignment may carry.
pub const MIN_SPLIT_ROWS: usize = 2;
/// Largest number of rows a split assignment may carry.
pub const MAX_SPLIT_ROWS: usize = 5;

/// One vehicle/driver pair in a split assignment, as edited by the user.
///
/// Driver and vehicle stay optional while the row is being filled in; only
/// rows with both set take part in validation and submission.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverAssignmentRow {
    /// Selected driver.
    #[cfg_attr(feature = "serde", serde(default))]
    pub driver_id: Option<DriverId>,
    /// Selected vehicle.
    #[cfg_attr(feature = "serde", serde(default))]
    pub vehicle_id: Option<VehicleId>,
    /// Portion of the cargo weight carried by this pair.
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight_kg: f64,
    /// Portion of the cargo volume carried by this pair.
    #[cfg_attr(feature = "serde", serde(default))]
    pub volume: Option<f64>,
}

impl DriverAssignmentRow {
    /// Build a row with driver and vehicle already chosen.
    pub fn new(
        driver_id: impl Into<DriverId>,
        vehicle_id: impl Into<VehicleId>,
        weight_kg: f64,
    ) -> Self {
        Self {
            driver_id: Some(driver_id.into()),
            vehicle_id: Some(vehicle_id.into()),
            weight_kg,
            volume: None,
        }
    }

    /// Set the volume while returning `self` for chaining.
    #[must_use]
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Whether both the driver and the vehicle are selected.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.driver_id.is_some() && self.vehicle_id.is_some()
    }
}

/// Body of a single full or partial assignment request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignmentPayload {
    /// Cargo being assigned.
    pub cargo_id: CargoId,
    /// Assigned driver.
    pub driver_id: DriverId,
    /// Assigned vehicle.
    pub vehicle_id: VehicleId,
    /// [`AssignmentMode::Full`] or [`AssignmentMode::Partial`].
    pub mode: AssignmentMode,
    /// Weight carried; the whole cargo weight for full assignments.
    pub weight_kg: f64,
    /// Volume carried, if known.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub volume: Option<f64>,
}

/// One portion of a split request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitPortion {
    /// Assigned driver.
    pub driver_id: DriverId,
    /// Assigned vehicle.
    pub vehicle_id: VehicleId,
    /// Weight carried by this pair.
    pub weight_kg: f64,
    /// Volume carried by this pair, if any.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub volume: Option<f64>,
}

/// Body of an atomic split request: every portion is created or none is.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitPayload {
    /// Cargo being split.
    pub cargo_id: CargoId,
    /// Portions in row order.
    pub portions: Vec<SplitPortion>,
}

/// An assignment created by the backend.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignmentRecord {
    /// Backend identifier of the record.
    pub id: AssignmentId,
    /// Cargo the record belongs to.
    pub cargo_id: CargoId,
    /// Assigned driver.
    pub driver_id: DriverId,
    /// Assigned vehicle.
    pub vehicle_id: VehicleId,
    /// Weight carried.
    pub weight_kg: f64,
}
