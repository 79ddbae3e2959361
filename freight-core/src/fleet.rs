//! Fleet inventory: vehicles, drivers and the roster returned for a date.

use crate::{DriverId, VehicleId};

/// Operational status reported by fleet inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VehicleStatus {
    /// Free to take new work.
    #[default]
    Available,
    /// Already carrying cargo.
    InUse,
    /// Out of service.
    Maintenance,
}

/// A fleet vehicle. Read-only from the booking core's point of view.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    /// Inventory identifier.
    pub id: VehicleId,
    /// Maximum payload in kilograms.
    pub capacity_kg: f64,
    /// Maximum payload volume, when the inventory records one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub capacity_volume: Option<f64>,
    /// Operational status.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: VehicleStatus,
}

impl Vehicle {
    /// Construct an available vehicle with no volume limit.
    ///
    /// # Examples
    /// ```
    /// use freight_core::{Vehicle, VehicleStatus};
    ///
    /// let truck = Vehicle::new("v-1", 3_500.0);
    /// assert_eq!(truck.status, VehicleStatus::Available);
    /// assert!(truck.can_carry(3_500.0));
    /// ```
    pub fn new(id: impl Into<VehicleId>, capacity_kg: f64) -> Self {
        Self {
            id: id.into(),
            capacity_kg,
            capacity_volume: None,
            status: VehicleStatus::Available,
        }
    }

    /// Set the volume capacity while returning `self` for chaining.
    #[must_use]
    pub fn with_capacity_volume(mut self, volume: f64) -> Self {
        self.capacity_volume = Some(volume);
        self
    }

    /// Set the status while returning `self` for chaining.
    #[must_use]
    pub fn with_status(mut self, status: VehicleStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether `weight_kg` fits within the vehicle's weight capacity.
    #[must_use]
    pub fn can_carry(&self, weight_kg: f64) -> bool {
        weight_kg <= self.capacity_kg
    }
}

/// A driver who can be paired with a vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Driver {
    /// Backend identifier.
    pub id: DriverId,
    /// Display name.
    pub name: String,
}

impl Driver {
    /// Construct a driver.
    pub fn new(id: impl Into<DriverId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Vehicles and drivers available for a booking date.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    /// Vehicles in the order fleet inventory returned them.
    #[cfg_attr(feature = "serde", serde(default))]
    pub vehicles: Vec<Vehicle>,
    /// Drivers in the order fleet inventory returned them.
    #[cfg_attr(feature = "serde", serde(default))]
    pub drivers: Vec<Driver>,
}

impl Roster {
    /// Build a roster from vehicles and drivers.
    #[must_use]
    pub const fn new(vehicles: Vec<Vehicle>, drivers: Vec<Driver>) -> Self {
        Self { vehicles, drivers }
    }

    /// Look up a vehicle by identifier.
    #[must_use]
    pub fn vehicle(&self, id: &VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| &vehicle.id == id)
    }

    /// Look up a driver by identifier.
    #[must_use]
    pub fn driver(&self, id: &DriverId) -> Option<&Driver> {
        self.drivers.iter().find(|driver| &driver.id == id)
    }
}
