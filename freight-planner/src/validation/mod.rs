//! Pre-submission validation for full, partial and split assignments.
//!
//! Errors are scoped to the form field or split row that caused them so the
//! user can fix each one in place. Cross-row problems (row count, weight and
//! volume totals) are planner-level errors.

use std::collections::BTreeMap;

use freight_core::{
    AssignmentMode, Cargo, DriverAssignmentRow, DriverId, MAX_SPLIT_ROWS, MIN_SPLIT_ROWS, Roster,
    VehicleId,
};
use thiserror::Error;

/// Fields of a single-vehicle (full or partial) assignment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Cargo being assigned.
    CargoId,
    /// Selected driver.
    DriverId,
    /// Selected vehicle. Capacity violations are reported here.
    VehicleId,
    /// Weight carried in partial mode.
    AssignedWeight,
    /// Volume carried in partial mode.
    AssignedVolume,
}

/// Fields of a split-assignment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowField {
    /// Row driver.
    Driver,
    /// Row vehicle.
    Vehicle,
    /// Row weight. Capacity violations are reported here.
    Weight,
    /// Row volume.
    Volume,
}

/// A problem with a single field or row cell.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// No value was supplied.
    #[error("this field is required")]
    Required,
    /// The value was zero, negative or not a number.
    #[error("must be greater than zero")]
    NotPositive,
    /// The value is larger than the cargo total it is a share of.
    #[error("must not exceed the cargo total of {limit}")]
    ExceedsCargo {
        /// Cargo weight or volume.
        limit: f64,
    },
    /// The vehicle cannot carry the weight assigned to it.
    #[error("vehicle capacity is {capacity_kg} kg but {weight_kg} kg is assigned")]
    ExceedsCapacity {
        /// Vehicle capacity.
        capacity_kg: f64,
        /// Weight assigned to the vehicle.
        weight_kg: f64,
    },
    /// The vehicle id does not appear in the loaded roster.
    #[error("vehicle {vehicle_id} is not available")]
    UnknownVehicle {
        /// Offending vehicle.
        vehicle_id: VehicleId,
    },
}

/// A problem with the split as a whole.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    /// Too few or too many complete rows.
    #[error("a split needs between {min} and {max} complete rows, found {count}")]
    RowCount {
        /// Complete rows found.
        count: usize,
        /// Smallest allowed count.
        min: usize,
        /// Largest allowed count.
        max: usize,
    },
    /// Row weights do not add up to the cargo weight.
    #[error("row weights add up to {actual} kg but the cargo weighs {expected} kg")]
    WeightSumMismatch {
        /// Cargo weight.
        expected: f64,
        /// Sum of the complete rows' weights.
        actual: f64,
    },
    /// Row volumes do not add up to the cargo volume.
    #[error("row volumes add up to {actual} but the cargo volume is {expected}")]
    VolumeSumMismatch {
        /// Cargo volume.
        expected: f64,
        /// Sum of the complete rows' volumes.
        actual: f64,
    },
}

/// Every error found by a validation pass.
///
/// Row errors are keyed by the row's position in the full row list, not its
/// position among complete rows, so they line up with what the user sees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationErrors {
    fields: BTreeMap<Field, ValidationError>,
    rows: BTreeMap<(usize, RowField), ValidationError>,
    planner: Vec<PlannerError>,
}

impl ValidationErrors {
    /// Whether no error of any kind was recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.fields.is_empty() && self.rows.is_empty() && self.planner.is_empty()
    }

    /// Total number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len() + self.rows.len() + self.planner.len()
    }

    /// Whether no error was recorded; alias of [`Self::is_valid`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_valid()
    }

    /// Error recorded for `field`.
    #[must_use]
    pub fn field(&self, field: Field) -> Option<&ValidationError> {
        self.fields.get(&field)
    }

    /// Error recorded for `field` of row `index`.
    #[must_use]
    pub fn row(&self, index: usize, field: RowField) -> Option<&ValidationError> {
        self.rows.get(&(index, field))
    }

    /// Field-scoped errors in field order.
    pub fn field_errors(&self) -> impl Iterator<Item = (Field, &ValidationError)> {
        self.fields.iter().map(|(field, error)| (*field, error))
    }

    /// Row-scoped errors ordered by row index, then field.
    pub fn row_errors(&self) -> impl Iterator<Item = (usize, RowField, &ValidationError)> {
        self.rows
            .iter()
            .map(|((index, field), error)| (*index, *field, error))
    }

    /// Planner-level errors in the order they were found.
    #[must_use]
    pub fn planner_errors(&self) -> &[PlannerError] {
        &self.planner
    }

    /// Drop the error for `field`, if any.
    pub fn clear_field(&mut self, field: Field) {
        self.fields.remove(&field);
    }

    /// Drop the error for `field` of row `index`, if any.
    pub fn clear_row_field(&mut self, index: usize, field: RowField) {
        self.rows.remove(&(index, field));
    }

    /// Drop every error belonging to row `index` and shift later rows'
    /// errors down by one, matching a row removal.
    pub fn remove_row(&mut self, index: usize) {
        let rows = std::mem::take(&mut self.rows);
        self.rows = rows
            .into_iter()
            .filter(|((row, _), _)| *row != index)
            .map(|((row, field), error)| {
                let shifted = if row > index { row - 1 } else { row };
                ((shifted, field), error)
            })
            .collect();
    }

    fn set_field(&mut self, field: Field, error: ValidationError) {
        self.fields.entry(field).or_insert(error);
    }

    fn set_row(&mut self, index: usize, field: RowField, error: ValidationError) {
        self.rows.entry((index, field)).or_insert(error);
    }
}

/// Driver, vehicle and partial quantities entered on a single-vehicle form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    /// Selected driver.
    pub driver_id: Option<DriverId>,
    /// Selected vehicle.
    pub vehicle_id: Option<VehicleId>,
    /// Weight to carry in partial mode.
    pub assigned_weight_kg: Option<f64>,
    /// Volume to carry in partial mode.
    pub assigned_volume: Option<f64>,
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Validate a full or partial assignment.
///
/// The capacity check uses the whole cargo weight in full mode and the
/// assigned weight in partial mode, and always reports on
/// [`Field::VehicleId`].
///
/// # Examples
/// ```
/// use freight_core::{AssignmentMode, Cargo, CargoId, CategoryId, Location, Roster, Vehicle};
/// use freight_planner::{Field, Selection, ValidationError, validate_single};
/// use geo::Coord;
///
/// let here = Location::new("Kigali", Coord { x: 30.06, y: -1.95 });
/// let cargo = Cargo::new(
///     CargoId::new("c-1"), 800.0, None, CategoryId::new("general"), here.clone(), here,
/// )?;
/// let roster = Roster::new(vec![Vehicle::new("v-1", 500.0)], Vec::new());
/// let selection = Selection {
///     driver_id: Some("d-1".into()),
///     vehicle_id: Some("v-1".into()),
///     ..Selection::default()
/// };
/// let errors = validate_single(&cargo, &roster, AssignmentMode::Full, &selection);
/// assert!(matches!(
///     errors.field(Field::VehicleId),
///     Some(ValidationError::ExceedsCapacity { .. })
/// ));
/// assert!(errors.field(Field::AssignedWeight).is_none());
/// # Ok::<(), freight_core::CargoError>(())
/// ```
#[must_use]
pub fn validate_single(
    cargo: &Cargo,
    roster: &Roster,
    mode: AssignmentMode,
    selection: &Selection,
) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if cargo.id().is_blank() {
        errors.set_field(Field::CargoId, ValidationError::Required);
    }
    if selection.driver_id.as_ref().is_none_or(DriverId::is_blank) {
        errors.set_field(Field::DriverId, ValidationError::Required);
    }

    let carried_weight = if mode == AssignmentMode::Partial {
        check_partial_quantities(cargo, selection, &mut errors)
    } else {
        Some(cargo.weight_kg())
    };

    match selection.vehicle_id.as_ref().filter(|id| !id.is_blank()) {
        None => errors.set_field(Field::VehicleId, ValidationError::Required),
        Some(vehicle_id) => match roster.vehicle(vehicle_id) {
            None => errors.set_field(
                Field::VehicleId,
                ValidationError::UnknownVehicle {
                    vehicle_id: vehicle_id.clone(),
                },
            ),
            Some(vehicle) => {
                if let Some(weight_kg) = carried_weight
                    && !vehicle.can_carry(weight_kg)
                {
                    errors.set_field(
                        Field::VehicleId,
                        ValidationError::ExceedsCapacity {
                            capacity_kg: vehicle.capacity_kg,
                            weight_kg,
                        },
                    );
                }
            }
        },
    }
    errors
}

/// Check partial weight and volume; returns the weight to test against the
/// vehicle's capacity when one was entered.
fn check_partial_quantities(
    cargo: &Cargo,
    selection: &Selection,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    match selection.assigned_weight_kg {
        None => errors.set_field(Field::AssignedWeight, ValidationError::Required),
        Some(weight) if !is_positive(weight) => {
            errors.set_field(Field::AssignedWeight, ValidationError::NotPositive);
        }
        Some(weight) if weight > cargo.weight_kg() => errors.set_field(
            Field::AssignedWeight,
            ValidationError::ExceedsCargo {
                limit: cargo.weight_kg(),
            },
        ),
        Some(_) => {}
    }

    if let (Some(volume), Some(limit)) = (
        selection.assigned_volume,
        cargo.volume().filter(|total| *total > 0.0),
    ) {
        if !is_positive(volume) {
            errors.set_field(Field::AssignedVolume, ValidationError::NotPositive);
        } else if volume > limit {
            errors.set_field(
                Field::AssignedVolume,
                ValidationError::ExceedsCargo { limit },
            );
        }
    }

    selection.assigned_weight_kg.filter(|weight| is_positive(*weight))
}

/// Validate a split assignment.
///
/// Only rows with both a driver and a vehicle take part. Weight and volume
/// totals must match the cargo exactly; the volume total is checked only
/// when the cargo has a volume.
#[must_use]
#[expect(
    clippy::float_cmp,
    reason = "split totals are compared exactly against the cargo totals"
)]
pub fn validate_split(
    cargo: &Cargo,
    roster: &Roster,
    rows: &[DriverAssignmentRow],
) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    let candidates: Vec<(usize, &DriverAssignmentRow)> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_complete())
        .collect();

    if !(MIN_SPLIT_ROWS..=MAX_SPLIT_ROWS).contains(&candidates.len()) {
        errors.planner.push(PlannerError::RowCount {
            count: candidates.len(),
            min: MIN_SPLIT_ROWS,
            max: MAX_SPLIT_ROWS,
        });
    }

    for (index, row) in &candidates {
        check_split_row(*index, row, roster, &mut errors);
    }

    let weight_total: f64 = candidates.iter().map(|(_, row)| row.weight_kg).sum();
    if weight_total != cargo.weight_kg() {
        errors.planner.push(PlannerError::WeightSumMismatch {
            expected: cargo.weight_kg(),
            actual: weight_total,
        });
    }

    if let Some(expected) = cargo.volume() {
        let volume_total: f64 = candidates
            .iter()
            .map(|(_, row)| row.volume.unwrap_or_default())
            .sum();
        if volume_total != expected {
            errors.planner.push(PlannerError::VolumeSumMismatch {
                expected,
                actual: volume_total,
            });
        }
    }

    errors
}

fn check_split_row(
    index: usize,
    row: &DriverAssignmentRow,
    roster: &Roster,
    errors: &mut ValidationErrors,
) {
    if row.driver_id.as_ref().is_none_or(DriverId::is_blank) {
        errors.set_row(index, RowField::Driver, ValidationError::Required);
    }
    if !is_positive(row.weight_kg) {
        errors.set_row(index, RowField::Weight, ValidationError::NotPositive);
    }
    if let Some(volume) = row.volume
        && !is_positive(volume)
    {
        errors.set_row(index, RowField::Volume, ValidationError::NotPositive);
    }

    match row.vehicle_id.as_ref().filter(|id| !id.is_blank()) {
        None => errors.set_row(index, RowField::Vehicle, ValidationError::Required),
        Some(vehicle_id) => match roster.vehicle(vehicle_id) {
            None => errors.set_row(
                index,
                RowField::Vehicle,
                ValidationError::UnknownVehicle {
                    vehicle_id: vehicle_id.clone(),
                },
            ),
            Some(vehicle) if !vehicle.can_carry(row.weight_kg) => errors.set_row(
                index,
                RowField::Weight,
                ValidationError::ExceedsCapacity {
                    capacity_kg: vehicle.capacity_kg,
                    weight_kg: row.weight_kg,
                },
            ),
            Some(_) => {}
        },
    }
}
