//! Stateful assignment form: mode, selections, split rows and submission.

use chrono::NaiveDate;
use freight_core::{
    AssignmentMode, AssignmentPayload, AssignmentRecord, Cargo, DriverAssignmentRow, DriverId,
    FleetProvider, MAX_SPLIT_ROWS, MIN_SPLIT_ROWS, Notice, NoticeSink, ProviderError, Roster,
    SplitPayload, SplitPortion, SubmissionProvider, VehicleId,
};

use crate::{
    Field, Recommendation, RowEditError, RowField, Selection, SubmitError, TieBreak,
    ValidationErrors, recommend, validate_single, validate_split,
};

/// Notice shown when a submission fails without a backend message.
pub const GENERIC_SUBMIT_FAILURE: &str = "Failed to create assignment. Please try again.";

/// Notice shown when the roster cannot be fetched.
pub const ROSTER_LOAD_FAILURE: &str = "Could not load available vehicles. Please try again.";

/// Plans how one cargo is assigned to the fleet.
///
/// The planner recommends a vehicle until the user picks one, holds the
/// form state for every mode and validates it before anything is sent to
/// the backend. A failed submission leaves the state untouched so the user
/// can correct it and try again.
///
/// # Examples
/// ```
/// use freight_core::{AssignmentMode, Cargo, CargoId, CategoryId, Location, Roster, Vehicle};
/// use freight_planner::AssignmentPlanner;
/// use geo::Coord;
///
/// let here = Location::new("Kigali", Coord { x: 30.06, y: -1.95 });
/// let cargo = Cargo::new(
///     CargoId::new("c-1"), 100.0, None, CategoryId::new("general"), here.clone(), here,
/// )?;
/// let roster = Roster::new(
///     vec![Vehicle::new("v-150", 150.0), Vehicle::new("v-100", 100.0)],
///     Vec::new(),
/// );
/// let planner = AssignmentPlanner::new(cargo, roster);
/// assert_eq!(planner.mode(), AssignmentMode::Full);
/// assert_eq!(planner.selection().vehicle_id.as_ref().map(|id| id.as_str()), Some("v-100"));
/// # Ok::<(), freight_core::CargoError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AssignmentPlanner {
    cargo: Cargo,
    roster: Roster,
    tie_break: TieBreak,
    mode: AssignmentMode,
    mode_locked: bool,
    vehicle_chosen: bool,
    selection: Selection,
    rows: Vec<DriverAssignmentRow>,
    recommendation: Recommendation,
    errors: ValidationErrors,
}

impl AssignmentPlanner {
    /// Start planning `cargo` against `roster` and apply the first
    /// recommendation.
    #[must_use]
    pub fn new(cargo: Cargo, roster: Roster) -> Self {
        let mut planner = Self {
            cargo,
            roster,
            tie_break: TieBreak::default(),
            mode: AssignmentMode::default(),
            mode_locked: false,
            vehicle_chosen: false,
            selection: Selection::default(),
            rows: Vec::new(),
            recommendation: Recommendation::Split,
            errors: ValidationErrors::default(),
        };
        planner.refresh_recommendation();
        planner
    }

    /// Use `tie_break` for recommendations and recompute the current one.
    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self.refresh_recommendation();
        self
    }

    /// Cargo being planned.
    #[must_use]
    pub const fn cargo(&self) -> &Cargo {
        &self.cargo
    }

    /// Roster the plan draws from.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Current assignment mode.
    #[must_use]
    pub const fn mode(&self) -> AssignmentMode {
        self.mode
    }

    /// Most recent recommendation.
    #[must_use]
    pub const fn recommendation(&self) -> &Recommendation {
        &self.recommendation
    }

    /// Driver, vehicle and partial quantities for full or partial mode.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Split rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[DriverAssignmentRow] {
        &self.rows
    }

    /// Errors from the last validation, minus any cleared by later edits.
    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Cargo weight not yet covered by split rows. Negative when the rows
    /// over-allocate.
    #[must_use]
    pub fn remaining_weight(&self) -> f64 {
        let allocated: f64 = self.rows.iter().map(|row| row.weight_kg).sum();
        self.cargo.weight_kg() - allocated
    }

    /// Replace the cargo and re-run the recommendation.
    pub fn set_cargo(&mut self, cargo: Cargo) {
        self.cargo = cargo;
        self.refresh_recommendation();
    }

    /// Replace the roster and re-run the recommendation.
    pub fn set_roster(&mut self, roster: Roster) {
        self.roster = roster;
        self.refresh_recommendation();
    }

    /// Fetch the roster for `date` and re-run the recommendation.
    ///
    /// # Errors
    ///
    /// Returns the fleet provider's error after notifying the user; the
    /// previous roster stays in place.
    pub async fn load_roster<F>(
        &mut self,
        fleet: &F,
        date: NaiveDate,
        capacity_min: Option<f64>,
        notices: &dyn NoticeSink,
    ) -> Result<(), ProviderError>
    where
        F: FleetProvider + ?Sized,
    {
        match fleet.roster(date, capacity_min).await {
            Ok(roster) => {
                log::debug!(
                    "loaded {} vehicles and {} drivers for {date}",
                    roster.vehicles.len(),
                    roster.drivers.len()
                );
                self.set_roster(roster);
                Ok(())
            }
            Err(err) => {
                log::warn!("roster load for {date} failed: {err}");
                notices.notify(Notice::error(ROSTER_LOAD_FAILURE));
                Err(err)
            }
        }
    }

    /// Switch to `mode` at the user's request. The recommendation no longer
    /// changes the mode afterwards.
    pub fn choose_mode(&mut self, mode: AssignmentMode) {
        self.mode_locked = true;
        self.apply_mode(mode);
    }

    /// Set the driver for full or partial mode.
    pub fn select_driver(&mut self, driver_id: Option<DriverId>) {
        self.selection.driver_id = driver_id;
        self.errors.clear_field(Field::DriverId);
    }

    /// Set the vehicle for full or partial mode.
    ///
    /// Choosing a vehicle stops the recommendation; clearing it lets the
    /// recommendation run again without changing the mode.
    pub fn select_vehicle(&mut self, vehicle_id: Option<VehicleId>) {
        self.mode_locked = true;
        self.vehicle_chosen = vehicle_id.is_some();
        self.selection.vehicle_id = vehicle_id;
        self.errors.clear_field(Field::VehicleId);
        self.refresh_recommendation();
    }

    /// Set the weight carried in partial mode.
    pub fn set_assigned_weight(&mut self, weight_kg: Option<f64>) {
        self.selection.assigned_weight_kg = weight_kg;
        self.errors.clear_field(Field::AssignedWeight);
    }

    /// Set the volume carried in partial mode.
    pub fn set_assigned_volume(&mut self, volume: Option<f64>) {
        self.selection.assigned_volume = volume;
        self.errors.clear_field(Field::AssignedVolume);
    }

    /// Append an empty split row and return its index.
    ///
    /// # Errors
    ///
    /// [`RowEditError::TooManyRows`] when the split already has the maximum
    /// number of rows.
    pub fn add_row(&mut self) -> Result<usize, RowEditError> {
        if self.rows.len() >= MAX_SPLIT_ROWS {
            return Err(RowEditError::TooManyRows {
                max: MAX_SPLIT_ROWS,
            });
        }
        self.rows.push(DriverAssignmentRow::default());
        Ok(self.rows.len() - 1)
    }

    /// Remove the split row at `index`.
    ///
    /// # Errors
    ///
    /// [`RowEditError::NoSuchRow`] for an out-of-range index and
    /// [`RowEditError::TooFewRows`] when removal would leave fewer than the
    /// minimum number of rows.
    pub fn remove_row(&mut self, index: usize) -> Result<DriverAssignmentRow, RowEditError> {
        self.check_row(index)?;
        if self.rows.len() <= MIN_SPLIT_ROWS {
            return Err(RowEditError::TooFewRows {
                min: MIN_SPLIT_ROWS,
            });
        }
        self.errors.remove_row(index);
        Ok(self.rows.remove(index))
    }

    /// Set the driver of row `index`.
    ///
    /// # Errors
    ///
    /// [`RowEditError::NoSuchRow`] for an out-of-range index.
    pub fn set_row_driver(
        &mut self,
        index: usize,
        driver_id: Option<DriverId>,
    ) -> Result<(), RowEditError> {
        self.edit_row(index, RowField::Driver, |row| row.driver_id = driver_id)
    }

    /// Set the vehicle of row `index`.
    ///
    /// # Errors
    ///
    /// [`RowEditError::NoSuchRow`] for an out-of-range index.
    pub fn set_row_vehicle(
        &mut self,
        index: usize,
        vehicle_id: Option<VehicleId>,
    ) -> Result<(), RowEditError> {
        self.edit_row(index, RowField::Vehicle, |row| row.vehicle_id = vehicle_id)
    }

    /// Set the weight of row `index`.
    ///
    /// # Errors
    ///
    /// [`RowEditError::NoSuchRow`] for an out-of-range index.
    pub fn set_row_weight(&mut self, index: usize, weight_kg: f64) -> Result<(), RowEditError> {
        self.edit_row(index, RowField::Weight, |row| row.weight_kg = weight_kg)
    }

    /// Set the volume of row `index`.
    ///
    /// # Errors
    ///
    /// [`RowEditError::NoSuchRow`] for an out-of-range index.
    pub fn set_row_volume(
        &mut self,
        index: usize,
        volume: Option<f64>,
    ) -> Result<(), RowEditError> {
        self.edit_row(index, RowField::Volume, |row| row.volume = volume)
    }

    /// Validate the form for the current mode and keep the result.
    pub fn validate(&mut self) -> &ValidationErrors {
        self.errors = match self.mode {
            AssignmentMode::Split => validate_split(&self.cargo, &self.roster, &self.rows),
            AssignmentMode::Full | AssignmentMode::Partial => {
                validate_single(&self.cargo, &self.roster, self.mode, &self.selection)
            }
        };
        &self.errors
    }

    /// Request body for full or partial mode; `None` while the driver, the
    /// vehicle or (in partial mode) the assigned weight is missing, or in
    /// split mode.
    #[must_use]
    pub fn assignment_payload(&self) -> Option<AssignmentPayload> {
        let (weight_kg, volume) = match self.mode {
            AssignmentMode::Full => (self.cargo.weight_kg(), self.cargo.volume()),
            AssignmentMode::Partial => (
                self.selection.assigned_weight_kg?,
                self.selection.assigned_volume,
            ),
            AssignmentMode::Split => return None,
        };
        Some(AssignmentPayload {
            cargo_id: self.cargo.id().clone(),
            driver_id: self.selection.driver_id.clone()?,
            vehicle_id: self.selection.vehicle_id.clone()?,
            mode: self.mode,
            weight_kg,
            volume,
        })
    }

    /// Request body for split mode, built from complete rows only.
    #[must_use]
    pub fn split_payload(&self) -> SplitPayload {
        let portions = self
            .rows
            .iter()
            .filter_map(|row| {
                Some(SplitPortion {
                    driver_id: row.driver_id.clone()?,
                    vehicle_id: row.vehicle_id.clone()?,
                    weight_kg: row.weight_kg,
                    volume: row.volume,
                })
            })
            .collect();
        SplitPayload {
            cargo_id: self.cargo.id().clone(),
            portions,
        }
    }

    /// Validate, then create the assignment through `backend`.
    ///
    /// Full and partial modes create one record; split mode sends a single
    /// request that creates every portion or none. On success `on_complete`
    /// receives the created records. On failure the user is notified with
    /// the backend's message when it sent one and the form stays as it is.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Invalid`] when validation fails (no request is made)
    /// and [`SubmitError::Rejected`] when the backend call fails.
    pub async fn submit<B, F>(
        &mut self,
        backend: &B,
        notices: &dyn NoticeSink,
        on_complete: F,
    ) -> Result<Vec<AssignmentRecord>, SubmitError>
    where
        B: SubmissionProvider + ?Sized,
        F: FnOnce(&[AssignmentRecord]),
    {
        let count = self.validate().len();
        if count > 0 {
            log::debug!("submission blocked by {count} validation error(s)");
            return Err(SubmitError::Invalid { count });
        }

        let outcome = if self.mode == AssignmentMode::Split {
            backend.submit_split(&self.split_payload()).await
        } else {
            let Some(payload) = self.assignment_payload() else {
                return Err(SubmitError::Invalid { count: 1 });
            };
            backend
                .submit_assignment(&payload)
                .await
                .map(|record| vec![record])
        };

        match outcome {
            Ok(records) => {
                log::info!(
                    "created {} assignment record(s) for cargo {}",
                    records.len(),
                    self.cargo.id()
                );
                on_complete(&records);
                Ok(records)
            }
            Err(source) => {
                log::warn!("assignment for cargo {} failed: {source}", self.cargo.id());
                let message = source
                    .user_message()
                    .unwrap_or(GENERIC_SUBMIT_FAILURE)
                    .to_owned();
                notices.notify(Notice::error(message.clone()));
                Err(SubmitError::Rejected { message, source })
            }
        }
    }

    fn apply_mode(&mut self, mode: AssignmentMode) {
        if mode != self.mode {
            self.errors = ValidationErrors::default();
        }
        if mode == AssignmentMode::Split && self.rows.len() < MIN_SPLIT_ROWS {
            self.rows
                .resize_with(MIN_SPLIT_ROWS, DriverAssignmentRow::default);
        }
        self.mode = mode;
    }

    fn refresh_recommendation(&mut self) {
        if self.vehicle_chosen {
            return;
        }
        self.recommendation = recommend(
            self.cargo.weight_kg(),
            &self.roster.vehicles,
            self.tie_break,
        );
        if self.mode_locked {
            return;
        }
        self.apply_mode(self.recommendation.mode());
        self.selection.vehicle_id = self.recommendation.vehicle_id().cloned();
    }

    const fn check_row(&self, index: usize) -> Result<(), RowEditError> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(RowEditError::NoSuchRow {
                index,
                len: self.rows.len(),
            })
        }
    }

    fn edit_row(
        &mut self,
        index: usize,
        field: RowField,
        edit: impl FnOnce(&mut DriverAssignmentRow),
    ) -> Result<(), RowEditError> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(RowEditError::NoSuchRow { index, len })?;
        edit(row);
        self.errors.clear_row_field(index, field);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
