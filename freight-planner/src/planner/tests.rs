//! Tests for `AssignmentPlanner`.

use std::cell::Cell;

use super::*;
use crate::ValidationError;
use freight_core::test_support::{RecordingNoticeSink, StubFleet, StubSubmission};
use freight_core::{CargoId, CategoryId, Driver, Location, NoticeLevel, Vehicle};
use geo::Coord;
use rstest::{fixture, rstest};

fn cargo(weight_kg: f64) -> Cargo {
    let here = Location::new("Kigali", Coord { x: 30.06, y: -1.95 });
    let there = Location::new("Huye", Coord { x: 29.74, y: -2.6 });
    Cargo::new(
        CargoId::new("c-1"),
        weight_kg,
        None,
        CategoryId::new("general"),
        here,
        there,
    )
    .expect("valid cargo")
}

#[fixture]
fn roster() -> Roster {
    Roster::new(
        vec![
            Vehicle::new("v-150", 150.0),
            Vehicle::new("v-500", 500.0),
            Vehicle::new("v-100", 100.0),
        ],
        vec![Driver::new("d-1", "Aline"), Driver::new("d-2", "Eric")],
    )
}

#[rstest]
fn preselects_best_fit_vehicle(roster: Roster) {
    let planner = AssignmentPlanner::new(cargo(100.0), roster);
    assert_eq!(planner.mode(), AssignmentMode::Full);
    assert_eq!(planner.selection().vehicle_id, Some(VehicleId::new("v-100")));
}

#[rstest]
fn oversized_cargo_starts_in_split_with_two_rows(roster: Roster) {
    let planner = AssignmentPlanner::new(cargo(600.0), roster);
    assert_eq!(planner.mode(), AssignmentMode::Split);
    assert_eq!(planner.rows().len(), MIN_SPLIT_ROWS);
    assert!(planner.selection().vehicle_id.is_none());
}

#[rstest]
fn roster_change_updates_recommendation_until_vehicle_chosen(roster: Roster) {
    let mut planner = AssignmentPlanner::new(cargo(400.0), roster);
    assert_eq!(planner.selection().vehicle_id, Some(VehicleId::new("v-500")));

    planner.set_roster(Roster::new(vec![Vehicle::new("v-450", 450.0)], Vec::new()));
    assert_eq!(planner.selection().vehicle_id, Some(VehicleId::new("v-450")));

    planner.select_vehicle(Some(VehicleId::new("v-450")));
    planner.set_roster(Roster::new(vec![Vehicle::new("v-400", 400.0)], Vec::new()));
    assert_eq!(planner.selection().vehicle_id, Some(VehicleId::new("v-450")));
}

#[rstest]
fn chosen_mode_is_not_overridden(roster: Roster) {
    let mut planner = AssignmentPlanner::new(cargo(100.0), roster);
    planner.choose_mode(AssignmentMode::Partial);
    planner.set_cargo(cargo(900.0));
    assert_eq!(planner.mode(), AssignmentMode::Partial);
    assert_eq!(planner.recommendation(), &Recommendation::Split);
}

#[rstest]
fn row_limits_are_enforced(roster: Roster) {
    let mut planner = AssignmentPlanner::new(cargo(600.0), roster);
    assert_eq!(
        planner.remove_row(0),
        Err(RowEditError::TooFewRows { min: MIN_SPLIT_ROWS })
    );
    for expected in MIN_SPLIT_ROWS..MAX_SPLIT_ROWS {
        assert_eq!(planner.add_row(), Ok(expected));
    }
    assert_eq!(
        planner.add_row(),
        Err(RowEditError::TooManyRows { max: MAX_SPLIT_ROWS })
    );
    assert!(planner.remove_row(4).is_ok());
    assert_eq!(planner.rows().len(), MAX_SPLIT_ROWS - 1);
}

#[rstest]
fn editing_unknown_row_is_refused(roster: Roster) {
    let mut planner = AssignmentPlanner::new(cargo(600.0), roster);
    assert_eq!(
        planner.set_row_weight(7, 10.0),
        Err(RowEditError::NoSuchRow { index: 7, len: 2 })
    );
}

#[rstest]
fn editing_a_row_field_clears_only_that_error(roster: Roster) {
    let mut planner = AssignmentPlanner::new(cargo(600.0), roster);
    planner
        .set_row_driver(0, Some(DriverId::new("d-1")))
        .expect("row exists");
    planner
        .set_row_vehicle(0, Some(VehicleId::new("v-100")))
        .expect("row exists");
    planner.set_row_weight(0, 300.0).expect("row exists");
    planner.set_row_volume(0, Some(-1.0)).expect("row exists");

    let errors = planner.validate().clone();
    assert!(errors.row(0, RowField::Weight).is_some());
    assert!(errors.row(0, RowField::Volume).is_some());

    planner.set_row_weight(0, 100.0).expect("row exists");
    assert!(planner.errors().row(0, RowField::Weight).is_none());
    assert!(planner.errors().row(0, RowField::Volume).is_some());
    assert_eq!(planner.errors().planner_errors(), errors.planner_errors());
}

#[rstest]
fn editing_a_field_clears_only_that_error(roster: Roster) {
    let mut planner = AssignmentPlanner::new(cargo(100.0), roster);
    planner.choose_mode(AssignmentMode::Partial);
    planner.validate();
    assert!(planner.errors().field(Field::DriverId).is_some());
    assert!(planner.errors().field(Field::AssignedWeight).is_some());

    planner.select_driver(Some(DriverId::new("d-1")));
    assert!(planner.errors().field(Field::DriverId).is_none());
    assert_eq!(
        planner.errors().field(Field::AssignedWeight),
        Some(&ValidationError::Required)
    );
}

#[rstest]
fn remaining_weight_tracks_rows(roster: Roster) {
    let mut planner = AssignmentPlanner::new(cargo(600.0), roster);
    planner.set_row_weight(0, 250.0).expect("row exists");
    planner.set_row_weight(1, 100.0).expect("row exists");
    assert!((planner.remaining_weight() - 250.0).abs() < f64::EPSILON);
}

#[rstest]
fn split_payload_skips_incomplete_rows(roster: Roster) {
    let mut planner = AssignmentPlanner::new(cargo(600.0), roster);
    planner
        .set_row_driver(1, Some(DriverId::new("d-2")))
        .expect("row exists");
    planner
        .set_row_vehicle(1, Some(VehicleId::new("v-500")))
        .expect("row exists");
    planner.set_row_weight(1, 500.0).expect("row exists");
    let payload = planner.split_payload();
    assert_eq!(payload.portions.len(), 1);
    assert_eq!(payload.cargo_id, CargoId::new("c-1"));
}

#[rstest]
fn partial_payload_carries_assigned_weight(roster: Roster) {
    let mut planner = AssignmentPlanner::new(cargo(100.0), roster);
    planner.choose_mode(AssignmentMode::Partial);
    planner.select_driver(Some(DriverId::new("d-1")));
    assert!(planner.assignment_payload().is_none());
    planner.set_assigned_weight(Some(40.0));
    let payload = planner.assignment_payload().expect("payload is complete");
    assert_eq!(payload.mode, AssignmentMode::Partial);
    assert!((payload.weight_kg - 40.0).abs() < f64::EPSILON);
}

#[rstest]
#[tokio::test]
async fn invalid_form_makes_no_request(roster: Roster) {
    let mut planner = AssignmentPlanner::new(cargo(100.0), roster);
    let backend = StubSubmission::accepting();
    let notices = RecordingNoticeSink::new();
    let result = planner.submit(&backend, &notices, |_| {}).await;
    assert_eq!(result, Err(SubmitError::Invalid { count: 1 }));
    assert!(backend.assignments().is_empty());
    assert!(notices.notices().is_empty());
}

#[rstest]
#[tokio::test]
async fn full_submission_invokes_completion(roster: Roster) {
    let mut planner = AssignmentPlanner::new(cargo(100.0), roster);
    planner.select_driver(Some(DriverId::new("d-1")));
    let backend = StubSubmission::accepting();
    let notices = RecordingNoticeSink::new();
    let completed = Cell::new(0);

    let records = planner
        .submit(&backend, &notices, |records| completed.set(records.len()))
        .await
        .expect("submission succeeds");

    assert_eq!(records.len(), 1);
    assert_eq!(completed.get(), 1);
    let sent = backend.assignments();
    let payload = sent.first().expect("one payload sent");
    assert_eq!(payload.vehicle_id, VehicleId::new("v-100"));
    assert!((payload.weight_kg - 100.0).abs() < f64::EPSILON);
}

#[rstest]
#[tokio::test]
async fn split_submission_is_one_request(roster: Roster) {
    let mut planner = AssignmentPlanner::new(cargo(600.0), roster);
    for (index, (driver, vehicle, weight)) in
        [("d-1", "v-150", 100.0), ("d-2", "v-500", 500.0)].into_iter().enumerate()
    {
        planner
            .set_row_driver(index, Some(DriverId::new(driver)))
            .expect("row exists");
        planner
            .set_row_vehicle(index, Some(VehicleId::new(vehicle)))
            .expect("row exists");
        planner.set_row_weight(index, weight).expect("row exists");
    }
    let backend = StubSubmission::accepting();
    let notices = RecordingNoticeSink::new();

    let records = planner
        .submit(&backend, &notices, |_| {})
        .await
        .expect("submission succeeds");

    assert_eq!(records.len(), 2);
    assert_eq!(backend.splits().len(), 1);
    assert!(backend.assignments().is_empty());
}

#[rstest]
#[case::backend_message(Some("Vehicle already booked"), "Vehicle already booked")]
#[case::no_message(None, GENERIC_SUBMIT_FAILURE)]
#[tokio::test]
async fn rejection_is_reported_and_form_kept(
    roster: Roster,
    #[case] backend_message: Option<&str>,
    #[case] shown: &str,
) {
    let mut planner = AssignmentPlanner::new(cargo(100.0), roster);
    planner.select_driver(Some(DriverId::new("d-1")));
    let backend = StubSubmission::rejecting(ProviderError::Rejected {
        message: backend_message.map(str::to_owned),
    });
    let notices = RecordingNoticeSink::new();
    let completed = Cell::new(false);

    let result = planner
        .submit(&backend, &notices, |_| completed.set(true))
        .await;

    let message = match result {
        Err(SubmitError::Rejected { message, .. }) => message,
        other => panic!("expected a rejection, got {other:?}"),
    };
    assert_eq!(message, shown);
    assert!(!completed.get());
    assert_eq!(planner.selection().driver_id, Some(DriverId::new("d-1")));
    let recorded = notices.notices();
    let notice = recorded.first().expect("one notice");
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, shown);
}

#[rstest]
#[tokio::test]
async fn roster_load_applies_capacity_filter(roster: Roster) {
    let mut planner = AssignmentPlanner::new(cargo(120.0), Roster::default());
    assert_eq!(planner.mode(), AssignmentMode::Split);
    let fleet = StubFleet::with_roster(roster);
    let notices = RecordingNoticeSink::new();
    let date = NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date");

    planner
        .load_roster(&fleet, date, Some(120.0), &notices)
        .await
        .expect("roster loads");

    assert_eq!(planner.roster().vehicles.len(), 2);
    assert_eq!(planner.mode(), AssignmentMode::Full);
    assert_eq!(planner.selection().vehicle_id, Some(VehicleId::new("v-150")));
    assert_eq!(fleet.requests(), vec![(date, Some(120.0))]);
}

#[rstest]
#[tokio::test]
async fn roster_failure_keeps_previous_roster(roster: Roster) {
    let mut planner = AssignmentPlanner::new(cargo(100.0), roster.clone());
    let fleet = StubFleet::with_error(ProviderError::NetworkError {
        url: "http://backend/fleet/available".to_owned(),
        message: "connection refused".to_owned(),
    });
    let notices = RecordingNoticeSink::new();
    let date = NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date");

    let result = planner.load_roster(&fleet, date, None, &notices).await;

    assert!(result.is_err());
    assert_eq!(planner.roster(), &roster);
    assert_eq!(notices.notices(), vec![Notice::error(ROSTER_LOAD_FAILURE)]);
}
