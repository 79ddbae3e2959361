//! `plan` command: recommend, validate and optionally submit an assignment.

use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use clap::Parser;
use freight_core::{
    AssignmentMode, AssignmentRecord, Cargo, CargoId, DriverAssignmentRow, DriverId, Notice,
    NoticeSink, Roster, VehicleId,
};
use freight_data::HttpClientConfig;
use freight_planner::{AssignmentPlanner, Field, Recommendation, RowField, SubmitError, TieBreak};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::providers::{NoticeLog, ProviderFactory};
use crate::{ARG_BACKEND_BASE_URL, ARG_PLAN_REQUEST, ARG_SUBMIT, CliError, ENV_PLAN_REQUEST};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load a JSON planning request (cargo, roster or roster date, \
                 mode, selections and split rows), print the vehicle \
                 recommendation and the validation report, and optionally \
                 submit the assignment to the booking backend.",
    about = "Plan a cargo assignment"
)]
#[ortho_config(prefix = "FREIGHT")]
pub(crate) struct PlanArgs {
    /// Path to a JSON file containing a planning request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Submit the assignment when it validates.
    #[arg(long = ARG_SUBMIT)]
    #[serde(default)]
    pub(crate) submit: bool,
    /// Base URL of the booking backend.
    #[arg(long = ARG_BACKEND_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) backend_base_url: Option<String>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) submit: bool,
    pub(crate) backend_base_url: String,
}

impl PlanConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        let path = &self.request_path;
        match std::fs::metadata(path.as_std_path()) {
            Ok(metadata) if metadata.is_file() => Ok(()),
            Ok(_) => Err(CliError::SourcePathNotFile {
                field: ARG_PLAN_REQUEST,
                path: path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field: ARG_PLAN_REQUEST,
                    path: path.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_PLAN_REQUEST,
                path: path.clone(),
                source,
            }),
        }
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_PLAN_REQUEST,
            env: ENV_PLAN_REQUEST,
        })?;
        Ok(Self {
            request_path,
            submit: args.submit,
            backend_base_url: args
                .backend_base_url
                .unwrap_or_else(|| HttpClientConfig::default().base_url),
        })
    }
}

/// Tie-break rule named in a planning request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum TieBreakInput {
    FirstSeen,
    LowestVehicleId,
}

impl From<TieBreakInput> for TieBreak {
    fn from(value: TieBreakInput) -> Self {
        match value {
            TieBreakInput::FirstSeen => Self::FirstSeen,
            TieBreakInput::LowestVehicleId => Self::LowestVehicleId,
        }
    }
}

/// Full or partial form values in a planning request.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub(crate) struct SelectionInput {
    #[serde(default)]
    pub(crate) driver_id: Option<DriverId>,
    #[serde(default)]
    pub(crate) vehicle_id: Option<VehicleId>,
    #[serde(default)]
    pub(crate) assigned_weight_kg: Option<f64>,
    #[serde(default)]
    pub(crate) assigned_volume: Option<f64>,
}

/// JSON planning request.
///
/// Without a `roster` the roster for `date` is fetched from the backend.
/// Without a `mode` the recommendation decides it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub(crate) struct PlanRequest {
    pub(crate) cargo: Cargo,
    #[serde(default)]
    pub(crate) roster: Option<Roster>,
    #[serde(default)]
    pub(crate) date: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) capacity_min: Option<f64>,
    #[serde(default)]
    pub(crate) tie_break: Option<TieBreakInput>,
    #[serde(default)]
    pub(crate) mode: Option<AssignmentMode>,
    #[serde(default)]
    pub(crate) selection: SelectionInput,
    #[serde(default)]
    pub(crate) rows: Vec<DriverAssignmentRow>,
}

/// Loads a JSON-encoded [`PlanRequest`] from disk.
pub(crate) fn load_plan_request(path: &Utf8Path) -> Result<PlanRequest, CliError> {
    let file =
        std::fs::File::open(path.as_std_path()).map_err(|source| CliError::OpenPlanRequest {
            path: path.to_path_buf(),
            source,
        })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParsePlanRequest {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Serialize)]
pub(crate) struct RecommendationView {
    pub(crate) mode: AssignmentMode,
    pub(crate) vehicle_id: Option<VehicleId>,
    pub(crate) utilization: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorView {
    pub(crate) scope: String,
    pub(crate) message: String,
}

/// Report printed by `plan`.
#[derive(Debug, Serialize)]
pub(crate) struct PlanReport {
    pub(crate) cargo_id: CargoId,
    pub(crate) mode: AssignmentMode,
    pub(crate) recommendation: RecommendationView,
    pub(crate) remaining_weight_kg: f64,
    pub(crate) valid: bool,
    pub(crate) errors: Vec<ErrorView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) submitted: Option<Vec<AssignmentRecord>>,
    pub(crate) notices: Vec<Notice>,
}

impl PlanReport {
    fn new(
        planner: &AssignmentPlanner,
        submitted: Option<Vec<AssignmentRecord>>,
        notices: Vec<Notice>,
    ) -> Self {
        let recommendation = planner.recommendation();
        let utilization = match recommendation {
            Recommendation::Full { utilization, .. } => Some(*utilization),
            Recommendation::Split => None,
        };
        let errors = planner.errors();
        let field_errors = errors.field_errors().map(|(field, err)| ErrorView {
            scope: field_scope(field).to_owned(),
            message: err.to_string(),
        });
        let row_errors = errors.row_errors().map(|(index, field, err)| ErrorView {
            scope: format!("rows[{index}].{}", row_scope(field)),
            message: err.to_string(),
        });
        let split_errors = errors.planner_errors().iter().map(|err| ErrorView {
            scope: "split".to_owned(),
            message: err.to_string(),
        });
        Self {
            cargo_id: planner.cargo().id().clone(),
            mode: planner.mode(),
            recommendation: RecommendationView {
                mode: recommendation.mode(),
                vehicle_id: recommendation.vehicle_id().cloned(),
                utilization,
            },
            remaining_weight_kg: planner.remaining_weight(),
            valid: errors.is_valid(),
            errors: field_errors.chain(row_errors).chain(split_errors).collect(),
            submitted,
            notices,
        }
    }
}

const fn field_scope(field: Field) -> &'static str {
    match field {
        Field::CargoId => "cargo_id",
        Field::DriverId => "driver_id",
        Field::VehicleId => "vehicle_id",
        Field::AssignedWeight => "assigned_weight_kg",
        Field::AssignedVolume => "assigned_volume",
    }
}

const fn row_scope(field: RowField) -> &'static str {
    match field {
        RowField::Driver => "driver_id",
        RowField::Vehicle => "vehicle_id",
        RowField::Weight => "weight_kg",
        RowField::Volume => "volume",
    }
}

/// What `plan` produced: the report to print and, when submission failed,
/// the error to exit with afterwards.
#[derive(Debug)]
pub(crate) struct PlanOutcome {
    pub(crate) report: PlanReport,
    pub(crate) failure: Option<SubmitError>,
}

/// Build a planner from `request`, applying the form values in the order a
/// user would enter them.
pub(crate) async fn build_planner(
    request: PlanRequest,
    factory: &dyn ProviderFactory,
    backend_base_url: &str,
    notices: &dyn NoticeSink,
) -> Result<AssignmentPlanner, CliError> {
    let PlanRequest {
        cargo,
        roster,
        date,
        capacity_min,
        tie_break,
        mode,
        selection,
        rows,
    } = request;

    let fetch_date = if roster.is_none() { date } else { None };
    let mut planner = AssignmentPlanner::new(cargo, roster.unwrap_or_default())
        .with_tie_break(tie_break.map(TieBreak::from).unwrap_or_default());
    if let Some(day) = fetch_date {
        let backend = factory.backend(backend_base_url)?;
        planner
            .load_roster(&*backend.fleet, day, capacity_min, notices)
            .await
            .map_err(|source| CliError::LoadRoster { date: day, source })?;
    }

    if let Some(chosen) = mode {
        planner.choose_mode(chosen);
    }
    planner.select_driver(selection.driver_id);
    if selection.vehicle_id.is_some() {
        planner.select_vehicle(selection.vehicle_id);
    }
    planner.set_assigned_weight(selection.assigned_weight_kg);
    planner.set_assigned_volume(selection.assigned_volume);

    for (index, row) in rows.into_iter().enumerate() {
        if index >= planner.rows().len() {
            planner.add_row()?;
        }
        planner.set_row_driver(index, row.driver_id)?;
        planner.set_row_vehicle(index, row.vehicle_id)?;
        planner.set_row_weight(index, row.weight_kg)?;
        planner.set_row_volume(index, row.volume)?;
    }
    Ok(planner)
}

/// Plan the request at the configured path and submit it when asked.
pub(crate) async fn run_plan(
    config: &PlanConfig,
    factory: &dyn ProviderFactory,
) -> Result<PlanOutcome, CliError> {
    let request = load_plan_request(&config.request_path)?;
    let notices = NoticeLog::default();
    let mut planner = build_planner(request, factory, &config.backend_base_url, &notices).await?;

    let (submitted, failure) = if config.submit {
        let backend = factory.backend(&config.backend_base_url)?;
        match planner
            .submit(&*backend.submission, &notices, |_| {})
            .await
        {
            Ok(records) => (Some(records), None),
            Err(err) => (None, Some(err)),
        }
    } else {
        planner.validate();
        (None, None)
    };

    Ok(PlanOutcome {
        report: PlanReport::new(&planner, submitted, notices.take()),
        failure,
    })
}
