//! Error types emitted by the freight CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use freight_core::ProviderError;
use freight_data::ProviderBuildError;
use freight_planner::{RowEditError, SubmitError};
use freight_resolve::CostError;
use thiserror::Error;

/// Errors emitted by the freight CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A coordinate option is not a `lat,lng` pair.
    #[error("{field} value {value:?} is not a latitude,longitude pair")]
    InvalidCoordinate { field: &'static str, value: String },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the planning request file failed.
    #[error("failed to open planning request at {path:?}: {source}")]
    OpenPlanRequest {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Planning request JSON could not be decoded.
    #[error("failed to parse planning request JSON at {path:?}: {source}")]
    ParsePlanRequest {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Constructing an HTTP adapter failed.
    #[error("failed to build provider for {base_url:?}: {source}")]
    BuildProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not be started.
    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The routing service could not measure the route.
    #[error("distance could not be calculated")]
    DistanceUnavailable,
    /// The quote inputs were rejected.
    #[error(transparent)]
    Cost(#[from] CostError),
    /// A split row in the planning request could not be applied.
    #[error("invalid split rows: {0}")]
    EditRows(#[from] RowEditError),
    /// Fetching the roster failed.
    #[error("failed to load the roster for {date}: {source}")]
    LoadRoster {
        date: NaiveDate,
        #[source]
        source: ProviderError,
    },
    /// The assignment was not created.
    #[error(transparent)]
    Submit(#[from] SubmitError),
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
