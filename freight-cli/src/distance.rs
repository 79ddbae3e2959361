//! `distance` command: road distance between two coordinates.

use std::sync::Arc;

use clap::Parser;
use freight_core::{Notice, NoticeSink};
use freight_data::DEFAULT_OSRM_BASE_URL;
use freight_resolve::{DistanceEstimate, DistanceEstimator, DistanceState, EstimatorConfig};
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::providers::{NoticeLog, ProviderFactory};
use crate::{ARG_FROM, ARG_OSRM_BASE_URL, ARG_TO, CliError, ENV_DISTANCE_FROM, ENV_DISTANCE_TO};

/// CLI arguments for the `distance` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Ask the routing service for the driving distance between two \
                 points given as latitude,longitude pairs. The distance is \
                 printed in kilometers, rounded to two decimal places.",
    about = "Estimate the road distance between two points"
)]
#[ortho_config(prefix = "FREIGHT")]
pub(crate) struct DistanceArgs {
    /// Origin as "lat,lng".
    #[arg(long = ARG_FROM, value_name = "lat,lng", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) from: Option<String>,
    /// Destination as "lat,lng".
    #[arg(long = ARG_TO, value_name = "lat,lng", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) to: Option<String>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
}

impl DistanceArgs {
    pub(crate) fn into_config(self) -> Result<DistanceConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DistanceConfig::try_from(merged)
    }
}

/// Resolved `distance` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DistanceConfig {
    pub(crate) from: Coord<f64>,
    pub(crate) to: Coord<f64>,
    pub(crate) osrm_base_url: String,
}

impl TryFrom<DistanceArgs> for DistanceConfig {
    type Error = CliError;

    fn try_from(args: DistanceArgs) -> Result<Self, Self::Error> {
        let from = args.from.ok_or(CliError::MissingArgument {
            field: ARG_FROM,
            env: ENV_DISTANCE_FROM,
        })?;
        let to = args.to.ok_or(CliError::MissingArgument {
            field: ARG_TO,
            env: ENV_DISTANCE_TO,
        })?;
        Ok(Self {
            from: parse_lat_lng(ARG_FROM, &from)?,
            to: parse_lat_lng(ARG_TO, &to)?,
            osrm_base_url: args
                .osrm_base_url
                .unwrap_or_else(|| DEFAULT_OSRM_BASE_URL.to_owned()),
        })
    }
}

/// Parse `"lat,lng"` into a coordinate with `x` = longitude.
pub(crate) fn parse_lat_lng(field: &'static str, value: &str) -> Result<Coord<f64>, CliError> {
    let invalid = || CliError::InvalidCoordinate {
        field,
        value: value.to_owned(),
    };
    let (lat, lng) = value.split_once(',').ok_or_else(invalid)?;
    let y: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let x: f64 = lng.trim().parse().map_err(|_| invalid())?;
    if !(-90.0..=90.0).contains(&y) || !(-180.0..=180.0).contains(&x) {
        return Err(invalid());
    }
    Ok(Coord { x, y })
}

/// Result printed by `distance`.
#[derive(Debug, Serialize)]
pub(crate) struct DistanceOutput {
    pub(crate) kilometers: Option<f64>,
    pub(crate) notices: Vec<Notice>,
}

/// Estimate the configured route once, waiting out the debounce delay.
pub(crate) async fn run_distance(
    config: &DistanceConfig,
    factory: &dyn ProviderFactory,
) -> Result<DistanceOutput, CliError> {
    let provider = factory.distance(&config.osrm_base_url)?;
    let notices = Arc::new(NoticeLog::default());
    let estimator = DistanceEstimator::new(
        provider,
        Arc::clone(&notices) as Arc<dyn NoticeSink>,
        EstimatorConfig::default(),
    );

    let mut updates = estimator.subscribe();
    let kilometers = match estimator.estimate(config.from, config.to) {
        DistanceEstimate::Cached(km) => Some(km),
        DistanceEstimate::Scheduled => settled(&mut updates).await,
    };
    estimator.shutdown();

    Ok(DistanceOutput {
        kilometers,
        notices: notices.take(),
    })
}

/// Wait for the lookup to finish. The loading flag may be coalesced away,
/// so any update with `loading == false` is the final one.
async fn settled(updates: &mut watch::Receiver<DistanceState>) -> Option<f64> {
    while updates.changed().await.is_ok() {
        let state = *updates.borrow_and_update();
        if !state.loading {
            return state.kilometers;
        }
    }
    None
}
