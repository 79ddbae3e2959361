//! Command-line interface for the freight booking core.
//!
//! Each subcommand layers its options from CLI flags, configuration files
//! and `FREIGHT_CMDS_<COMMAND>_<OPTION>` environment variables, converts
//! them into a validated configuration and prints a JSON result on stdout.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod distance;
mod error;
mod plan;
mod providers;
mod quote;
mod search;

pub use error::CliError;

use distance::DistanceArgs;
use plan::PlanArgs;
use providers::{HttpProviders, ProviderFactory};
use quote::QuoteArgs;
use search::SearchArgs;

const ARG_QUERY: &str = "query";
const ARG_CHANNEL: &str = "channel";
const ARG_PLACES_BASE_URL: &str = "places-base-url";
const ARG_PLACES_API_KEY: &str = "places-api-key";
const ARG_COUNTRY: &str = "country";
const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_BACKEND_BASE_URL: &str = "backend-base-url";
const ARG_FROM: &str = "from";
const ARG_TO: &str = "to";
const ARG_WEIGHT_KG: &str = "weight-kg";
const ARG_DISTANCE_KM: &str = "distance-km";
const ARG_CATEGORY: &str = "category";
const ARG_FALLBACK_RATES: &str = "fallback-rates";
const ARG_PLAN_REQUEST: &str = "request";
const ARG_SUBMIT: &str = "submit";

const ENV_SEARCH_QUERY: &str = "FREIGHT_CMDS_SEARCH_QUERY";
const ENV_SEARCH_PLACES_API_KEY: &str = "FREIGHT_CMDS_SEARCH_PLACES_API_KEY";
const ENV_DISTANCE_FROM: &str = "FREIGHT_CMDS_DISTANCE_FROM";
const ENV_DISTANCE_TO: &str = "FREIGHT_CMDS_DISTANCE_TO";
const ENV_QUOTE_WEIGHT_KG: &str = "FREIGHT_CMDS_QUOTE_WEIGHT_KG";
const ENV_QUOTE_CATEGORY: &str = "FREIGHT_CMDS_QUOTE_CATEGORY";
const ENV_PLAN_REQUEST: &str = "FREIGHT_CMDS_PLAN_REQUEST_PATH";

/// Run the freight CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, a
/// collaborator cannot be built or the command itself fails.
pub fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => return Err(CliError::ArgumentParsing(err)),
    };
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let mut stdout = std::io::stdout().lock();
    runtime.block_on(execute(cli.command, &HttpProviders, &mut stdout))
}

#[derive(Debug, Parser)]
#[command(
    name = "freight",
    about = "Location search, distance, pricing and assignment planning for cargo bookings",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search for pickup or destination candidates.
    Search(SearchArgs),
    /// Estimate the road distance between two points.
    Distance(DistanceArgs),
    /// Price a shipment.
    Quote(QuoteArgs),
    /// Recommend, validate and optionally submit an assignment.
    Plan(PlanArgs),
}

async fn execute(
    command: Command,
    factory: &dyn ProviderFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Search(args) => {
            let output = search::run_search(&args.into_config()?, factory).await?;
            write_json(writer, &output)
        }
        Command::Distance(args) => {
            let output = distance::run_distance(&args.into_config()?, factory).await?;
            write_json(writer, &output)?;
            if output.kilometers.is_none() {
                return Err(CliError::DistanceUnavailable);
            }
            Ok(())
        }
        Command::Quote(args) => {
            let output = quote::run_quote(&args.into_config()?, factory).await?;
            write_json(writer, &output)
        }
        Command::Plan(args) => {
            let config = args.into_config()?;
            config.validate_sources()?;
            let outcome = plan::run_plan(&config, factory).await?;
            write_json(writer, &outcome.report)?;
            outcome.failure.map_or(Ok(()), |err| Err(err.into()))
        }
    }
}

fn write_json<T: Serialize>(writer: &mut dyn Write, output: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(output).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
