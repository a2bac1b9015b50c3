//! Command-line interface for importing fuel stations and planning trips.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use serde::Serialize;

mod error;
mod import;
mod plan;

pub use error::CliError;
use import::{ImportArgs, run_import};
use plan::{PlanArgs, run_plan};

const ARG_IMPORT_CSV: &str = "csv";
const ARG_DATABASE: &str = "database";
const ARG_NOMINATIM_BASE_URL: &str = "nominatim-base-url";
const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_PLAN_START: &str = "start";
const ARG_PLAN_END: &str = "end";
const ARG_TANK_RANGE: &str = "tank-range";
const ARG_MPG: &str = "mpg";
const ARG_STRATEGY: &str = "strategy";
const ENV_IMPORT_CSV: &str = "FUELROUTE_CMDS_IMPORT_CSV";
const ENV_PLAN_START: &str = "FUELROUTE_CMDS_PLAN_START";
const ENV_PLAN_END: &str = "FUELROUTE_CMDS_PLAN_END";

/// Station database used when no `--database` is given.
const DEFAULT_DATABASE: &str = "stations.db";

/// Run the fuelroute CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, when a
/// provider or the station database cannot be opened, or when the command
/// itself fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Import(args) => run_import(args),
        Command::Plan(args) => run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "fuelroute",
    about = "Plan cost-aware refuelling stops along US driving routes",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Geocode a station CSV export into the station database.
    Import(ImportArgs),
    /// Plan fuel stops between two locations.
    Plan(PlanArgs),
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match path.metadata() {
        Ok(metadata) if metadata.is_file() => Ok(()),
        Ok(_) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(_) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
    }
}

/// Write `value` as pretty JSON followed by a newline.
fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
