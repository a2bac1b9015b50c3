//! Error types emitted by the fuelroute CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use fuelroute_core::planner::ParseStrategyError;
use fuelroute_core::{PlanError, SqliteStationStoreError, TripError};
use fuelroute_data::{ProviderBuildError, RecordReadError};
use thiserror::Error;

/// Errors emitted by the fuelroute CLI.
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
        /// Name of the offending option.
        field: &'static str,
        /// Environment variable that can supply the option.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Name of the offending option.
        field: &'static str,
        /// Path involved in the failure.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Name of the offending option.
        field: &'static str,
        /// Path involved in the failure.
        path: Utf8PathBuf,
    },
    /// The planning strategy name was not recognised.
    #[error(transparent)]
    InvalidStrategy(#[from] ParseStrategyError),
    /// Vehicle parameters or planner policy values were rejected.
    #[error("invalid planner configuration: {0}")]
    InvalidPlannerConfig(#[source] PlanError),
    /// Opening the station database failed.
    #[error("failed to open station database at {path:?}: {source}")]
    OpenStationStore {
        /// Path involved in the failure.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: SqliteStationStoreError,
    },
    /// Constructing the geocoding provider failed.
    #[error("failed to build geocoder for {base_url:?}: {source}")]
    BuildGeocoder {
        /// Base URL of the provider.
        base_url: String,
        /// Underlying error.
        #[source]
        source: ProviderBuildError,
    },
    /// Constructing the routing provider failed.
    #[error("failed to build route provider for {base_url:?}: {source}")]
    BuildRouteProvider {
        /// Base URL of the provider.
        base_url: String,
        /// Underlying error.
        #[source]
        source: ProviderBuildError,
    },
    /// Reading the station CSV failed before any record was processed.
    #[error("failed to read station records from {path:?}: {source}")]
    ReadStationRecords {
        /// Path involved in the failure.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: RecordReadError,
    },
    /// Trip planning failed.
    #[error("trip planning failed: {0}")]
    PlanTrip(#[source] Box<TripError>),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
