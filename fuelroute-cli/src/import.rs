//! Import command implementation for the fuelroute CLI.

use std::fmt;
use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use fuelroute_core::{Geocoder, GeocodingResolver, SqliteStationStore, StationSink};
use fuelroute_data::{HttpGeocoder, IngestSummary, NominatimConfig, import_station_csv};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATABASE, ARG_IMPORT_CSV, ARG_NOMINATIM_BASE_URL, CliError, DEFAULT_DATABASE,
    ENV_IMPORT_CSV, require_existing, write_json,
};

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Read an OPIS truck-stop CSV export, geocode every new \
                 station through Nominatim and store it in the station \
                 database. Rows already present are skipped, so reruns are \
                 safe. A JSON summary is printed on completion.",
    about = "Import stations from a CSV export"
)]
#[ortho_config(prefix = "FUELROUTE")]
pub(crate) struct ImportArgs {
    /// Path to the station CSV export.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) csv: Option<Utf8PathBuf>,
    /// Path to the SQLite station database; created when missing.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Base URL for the Nominatim server.
    #[arg(long = ARG_NOMINATIM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_base_url: Option<String>,
}

impl ImportArgs {
    pub(crate) fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportConfig::try_from(merged)
    }
}

/// Resolved `import` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportConfig {
    pub(crate) csv: Utf8PathBuf,
    pub(crate) database: Utf8PathBuf,
    pub(crate) nominatim_base_url: String,
}

impl ImportConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.csv, ARG_IMPORT_CSV)
    }
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        let csv = args.csv.ok_or(CliError::MissingArgument {
            field: ARG_IMPORT_CSV,
            env: ENV_IMPORT_CSV,
        })?;
        let database = args
            .database
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE));
        let nominatim_base_url = args
            .nominatim_base_url
            .unwrap_or_else(|| NominatimConfig::default().base_url);
        Ok(Self {
            csv,
            database,
            nominatim_base_url,
        })
    }
}

/// Collaborators for one import run.
pub(crate) struct ImportSession {
    pub(crate) geocoder: Box<dyn Geocoder>,
    pub(crate) sink: Box<dyn StationSink>,
}

impl fmt::Debug for ImportSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportSession")
            .field("stations", &self.sink.station_count())
            .finish_non_exhaustive()
    }
}

/// Builds the geocoder and station sink for the current import invocation.
pub(crate) trait ImportBuilder {
    fn build(&self, config: &ImportConfig) -> Result<ImportSession, CliError>;
}

pub(crate) struct DefaultImportBuilder;

impl ImportBuilder for DefaultImportBuilder {
    fn build(&self, config: &ImportConfig) -> Result<ImportSession, CliError> {
        let sink = SqliteStationStore::open(&config.database).map_err(|source| {
            CliError::OpenStationStore {
                path: config.database.clone(),
                source,
            }
        })?;
        let geocoder = HttpGeocoder::new(config.nominatim_base_url.clone()).map_err(|source| {
            CliError::BuildGeocoder {
                base_url: config.nominatim_base_url.clone(),
                source,
            }
        })?;
        Ok(ImportSession {
            geocoder: Box::new(geocoder),
            sink: Box::new(sink),
        })
    }
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_import_with(args, &DefaultImportBuilder, &mut stdout)
}

pub(crate) fn run_import_with(
    args: ImportArgs,
    builder: &dyn ImportBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let summary = execute_import(args, builder)?;
    write_json(writer, &summary)
}

fn execute_import(
    args: ImportArgs,
    builder: &dyn ImportBuilder,
) -> Result<IngestSummary, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let ImportSession { geocoder, mut sink } = builder.build(&config)?;
    let resolver = GeocodingResolver::new(geocoder);
    let report = import_station_csv(&config.csv, &resolver, &mut *sink).map_err(|source| {
        CliError::ReadStationRecords {
            path: config.csv.clone(),
            source,
        }
    })?;
    Ok(report.summary)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ImportConfig, CliError> {
    let merged = ImportArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ImportConfig::try_from(merged)
}
