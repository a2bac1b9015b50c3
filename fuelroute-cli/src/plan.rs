//! Plan command implementation for the fuelroute CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use fuelroute_core::{
    FuelStop, FuelStopPlanner, GeocodingResolver, PlanStrategy, PlannerConfig, SqliteStationStore,
    TripPlan, TripPlanner, TripPlanning,
};
use fuelroute_data::{HttpGeocoder, HttpRouteProvider, NominatimConfig, OsrmConfig};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATABASE, ARG_MPG, ARG_NOMINATIM_BASE_URL, ARG_OSRM_BASE_URL, ARG_PLAN_END,
    ARG_PLAN_START, ARG_STRATEGY, ARG_TANK_RANGE, CliError, DEFAULT_DATABASE, ENV_PLAN_END,
    ENV_PLAN_START, require_existing, write_json,
};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Resolve the start and end locations, fetch a driving route \
                 from OSRM and choose refuelling stops from the station \
                 database. The plan is printed as JSON.",
    about = "Plan fuel stops between two locations"
)]
#[ortho_config(prefix = "FUELROUTE")]
pub(crate) struct PlanArgs {
    /// Trip origin, e.g. "Dallas, TX".
    #[arg(long = ARG_PLAN_START, value_name = "location")]
    #[serde(default)]
    pub(crate) start: Option<String>,
    /// Trip destination.
    #[arg(long = ARG_PLAN_END, value_name = "location")]
    #[serde(default)]
    pub(crate) end: Option<String>,
    /// Path to the SQLite station database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server.
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// Base URL for the Nominatim server.
    #[arg(long = ARG_NOMINATIM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_base_url: Option<String>,
    /// Miles a full tank covers.
    #[arg(long = ARG_TANK_RANGE, value_name = "miles")]
    #[serde(default)]
    pub(crate) tank_range: Option<f64>,
    /// Fuel economy in miles per gallon.
    #[arg(long = ARG_MPG, value_name = "mpg")]
    #[serde(default)]
    pub(crate) mpg: Option<f64>,
    /// Stop-selection strategy: `greedy` or `shortest-path`.
    #[arg(long = ARG_STRATEGY, value_name = "name")]
    #[serde(default)]
    pub(crate) strategy: Option<String>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    pub(crate) start: String,
    pub(crate) end: String,
    pub(crate) database: Utf8PathBuf,
    pub(crate) osrm_base_url: String,
    pub(crate) nominatim_base_url: String,
    pub(crate) planner: PlannerConfig,
}

impl PlanConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.database, ARG_DATABASE)
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let start = args.start.ok_or(CliError::MissingArgument {
            field: ARG_PLAN_START,
            env: ENV_PLAN_START,
        })?;
        let end = args.end.ok_or(CliError::MissingArgument {
            field: ARG_PLAN_END,
            env: ENV_PLAN_END,
        })?;
        let database = args
            .database
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE));
        let osrm_base_url = args
            .osrm_base_url
            .unwrap_or_else(|| OsrmConfig::default().base_url);
        let nominatim_base_url = args
            .nominatim_base_url
            .unwrap_or_else(|| NominatimConfig::default().base_url);

        let defaults = PlannerConfig::default();
        let strategy = args
            .strategy
            .as_deref()
            .map(str::parse::<PlanStrategy>)
            .transpose()?
            .unwrap_or(defaults.strategy);
        let planner = defaults
            .with_tank_range_miles(args.tank_range.unwrap_or(defaults.tank_range_miles))
            .with_miles_per_gallon(args.mpg.unwrap_or(defaults.miles_per_gallon))
            .with_strategy(strategy);
        planner
            .validate()
            .map_err(CliError::InvalidPlannerConfig)?;

        Ok(Self {
            start,
            end,
            database,
            osrm_base_url,
            nominatim_base_url,
            planner,
        })
    }
}

/// Builds the trip planner for the current plan invocation.
pub(crate) trait TripPlannerBuilder {
    fn build(&self, config: &PlanConfig) -> Result<Box<dyn TripPlanning>, CliError>;
}

pub(crate) struct DefaultTripPlannerBuilder;

impl TripPlannerBuilder for DefaultTripPlannerBuilder {
    fn build(&self, config: &PlanConfig) -> Result<Box<dyn TripPlanning>, CliError> {
        let catalog = SqliteStationStore::open(&config.database).map_err(|source| {
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
        let routes = HttpRouteProvider::new(config.osrm_base_url.clone()).map_err(|source| {
            CliError::BuildRouteProvider {
                base_url: config.osrm_base_url.clone(),
                source,
            }
        })?;
        let planner =
            FuelStopPlanner::new(config.planner).map_err(CliError::InvalidPlannerConfig)?;
        Ok(Box::new(TripPlanner::new(
            GeocodingResolver::new(geocoder),
            routes,
            catalog,
            planner,
        )))
    }
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &DefaultTripPlannerBuilder, &mut stdout)
}

pub(crate) fn run_plan_with(
    args: PlanArgs,
    builder: &dyn TripPlannerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let planner = builder.build(&config)?;
    let trip = planner
        .plan_trip(&config.start, &config.end)
        .map_err(|source| CliError::PlanTrip(Box::new(source)))?;
    info!(
        "planned {} stop(s) over {:.1} mi costing {}",
        trip.plan.stops.len(),
        trip.plan.total_distance_miles,
        trip.plan.total_cost
    );
    write_json(writer, &PlanResponse::from(trip))
}

/// JSON document printed by `plan`.
///
/// Coordinate pairs are `[latitude, longitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PlanResponse {
    pub(crate) route: RouteSummary,
    pub(crate) fuel_stops: Vec<FuelStopSummary>,
    pub(crate) total_cost: Decimal,
    pub(crate) total_distance_miles: f64,
    pub(crate) uncovered_triggers: usize,
    pub(crate) strategy: PlanStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RouteSummary {
    pub(crate) distance_miles: f64,
    pub(crate) duration_hours: f64,
    pub(crate) geometry: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct FuelStopSummary {
    pub(crate) station_name: String,
    pub(crate) address: String,
    pub(crate) city: String,
    pub(crate) state: String,
    pub(crate) coordinates: [f64; 2],
    pub(crate) price: Decimal,
    pub(crate) gallons: f64,
    pub(crate) cost: Decimal,
    pub(crate) distance_from_start_miles: f64,
}

impl From<FuelStop> for FuelStopSummary {
    fn from(stop: FuelStop) -> Self {
        let FuelStop {
            station,
            distance_from_start_miles,
            gallons,
            cost,
        } = stop;
        Self {
            coordinates: [station.location.y, station.location.x],
            station_name: station.name,
            address: station.address,
            city: station.city,
            state: station.state,
            price: station.retail_price,
            gallons,
            cost,
            distance_from_start_miles,
        }
    }
}

impl From<TripPlan> for PlanResponse {
    fn from(trip: TripPlan) -> Self {
        let TripPlan { route, plan, .. } = trip;
        Self {
            route: RouteSummary {
                distance_miles: route.distance_miles,
                duration_hours: route.duration_hours,
                geometry: route
                    .geometry
                    .iter()
                    .map(|point| [point.y, point.x])
                    .collect(),
            },
            fuel_stops: plan.stops.into_iter().map(FuelStopSummary::from).collect(),
            total_cost: plan.total_cost,
            total_distance_miles: plan.total_distance_miles,
            uncovered_triggers: plan.uncovered_triggers,
            strategy: plan.strategy,
        }
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
