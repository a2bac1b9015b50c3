//! Refuelling stop selection along a sampled route.
//!
//! The planner reduces route geometry to sparse samples, tracks the
//! remaining tank range between them and chooses stations from a
//! [`StationCatalog`]. Two strategies are available:
//!
//! - [`PlanStrategy::Greedy`] (default): a single pass that looks for the
//!   best-scoring station whenever the remaining range drops below the
//!   trigger threshold, never revisiting earlier choices.
//! - [`PlanStrategy::ShortestPath`]: a minimum-cost path over every station
//!   discovered along the route, falling back to the greedy pass when the
//!   discovered stations cannot bridge the route.

use geo::Coord;
use log::{info, warn};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::distance::is_valid_coordinate;
use crate::{Station, StationCatalog};

mod config;
mod greedy;
mod sampling;
mod shortest_path;

pub use config::{ParseStrategyError, PlanStrategy, PlannerConfig};

/// A committed refuelling stop.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuelStop {
    /// Station chosen for the stop.
    pub station: Station,
    /// Sampled mileage from the start at which the stop was chosen.
    pub distance_from_start_miles: f64,
    /// Fuel purchased, always positive.
    pub gallons: f64,
    /// `retail_price × gallons`.
    pub cost: Decimal,
}

/// Outcome of one planning run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanResult {
    /// Stops in travel order.
    pub stops: Vec<FuelStop>,
    /// Sum of all stop costs.
    pub total_cost: Decimal,
    /// Route distance copied from the request.
    pub total_distance_miles: f64,
    /// Trigger points at which no station lay within the search radius.
    pub uncovered_triggers: usize,
    /// Strategy that produced the stops.
    pub strategy: PlanStrategy,
}

/// Inputs for one planning run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanRequest<'a> {
    /// Route origin.
    pub start: Coord<f64>,
    /// Route destination.
    pub end: Coord<f64>,
    /// Route geometry in travel order.
    pub geometry: &'a [Coord<f64>],
    /// Route distance in miles.
    pub total_distance_miles: f64,
}

/// Errors returned by [`FuelStopPlanner`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Tank range was not a positive finite number.
    #[error("tank range must be positive, got {value}")]
    InvalidTankRange {
        /// Rejected value.
        value: f64,
    },
    /// Fuel economy was not a positive finite number.
    #[error("miles per gallon must be positive, got {value}")]
    InvalidMilesPerGallon {
        /// Rejected value.
        value: f64,
    },
    /// Sample interval was not a positive finite number.
    #[error("sample interval must be positive, got {value}")]
    InvalidSampleInterval {
        /// Rejected value.
        value: f64,
    },
    /// A policy fraction or weight was outside its range.
    #[error("{name} is out of range: {value}")]
    InvalidFraction {
        /// Configuration field name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Route distance was negative or not finite.
    #[error("route distance must be non-negative, got {value}")]
    InvalidDistance {
        /// Rejected value.
        value: f64,
    },
    /// Route geometry had fewer than two points.
    #[error("route geometry needs at least two points, got {points}")]
    InsufficientGeometry {
        /// Number of points supplied.
        points: usize,
    },
    /// A start, end or geometry coordinate was outside WGS84 bounds.
    #[error("route contains an invalid coordinate ({x}, {y})")]
    InvalidCoordinate {
        /// Longitude.
        x: f64,
        /// Latitude.
        y: f64,
    },
    /// A fuel quantity could not be represented as a decimal.
    #[error("fuel quantity {value} cannot be priced")]
    NonFiniteQuantity {
        /// Offending gallon count.
        value: f64,
    },
}

/// Chooses refuelling stops for a route.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use fuelroute_core::{FuelStopPlanner, MemoryCatalog, PlanRequest, PlannerConfig};
///
/// let planner = FuelStopPlanner::new(PlannerConfig::default())?;
/// let geometry = [Coord { x: -83.0, y: 40.0 }, Coord { x: -83.0, y: 40.5 }];
/// let request = PlanRequest {
///     start: geometry[0],
///     end: geometry[1],
///     geometry: &geometry,
///     total_distance_miles: 34.5,
/// };
/// let plan = planner.plan(&MemoryCatalog::default(), &request)?;
/// assert!(plan.stops.is_empty());
/// # Ok::<(), fuelroute_core::PlanError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelStopPlanner {
    config: PlannerConfig,
}

impl FuelStopPlanner {
    /// Validate `config` and construct a planner.
    pub fn new(config: PlannerConfig) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan refuelling stops for `request` using stations from `catalog`.
    pub fn plan<C>(&self, catalog: &C, request: &PlanRequest<'_>) -> Result<PlanResult, PlanError>
    where
        C: StationCatalog + ?Sized,
    {
        validate_request(request)?;
        let samples = sampling::sample_route(
            request.geometry,
            request.total_distance_miles,
            self.config.sample_interval_miles,
        );
        info!(
            "planning {:.1} mi route with {} samples ({})",
            request.total_distance_miles,
            samples.len(),
            self.config.strategy
        );

        let plan = match self.config.strategy {
            PlanStrategy::Greedy => greedy::plan(&self.config, catalog, request, &samples)?,
            PlanStrategy::ShortestPath => {
                match shortest_path::plan(&self.config, catalog, request, &samples)? {
                    Some(bridged) => bridged,
                    None => {
                        warn!("stations along the route cannot bridge it; using greedy plan");
                        greedy::plan(&self.config, catalog, request, &samples)?
                    }
                }
            }
        };
        info!(
            "planned {} stops costing {} ({} uncovered triggers)",
            plan.stops.len(),
            plan.total_cost,
            plan.uncovered_triggers
        );
        Ok(plan)
    }
}

fn validate_request(request: &PlanRequest<'_>) -> Result<(), PlanError> {
    let distance = request.total_distance_miles;
    if !(distance.is_finite() && distance >= 0.0) {
        return Err(PlanError::InvalidDistance { value: distance });
    }
    if request.geometry.len() < 2 {
        return Err(PlanError::InsufficientGeometry {
            points: request.geometry.len(),
        });
    }
    let coordinates = [request.start, request.end]
        .into_iter()
        .chain(request.geometry.iter().copied());
    for coord in coordinates {
        if !is_valid_coordinate(coord) {
            return Err(PlanError::InvalidCoordinate {
                x: coord.x,
                y: coord.y,
            });
        }
    }
    Ok(())
}

/// Price `gallons` at `price`.
fn price_fuel(price: Decimal, gallons: f64) -> Result<Decimal, PlanError> {
    let quantity =
        Decimal::try_from(gallons).map_err(|_| PlanError::NonFiniteQuantity { value: gallons })?;
    Ok(price * quantity)
}

/// Build a stop for `station` after travelling `leg_miles` since the
/// previous fill-up.
#[expect(clippy::float_arithmetic, reason = "gallons are miles over fuel economy")]
fn fuel_stop(
    station: Station,
    distance_from_start_miles: f64,
    leg_miles: f64,
    miles_per_gallon: f64,
) -> Result<FuelStop, PlanError> {
    let gallons = leg_miles / miles_per_gallon;
    let cost = price_fuel(station.retail_price, gallons)?;
    Ok(FuelStop {
        station,
        distance_from_start_miles,
        gallons,
        cost,
    })
}
