//! Single-pass range-reset stop selection.
//!
//! The range tracker is an explicit [`RangeState`] value threaded through
//! [`step`], one sample at a time, so each transition can be exercised on
//! its own.

use geo::Coord;
use log::{debug, info};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::distance::great_circle_miles;
use crate::{Station, StationCatalog};

use super::{FuelStop, PlanError, PlanRequest, PlanResult, PlanStrategy, PlannerConfig, fuel_stop};

/// Range bookkeeping carried between samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RangeState {
    /// Miles left in the tank.
    pub(crate) remaining_range_miles: f64,
    /// Where fuel was last taken on: the start or the latest stop.
    pub(crate) last_stop: Coord<f64>,
    /// Sampled mileage travelled so far.
    pub(crate) miles_travelled: f64,
    /// Previous sample point.
    pub(crate) previous_sample: Coord<f64>,
}

impl RangeState {
    pub(crate) const fn full_tank(config: &PlannerConfig, start: Coord<f64>) -> Self {
        Self {
            remaining_range_miles: config.tank_range_miles,
            last_stop: start,
            miles_travelled: 0.0,
            previous_sample: start,
        }
    }
}

/// What happened at one sample.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StepOutcome {
    /// Enough range left, or the destination was reached.
    Continue,
    /// A stop was committed.
    Stop(FuelStop),
    /// The trigger fired but no station lay within the search radius.
    Uncovered,
}

pub(crate) fn plan<C>(
    config: &PlannerConfig,
    catalog: &C,
    request: &PlanRequest<'_>,
    samples: &[Coord<f64>],
) -> Result<PlanResult, PlanError>
where
    C: StationCatalog + ?Sized,
{
    let Some((&first, rest)) = samples.split_first() else {
        return Ok(empty_plan(request));
    };
    let mut state = RangeState::full_tank(config, first);
    let mut stops = Vec::new();
    let mut uncovered_triggers = 0;

    for (index, &sample) in rest.iter().enumerate() {
        let at_destination = index + 1 == rest.len();
        let (next, outcome) = step(config, catalog, request.end, state, sample, at_destination)?;
        state = next;
        match outcome {
            StepOutcome::Continue => {}
            StepOutcome::Stop(stop) => stops.push(stop),
            StepOutcome::Uncovered => uncovered_triggers += 1,
        }
    }

    let total_cost = stops.iter().map(|stop| stop.cost).sum();
    Ok(PlanResult {
        stops,
        total_cost,
        total_distance_miles: request.total_distance_miles,
        uncovered_triggers,
        strategy: PlanStrategy::Greedy,
    })
}

/// Advance the range tracker to `sample` and decide whether to refuel.
#[expect(
    clippy::float_arithmetic,
    reason = "range bookkeeping subtracts each leg from the tank"
)]
pub(crate) fn step<C>(
    config: &PlannerConfig,
    catalog: &C,
    end: Coord<f64>,
    state: RangeState,
    sample: Coord<f64>,
    at_destination: bool,
) -> Result<(RangeState, StepOutcome), PlanError>
where
    C: StationCatalog + ?Sized,
{
    let leg = great_circle_miles(state.previous_sample, sample);
    let mut next = RangeState {
        remaining_range_miles: state.remaining_range_miles - leg,
        miles_travelled: state.miles_travelled + leg,
        previous_sample: sample,
        ..state
    };
    if at_destination || next.remaining_range_miles >= config.trigger_threshold() {
        return Ok((next, StepOutcome::Continue));
    }

    debug!(
        "trigger at mile {:.1} with {:.1} mi remaining",
        next.miles_travelled, next.remaining_range_miles
    );
    let Some(station) = best_candidate(config, catalog, end, next.last_stop, sample) else {
        info!(
            "no station within {:.1} mi of mile {:.1}",
            config.search_radius(),
            next.miles_travelled
        );
        return Ok((next, StepOutcome::Uncovered));
    };

    let leg_since_fill = great_circle_miles(next.last_stop, station.location);
    let location = station.location;
    let stop = fuel_stop(
        station,
        next.miles_travelled,
        leg_since_fill,
        config.miles_per_gallon,
    )?;
    info!(
        "stop at {} ({}) mile {:.1}: {:.2} gal for {}",
        stop.station.name,
        stop.station.external_id,
        stop.distance_from_start_miles,
        stop.gallons,
        stop.cost
    );
    next.remaining_range_miles = config.tank_range_miles;
    next.last_stop = location;
    Ok((next, StepOutcome::Stop(stop)))
}

/// Lowest-scoring station near `point`; the first wins ties.
fn best_candidate<C>(
    config: &PlannerConfig,
    catalog: &C,
    end: Coord<f64>,
    last_stop: Coord<f64>,
    point: Coord<f64>,
) -> Option<Station>
where
    C: StationCatalog + ?Sized,
{
    catalog
        .find_within_radius(point, config.search_radius())
        .filter(|station| great_circle_miles(last_stop, station.location) > 0.0)
        .map(|station| (score(config, end, point, &station), station))
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, station)| station)
}

/// `price + deviation × weight`, where deviation is the extra distance of
/// detouring through the station on the way to `end`.
#[expect(clippy::float_arithmetic, reason = "score blends price with detour miles")]
fn score(config: &PlannerConfig, end: Coord<f64>, point: Coord<f64>, station: &Station) -> f64 {
    let deviation = great_circle_miles(point, station.location)
        + great_circle_miles(station.location, end)
        - great_circle_miles(point, end);
    decimal_to_f64(station.retail_price) + deviation * config.deviation_weight
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::INFINITY)
}

const fn empty_plan(request: &PlanRequest<'_>) -> PlanResult {
    PlanResult {
        stops: Vec::new(),
        total_cost: Decimal::ZERO,
        total_distance_miles: request.total_distance_miles,
        uncovered_triggers: 0,
        strategy: PlanStrategy::Greedy,
    }
}
