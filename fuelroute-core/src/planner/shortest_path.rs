//! Minimum-cost stop selection over the stations discovered along a route.
//!
//! Every station within the search radius of any sample becomes a node,
//! placed at the mileage of the sample it lies closest to. Nodes are
//! ordered by mileage between the start and the destination; an edge joins
//! two nodes when the mileage between them fits in one tank. Entering a station
//! buys the fuel burned since the previous node at that station's price;
//! entering the destination costs nothing.

use std::collections::HashMap;

use geo::Coord;
use log::debug;
use rust_decimal::Decimal;

use crate::distance::great_circle_miles;
use crate::{Station, StationCatalog};

use super::{PlanError, PlanRequest, PlanResult, PlanStrategy, PlannerConfig, fuel_stop, price_fuel};

struct Node {
    mile: f64,
    location: Coord<f64>,
    station: Option<Station>,
}

/// Cheapest known way to reach a node.
#[derive(Debug, Clone, Copy)]
struct Label {
    cost: Decimal,
    parent: Option<usize>,
}

/// Cheapest plan, or `None` when the discovered stations cannot bridge the
/// route within the tank range.
pub(crate) fn plan<C>(
    config: &PlannerConfig,
    catalog: &C,
    request: &PlanRequest<'_>,
    samples: &[Coord<f64>],
) -> Result<Option<PlanResult>, PlanError>
where
    C: StationCatalog + ?Sized,
{
    let nodes = route_nodes(config, catalog, request, samples);
    debug!("shortest-path search over {} nodes", nodes.len());

    // Nodes are in mileage order, so every edge points forward and one
    // pass settles each node from the labels before it.
    let mut labels: Vec<Option<Label>> = Vec::with_capacity(nodes.len());
    labels.push(Some(Label {
        cost: Decimal::ZERO,
        parent: None,
    }));
    for target in nodes.iter().skip(1) {
        let label = cheapest_entry(config, &nodes, &labels, target)?;
        labels.push(label);
    }

    let Some(&Some(arrival)) = labels.last() else {
        return Ok(None);
    };

    let mut path: Vec<&Node> = Vec::new();
    let mut cursor = nodes.len().checked_sub(1);
    while let Some(index) = cursor {
        let (Some(node), Some(Some(label))) = (nodes.get(index), labels.get(index)) else {
            break;
        };
        path.push(node);
        cursor = label.parent;
    }
    path.reverse();

    let mut stops = Vec::new();
    for (from, to) in path.iter().zip(path.iter().skip(1)) {
        if let Some(station) = &to.station {
            let leg = great_circle_miles(from.location, to.location);
            stops.push(fuel_stop(
                station.clone(),
                to.mile,
                leg,
                config.miles_per_gallon,
            )?);
        }
    }

    Ok(Some(PlanResult {
        stops,
        total_cost: arrival.cost,
        total_distance_miles: request.total_distance_miles,
        uncovered_triggers: 0,
        strategy: PlanStrategy::ShortestPath,
    }))
}

/// Cheapest label for `target` over the already settled `labels`; the
/// earliest predecessor wins ties.
#[expect(
    clippy::float_arithmetic,
    reason = "edges are limited by the mileage between nodes"
)]
fn cheapest_entry(
    config: &PlannerConfig,
    nodes: &[Node],
    labels: &[Option<Label>],
    target: &Node,
) -> Result<Option<Label>, PlanError> {
    let mut cheapest: Option<Label> = None;
    for (from, (source, label)) in nodes.iter().zip(labels).enumerate() {
        let Some(reached) = label else {
            continue;
        };
        if target.mile - source.mile > config.tank_range_miles {
            continue;
        }
        let Some(edge) = edge_cost(config, source, target)? else {
            continue;
        };
        let cost = reached.cost + edge;
        if cheapest.is_none_or(|current| cost < current.cost) {
            cheapest = Some(Label {
                cost,
                parent: Some(from),
            });
        }
    }
    Ok(cheapest)
}

/// Start, discovered stations by mileage, destination.
///
/// A station sits at the mileage of the sample it lies closest to.
#[expect(clippy::float_arithmetic, reason = "mileage accumulates sample legs")]
fn route_nodes<C>(
    config: &PlannerConfig,
    catalog: &C,
    request: &PlanRequest<'_>,
    samples: &[Coord<f64>],
) -> Vec<Node>
where
    C: StationCatalog + ?Sized,
{
    let mut nearest: HashMap<String, (f64, Node)> = HashMap::new();
    let mut mile = 0.0;
    let mut previous = samples.first().copied().unwrap_or(request.start);

    for &sample in samples {
        mile += great_circle_miles(previous, sample);
        previous = sample;
        for station in catalog.find_within_radius(sample, config.search_radius()) {
            let offset = great_circle_miles(sample, station.location);
            let closer = nearest
                .get(&station.external_id)
                .is_none_or(|(best, _)| offset < *best);
            if closer {
                let id = station.external_id.clone();
                let node = Node {
                    mile,
                    location: station.location,
                    station: Some(station),
                };
                nearest.insert(id, (offset, node));
            }
        }
    }

    let mut stations: Vec<Node> = nearest.into_values().map(|(_, node)| node).collect();
    stations.sort_by(|a, b| {
        a.mile
            .total_cmp(&b.mile)
            .then_with(|| station_id(a).cmp(station_id(b)))
    });

    let mut nodes = Vec::with_capacity(stations.len() + 2);
    nodes.push(Node {
        mile: 0.0,
        location: request.start,
        station: None,
    });
    nodes.extend(stations);
    nodes.push(Node {
        mile,
        location: request.end,
        station: None,
    });
    nodes
}

fn station_id(node: &Node) -> &str {
    node.station
        .as_ref()
        .map_or("", |station| station.external_id.as_str())
}

/// Cost of moving from `from` to `to`; `None` when the move buys no fuel.
#[expect(clippy::float_arithmetic, reason = "gallons are miles over fuel economy")]
fn edge_cost(
    config: &PlannerConfig,
    from: &Node,
    to: &Node,
) -> Result<Option<Decimal>, PlanError> {
    let Some(station) = &to.station else {
        return Ok(Some(Decimal::ZERO));
    };
    let leg = great_circle_miles(from.location, to.location);
    if leg <= 0.0 {
        return Ok(None);
    }
    price_fuel(station.retail_price, leg / config.miles_per_gallon).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryCatalog;
    use crate::distance::north_of;
    use crate::planner::sampling::sample_route;
    use crate::test_support::{meridian_route, station_at};
    use rstest::rstest;

    const START: Coord<f64> = Coord { x: -100.0, y: 30.0 };

    fn run(catalog: &MemoryCatalog, miles: f64) -> Option<PlanResult> {
        let route = meridian_route(START, miles, 201);
        let request = PlanRequest {
            start: START,
            end: north_of(START, miles),
            geometry: &route.geometry,
            total_distance_miles: route.distance_miles,
        };
        let config = PlannerConfig::default().with_strategy(PlanStrategy::ShortestPath);
        let samples = sample_route(&route.geometry, miles, config.sample_interval_miles);
        plan(&config, catalog, &request, &samples).expect("plan")
    }

    #[rstest]
    fn short_route_needs_no_stops() {
        let catalog = MemoryCatalog::from_stations([station_at(
            "s",
            north_of(START, 100.0),
            Decimal::new(400, 2),
        )])
        .expect("catalog");
        let plan = run(&catalog, 300.0).expect("reachable");
        assert!(plan.stops.is_empty());
        assert_eq!(plan.total_cost, Decimal::ZERO);
    }

    #[rstest]
    fn unreachable_destination_yields_none() {
        let plan = run(&MemoryCatalog::default(), 900.0);
        assert!(plan.is_none());
    }

    #[rstest]
    fn picks_cheaper_of_two_bridging_stations() {
        let catalog = MemoryCatalog::from_stations([
            station_at("dear", north_of(START, 400.0), Decimal::new(500, 2)),
            station_at("cheap", north_of(START, 450.0), Decimal::new(300, 2)),
        ])
        .expect("catalog");
        let plan = run(&catalog, 800.0).expect("reachable");
        let ids: Vec<_> = plan
            .stops
            .iter()
            .map(|stop| stop.station.external_id.as_str())
            .collect();
        assert_eq!(ids, ["cheap"]);
        assert_eq!(plan.strategy, PlanStrategy::ShortestPath);
        assert_eq!(
            plan.stops.first().map(|stop| stop.cost),
            Some(plan.total_cost)
        );
    }
}
