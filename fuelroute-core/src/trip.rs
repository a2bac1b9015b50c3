//! End-to-end planning of one trip from location text.

use geo::Coord;
use log::info;
use thiserror::Error;

use crate::{
    FuelStopPlanner, GeocodeError, Geocoder, GeocodingResolver, PlanError, PlanRequest,
    PlanResult, RouteDescriptor, RouteProvider, RoutingError, StationCatalog,
};

/// Errors returned when planning a trip.
#[derive(Debug, Error)]
pub enum TripError {
    /// A location was blank.
    #[error("{field} location is required")]
    MissingLocation {
        /// `start` or `end`.
        field: &'static str,
    },
    /// A location could not be geocoded.
    #[error("failed to geocode {field} location {location:?}")]
    Geocode {
        /// `start` or `end`.
        field: &'static str,
        /// Location text as supplied.
        location: String,
        /// Resolver failure.
        #[source]
        source: GeocodeError,
    },
    /// The routing provider failed.
    #[error("failed to fetch route")]
    Routing(#[from] RoutingError),
    /// The planner rejected the route.
    #[error("failed to plan fuel stops")]
    Plan(#[from] PlanError),
}

/// Result of planning one trip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripPlan {
    /// Resolved origin.
    pub start: Coord<f64>,
    /// Resolved destination.
    pub end: Coord<f64>,
    /// Route between the two.
    pub route: RouteDescriptor,
    /// Chosen stops and totals.
    pub plan: PlanResult,
}

/// Plan a trip between two free-text locations.
pub trait TripPlanning {
    /// Resolve `start` and `end`, fetch the route and choose fuel stops.
    fn plan_trip(&self, start: &str, end: &str) -> Result<TripPlan, TripError>;
}

/// Default [`TripPlanning`] implementation wiring resolver, router,
/// catalog and planner together.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use fuelroute_core::test_support::{StubGeocoder, StubRouteProvider, meridian_route};
/// use fuelroute_core::{
///     FuelStopPlanner, GeocodeCandidate, GeocodingResolver, MemoryCatalog, PlannerConfig,
///     TripPlanner, TripPlanning,
/// };
///
/// let start = Coord { x: -97.0, y: 32.0 };
/// let route = meridian_route(start, 120.0, 10);
/// let end = *route.geometry.last().expect("route has points");
/// let geocoder = StubGeocoder::default()
///     .with_result("Dallas, TX", vec![GeocodeCandidate::at(start.y, start.x)])
///     .with_result("Norman, OK", vec![GeocodeCandidate::at(end.y, end.x)]);
/// let trips = TripPlanner::new(
///     GeocodingResolver::new(geocoder),
///     StubRouteProvider::with_route(route),
///     MemoryCatalog::default(),
///     FuelStopPlanner::new(PlannerConfig::default())?,
/// );
/// let trip = trips.plan_trip("Dallas, TX", "Norman, OK")?;
/// assert!(trip.plan.stops.is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct TripPlanner<G, R, C> {
    resolver: GeocodingResolver<G>,
    routes: R,
    catalog: C,
    planner: FuelStopPlanner,
}

impl<G, R, C> TripPlanner<G, R, C>
where
    G: Geocoder,
    R: RouteProvider,
    C: StationCatalog,
{
    /// Assemble a trip planner.
    #[must_use]
    pub const fn new(
        resolver: GeocodingResolver<G>,
        routes: R,
        catalog: C,
        planner: FuelStopPlanner,
    ) -> Self {
        Self {
            resolver,
            routes,
            catalog,
            planner,
        }
    }

    fn resolve(&self, field: &'static str, text: &str) -> Result<Coord<f64>, TripError> {
        if text.trim().is_empty() {
            return Err(TripError::MissingLocation { field });
        }
        self.resolver
            .resolve(text)
            .map_err(|source| TripError::Geocode {
                field,
                location: text.to_owned(),
                source,
            })
    }
}

impl<G, R, C> TripPlanning for TripPlanner<G, R, C>
where
    G: Geocoder,
    R: RouteProvider,
    C: StationCatalog,
{
    fn plan_trip(&self, start: &str, end: &str) -> Result<TripPlan, TripError> {
        let start_coord = self.resolve("start", start)?;
        let end_coord = self.resolve("end", end)?;
        let route = self.routes.get_route(start_coord, end_coord)?;
        info!(
            "route {start:?} -> {end:?}: {:.1} mi, {:.1} h, {} points",
            route.distance_miles,
            route.duration_hours,
            route.geometry.len()
        );
        let request = PlanRequest {
            start: start_coord,
            end: end_coord,
            geometry: &route.geometry,
            total_distance_miles: route.distance_miles,
        };
        let plan = self.planner.plan(&self.catalog, &request)?;
        Ok(TripPlan {
            start: start_coord,
            end: end_coord,
            route,
            plan,
        })
    }
}
