//! Core domain types and algorithms for the fuelroute refuelling planner.
//!
//! Responsibilities:
//! - Model stations, routes and fuel plans with validating constructors.
//! - Define the capability traits for outbound providers (geocoding, routing)
//!   and for the station catalog.
//! - Resolve free-text locations through a bounded fallback ladder.
//! - Select refuelling stops along a sampled route.
//!
//! Boundaries:
//! - No HTTP, CSV or CLI concerns; adapters live in `fuelroute-data`.
//! - The SQLite-backed station store is available behind `store-sqlite`.
//!
//! Coordinates are WGS84 [`geo::Coord`] values with `x = longitude` and
//! `y = latitude`. Distances are statute miles throughout.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod distance;
pub mod geocode;
pub mod planner;
mod provider;
mod route;
mod routing;
pub mod station;
#[doc(hidden)]
pub mod test_support;
mod trip;

pub use catalog::{CatalogError, MemoryCatalog, StationCatalog, StationSink};
#[cfg(feature = "store-sqlite")]
pub use catalog::{SqliteStationStore, SqliteStationStoreError};
pub use distance::great_circle_miles;
pub use geocode::{
    AddressQuery, GeocodeCandidate, GeocodeError, Geocoder, GeocodingResolver, normalise_address,
};
pub use planner::{
    FuelStop, FuelStopPlanner, PlanError, PlanRequest, PlanResult, PlanStrategy, PlannerConfig,
};
pub use provider::ProviderError;
pub use route::{RouteDescriptor, RouteDescriptorError, RouteStep};
pub use routing::{RouteProvider, RoutingError};
pub use station::{Station, StationError};
pub use trip::{TripError, TripPlan, TripPlanner, TripPlanning};
