//! Facade crate for the fuelroute refuelling planner.
//!
//! This crate re-exports the core domain types and exposes the optional
//! SQLite station store behind a feature flag.

#![forbid(unsafe_code)]

pub use fuelroute_core::{
    CatalogError, FuelStop, FuelStopPlanner, GeocodeCandidate, GeocodeError, Geocoder,
    GeocodingResolver, MemoryCatalog, PlanError, PlanRequest, PlanResult, PlanStrategy,
    PlannerConfig, ProviderError, RouteDescriptor, RouteProvider, RouteStep, RoutingError,
    Station, StationCatalog, StationSink, TripError, TripPlan, TripPlanner, TripPlanning,
};

#[cfg(feature = "store-sqlite")]
pub use fuelroute_core::{SqliteStationStore, SqliteStationStoreError};
