//! Data access and ingestion logic for the fuelroute planner.
//!
//! Responsibilities:
//! - Provide live HTTP adapters for the geocoding and routing capabilities
//!   defined in `fuelroute-core`.
//! - Read raw station records from CSV exports.
//! - Run the ingestion pipeline that geocodes records and fills a catalog.
//!
//! Boundaries:
//! - Do not encode planning rules (live in `fuelroute-core`).
//! - Keep blocking I/O off async executors; the HTTP adapters bridge to the
//!   synchronous capability traits internally.
//!
//! Invariants:
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod geocoding;
mod http;
pub mod ingest;
pub mod routing;

pub use geocoding::{HttpGeocoder, NominatimConfig};
pub use http::ProviderBuildError;
pub use ingest::{
    IngestOutcome, IngestReport, IngestSummary, RawStationRecord, RecordOutcome, RecordReadError,
    StationRecords, import_station_csv, ingest_station_records, read_station_records,
    read_station_records_from_path,
};
pub use routing::{HttpRouteProvider, OsrmConfig};
