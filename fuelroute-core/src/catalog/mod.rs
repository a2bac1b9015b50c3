//! Station catalog query and insertion surface.
//!
//! [`StationCatalog`] is the read side consumed by the planner and the
//! ingestion pipeline. [`StationSink`] adds insertion with identifier
//! uniqueness. Two implementations ship with the crate: [`MemoryCatalog`],
//! an R\*-tree over an in-memory vector, and (feature `store-sqlite`)
//! `SqliteStationStore`, which persists rows and serves queries from a
//! `MemoryCatalog` loaded at open time.

use std::error::Error as StdError;

use geo::Coord;
use thiserror::Error;

use crate::Station;

mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use memory::MemoryCatalog;
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteStationStore, SqliteStationStoreError};

/// Read access to the station catalog.
///
/// Radius filtering uses great-circle distance and includes stations lying
/// exactly on the boundary.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use rust_decimal::Decimal;
/// use fuelroute_core::{MemoryCatalog, Station, StationCatalog, StationSink};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut catalog = MemoryCatalog::default();
/// catalog.insert(Station::new("1", "Loves", Coord { x: -83.0, y: 40.0 }, Decimal::new(389, 2))?)?;
///
/// let near: Vec<_> = catalog.find_within_radius(Coord { x: -83.0, y: 40.1 }, 10.0).collect();
/// assert_eq!(near.len(), 1);
/// assert!(catalog.by_external_id("1").is_some());
/// # Ok(())
/// # }
/// ```
pub trait StationCatalog {
    /// Stations within `radius_miles` of `point`, ordered by external id.
    fn find_within_radius(
        &self,
        point: Coord<f64>,
        radius_miles: f64,
    ) -> Box<dyn Iterator<Item = Station> + Send + '_>;

    /// Look up a station by its external identifier.
    fn by_external_id(&self, external_id: &str) -> Option<Station>;

    /// Stations in `state` (case-insensitive), cheapest first.
    fn stations_in_state(&self, state: &str) -> Vec<Station>;

    /// Number of stations held.
    fn station_count(&self) -> usize;
}

/// Errors returned by [`StationSink::insert`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A station with the same external identifier already exists.
    #[error("station {external_id} already exists")]
    DuplicateStation {
        /// Identifier that collided.
        external_id: String,
    },
    /// The backing store failed to persist the station.
    #[error("failed to store station {external_id}")]
    Backend {
        /// Identifier of the station being stored.
        external_id: String,
        /// Backend failure.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// A catalog that accepts new stations.
///
/// Inserting an identifier that is already present fails with
/// [`CatalogError::DuplicateStation`] and leaves the existing station
/// untouched. `&mut self` makes the check and the insert atomic per call.
pub trait StationSink: StationCatalog {
    /// Add `station` to the catalog.
    fn insert(&mut self, station: Station) -> Result<(), CatalogError>;
}

impl<C: StationCatalog + ?Sized> StationCatalog for &C {
    fn find_within_radius(
        &self,
        point: Coord<f64>,
        radius_miles: f64,
    ) -> Box<dyn Iterator<Item = Station> + Send + '_> {
        (**self).find_within_radius(point, radius_miles)
    }

    fn by_external_id(&self, external_id: &str) -> Option<Station> {
        (**self).by_external_id(external_id)
    }

    fn stations_in_state(&self, state: &str) -> Vec<Station> {
        (**self).stations_in_state(state)
    }

    fn station_count(&self) -> usize {
        (**self).station_count()
    }
}
