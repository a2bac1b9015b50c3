//! SQLite-backed station store.
//!
//! Rows live in a `stations` table keyed by `external_id`. The whole table
//! is loaded into a [`MemoryCatalog`] at open time, so queries never touch
//! SQL; inserts write through to both.

use std::{fmt, str::FromStr};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use geo::Coord;
use log::{debug, info};
use rusqlite::{Connection, ErrorCode, params};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Station, StationError};

use super::{CatalogError, MemoryCatalog, StationCatalog, StationSink};

/// Errors raised when opening or reading the station database.
#[derive(Debug, Error)]
pub enum SqliteStationStoreError {
    /// Failed to create the parent directory for the database.
    #[error("failed to create parent directory {path:?}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path:?}")]
    OpenDatabase {
        /// Database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the `stations` table failed.
    #[error("failed to create stations table")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A stored price could not be parsed as a decimal.
    #[error("station {external_id} has an unreadable price {value:?}")]
    InvalidPrice {
        /// Identifier of the offending row.
        external_id: String,
        /// Stored text.
        value: String,
    },
    /// A stored row failed station validation.
    #[error("stored station is invalid")]
    InvalidStation {
        /// Validation failure.
        #[source]
        source: StationError,
    },
    /// Stored rows contained a repeated identifier.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// Generic SQLite error when reading rows.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Station catalog persisted to SQLite.
pub struct SqliteStationStore {
    path: Utf8PathBuf,
    connection: Connection,
    catalog: MemoryCatalog,
}

impl fmt::Debug for SqliteStationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteStationStore")
            .field("path", &self.path)
            .field("stations", &self.catalog.station_count())
            .finish_non_exhaustive()
    }
}

impl SqliteStationStore {
    /// Open or create the database at `path` and load all stations.
    ///
    /// Parent directories are created automatically and the `stations`
    /// table is initialised if missing.
    pub fn open(path: &Utf8Path) -> Result<Self, SqliteStationStoreError> {
        ensure_parent_dir(path)?;
        let connection = Connection::open(path.as_std_path()).map_err(|source| {
            SqliteStationStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            }
        })?;
        create_schema(&connection)?;
        let catalog = MemoryCatalog::from_stations(load_stations(&connection)?)?;
        info!(
            "opened station store {path} with {} stations",
            catalog.station_count()
        );
        Ok(Self {
            path: path.to_path_buf(),
            connection,
            catalog,
        })
    }

    /// Location of the database on disk.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl StationCatalog for SqliteStationStore {
    fn find_within_radius(
        &self,
        point: Coord<f64>,
        radius_miles: f64,
    ) -> Box<dyn Iterator<Item = Station> + Send + '_> {
        self.catalog.find_within_radius(point, radius_miles)
    }

    fn by_external_id(&self, external_id: &str) -> Option<Station> {
        self.catalog.by_external_id(external_id)
    }

    fn stations_in_state(&self, state: &str) -> Vec<Station> {
        self.catalog.stations_in_state(state)
    }

    fn station_count(&self) -> usize {
        self.catalog.station_count()
    }
}

impl StationSink for SqliteStationStore {
    fn insert(&mut self, station: Station) -> Result<(), CatalogError> {
        if self.catalog.by_external_id(&station.external_id).is_some() {
            return Err(CatalogError::DuplicateStation {
                external_id: station.external_id,
            });
        }
        let inserted = self.connection.execute(
            "INSERT INTO stations (
                external_id, name, address, city, state, rack_id, lon, lat, retail_price
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                station.external_id,
                station.name,
                station.address,
                station.city,
                station.state,
                station.rack_id,
                station.location.x,
                station.location.y,
                station.retail_price.to_string(),
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(failure, _))
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                return Err(CatalogError::DuplicateStation {
                    external_id: station.external_id,
                });
            }
            Err(source) => {
                return Err(CatalogError::Backend {
                    external_id: station.external_id,
                    source: Box::new(source),
                });
            }
        }
        debug!("persisted station {}", station.external_id);
        self.catalog.insert(station)
    }
}

fn ensure_parent_dir(path: &Utf8Path) -> Result<(), SqliteStationStoreError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base, relative) = if parent.is_absolute() {
        ("/", parent.strip_prefix("/").unwrap_or(parent))
    } else {
        (".", parent)
    };
    let create_error = |source: std::io::Error| SqliteStationStoreError::CreateDirectory {
        path: parent.to_path_buf(),
        source,
    };
    fs_utf8::Dir::open_ambient_dir(base, ambient_authority())
        .map_err(create_error)?
        .create_dir_all(relative)
        .map_err(create_error)
}

fn create_schema(connection: &Connection) -> Result<(), SqliteStationStoreError> {
    connection
        .execute(
            "CREATE TABLE IF NOT EXISTS stations (
                external_id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                address TEXT NOT NULL,
                city TEXT NOT NULL,
                state TEXT NOT NULL,
                rack_id TEXT NOT NULL,
                lon REAL NOT NULL,
                lat REAL NOT NULL,
                retail_price TEXT NOT NULL
            )",
            [],
        )
        .map(|_| ())
        .map_err(|source| SqliteStationStoreError::CreateSchema { source })
}

fn load_stations(connection: &Connection) -> Result<Vec<Station>, SqliteStationStoreError> {
    let mut statement = connection.prepare(
        "SELECT external_id, name, address, city, state, rack_id, lon, lat, retail_price
         FROM stations ORDER BY external_id",
    )?;
    let mut rows = statement.query([])?;
    let mut stations = Vec::new();

    while let Some(row) = rows.next()? {
        let external_id: String = row.get(0)?;
        let price_text: String = row.get(8)?;
        let retail_price = Decimal::from_str(&price_text).map_err(|_| {
            SqliteStationStoreError::InvalidPrice {
                external_id: external_id.clone(),
                value: price_text.clone(),
            }
        })?;
        let location: Coord<f64> = Coord {
            x: row.get(6)?,
            y: row.get(7)?,
        };
        let station = Station::new(external_id, row.get::<_, String>(1)?, location, retail_price)
            .map_err(|source| SqliteStationStoreError::InvalidStation { source })?
            .with_address(
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            )
            .with_rack_id(row.get::<_, String>(5)?);
        stations.push(station);
    }

    Ok(stations)
}
