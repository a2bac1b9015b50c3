//! Behavioural tests for `SqliteStationStore` using rstest-bdd.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use fuelroute_core::distance::north_of;
use fuelroute_core::test_support::station_at;
use fuelroute_core::{CatalogError, SqliteStationStore, StationCatalog, StationSink};
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use rust_decimal::Decimal;
use tempfile::TempDir;

const QUERY_POINT: Coord<f64> = Coord { x: -112.0, y: 33.4 };

/// Shared state for station store scenarios.
#[derive(Debug)]
struct StoreWorld {
    temp_dir: TempDir,
    store: RefCell<Option<SqliteStationStore>>,
    last_insert: RefCell<Option<Result<(), CatalogError>>>,
}

impl StoreWorld {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
            store: RefCell::new(None),
            last_insert: RefCell::new(None),
        }
    }

    fn db_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.temp_dir.path().join("data/stations.db"))
            .expect("temp dir is UTF-8")
    }

    fn open(&self) {
        let store = SqliteStationStore::open(&self.db_path()).expect("open station store");
        self.store.replace(Some(store));
    }

    fn insert(&self, station: fuelroute_core::Station) {
        let mut guard = self.store.borrow_mut();
        let store = guard.as_mut().expect("store should be open");
        self.last_insert.replace(Some(store.insert(station)));
    }
}

#[fixture]
fn world() -> StoreWorld {
    StoreWorld::new()
}

#[given("an empty station store")]
fn given_empty_store(world: &StoreWorld) {
    world.open();
}

#[when("I insert station {id} priced at {price}")]
fn when_insert_priced(world: &StoreWorld, id: String, price: Decimal) {
    world.insert(station_at(&id, QUERY_POINT, price).with_address("", "Phoenix", "AZ"));
}

#[when("I insert station {id} at {miles} miles north of the query point")]
fn when_insert_at_distance(world: &StoreWorld, id: String, miles: f64) {
    world.insert(station_at(&id, north_of(QUERY_POINT, miles), Decimal::new(399, 2)));
}

#[when("I reopen the station store")]
fn when_reopen(world: &StoreWorld) {
    world.store.replace(None);
    world.open();
}

#[then("station {id} is found priced at {price}")]
fn then_station_found(world: &StoreWorld, id: String, price: Decimal) {
    let guard = world.store.borrow();
    let store = guard.as_ref().expect("store should be open");
    let station = store.by_external_id(&id).expect("station should exist");
    assert_eq!(station.retail_price, price);
    assert_eq!(station.city, "Phoenix");
}

#[then("the last insert is rejected as a duplicate")]
fn then_duplicate(world: &StoreWorld) {
    let outcome = world.last_insert.borrow();
    assert!(
        matches!(outcome.as_ref(), Some(Err(CatalogError::DuplicateStation { .. }))),
        "expected a duplicate rejection, got {outcome:?}"
    );
}

#[then("a {radius} mile radius query returns only station {id}")]
fn then_radius_query(world: &StoreWorld, radius: f64, id: String) {
    let guard = world.store.borrow();
    let store = guard.as_ref().expect("store should be open");
    let found: Vec<_> = store
        .find_within_radius(QUERY_POINT, radius)
        .map(|station| station.external_id)
        .collect();
    assert_eq!(found, [id]);
}

#[scenario(path = "tests/features/station_store.feature", index = 0)]
fn stations_survive_reopen(world: StoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/station_store.feature", index = 1)]
fn duplicates_rejected(world: StoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/station_store.feature", index = 2)]
fn radius_query(world: StoreWorld) {
    let _ = world;
}
