//! In-memory station catalog indexed by an R\*-tree.

use std::{collections::HashMap, fmt};

use geo::Coord;
use log::debug;
use rstar::{AABB, RTree, primitives::GeomWithData};

use crate::Station;
use crate::distance::{EARTH_RADIUS_MILES, great_circle_miles};

use super::{CatalogError, StationCatalog, StationSink};

/// Padding added to bounding boxes so rounding never excludes a station
/// that the great-circle filter would accept.
const ENVELOPE_PADDING_DEGREES: f64 = 1.0e-9;

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Station catalog held entirely in memory.
///
/// Radius queries first cut candidates with a lon/lat bounding box on an
/// R\*-tree and then apply the exact great-circle filter.
#[derive(Default)]
pub struct MemoryCatalog {
    stations: Vec<Station>,
    by_id: HashMap<String, usize>,
    index: RTree<IndexedPoint>,
}

impl fmt::Debug for MemoryCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCatalog")
            .field("stations", &self.stations.len())
            .finish_non_exhaustive()
    }
}

impl MemoryCatalog {
    /// Build a catalog from stations, rejecting duplicate identifiers.
    pub fn from_stations<I>(stations: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Station>,
    {
        let mut catalog = Self::default();
        for station in stations {
            catalog.insert(station)?;
        }
        Ok(catalog)
    }

    /// Iterate over all stations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    fn contains(&self, external_id: &str) -> bool {
        self.by_id.contains_key(external_id)
    }
}

impl StationCatalog for MemoryCatalog {
    fn find_within_radius(
        &self,
        point: Coord<f64>,
        radius_miles: f64,
    ) -> Box<dyn Iterator<Item = Station> + Send + '_> {
        if !(radius_miles.is_finite() && radius_miles >= 0.0) {
            return Box::new(std::iter::empty());
        }
        let envelope = search_envelope(point, radius_miles);
        let mut found: Vec<Station> = self
            .index
            .locate_in_envelope(&envelope)
            .filter_map(|entry| self.stations.get(entry.data))
            .filter(|station| great_circle_miles(point, station.location) <= radius_miles)
            .cloned()
            .collect();
        found.sort_unstable_by(|a, b| a.external_id.cmp(&b.external_id));
        debug!(
            "{} stations within {radius_miles:.1} mi of ({}, {})",
            found.len(),
            point.y,
            point.x
        );
        Box::new(found.into_iter())
    }

    fn by_external_id(&self, external_id: &str) -> Option<Station> {
        self.by_id
            .get(external_id)
            .and_then(|&slot| self.stations.get(slot))
            .cloned()
    }

    fn stations_in_state(&self, state: &str) -> Vec<Station> {
        let wanted = state.trim();
        let mut found: Vec<Station> = self
            .stations
            .iter()
            .filter(|station| station.state.trim().eq_ignore_ascii_case(wanted))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.retail_price
                .cmp(&b.retail_price)
                .then_with(|| a.external_id.cmp(&b.external_id))
        });
        found
    }

    fn station_count(&self) -> usize {
        self.stations.len()
    }
}

impl StationSink for MemoryCatalog {
    fn insert(&mut self, station: Station) -> Result<(), CatalogError> {
        if self.contains(&station.external_id) {
            return Err(CatalogError::DuplicateStation {
                external_id: station.external_id,
            });
        }
        let slot = self.stations.len();
        self.index.insert(GeomWithData::new(
            [station.location.x, station.location.y],
            slot,
        ));
        self.by_id.insert(station.external_id.clone(), slot);
        self.stations.push(station);
        Ok(())
    }
}

/// Lon/lat envelope enclosing every point within `radius_miles` of `point`.
///
/// Falls back to the full longitude range near the poles and when the
/// circle crosses the antimeridian.
#[expect(
    clippy::float_arithmetic,
    reason = "envelope bounds are derived with spherical trigonometry"
)]
fn search_envelope(point: Coord<f64>, radius_miles: f64) -> AABB<[f64; 2]> {
    let angular = radius_miles / EARTH_RADIUS_MILES;
    let lat_delta = angular.to_degrees() + ENVELOPE_PADDING_DEGREES;
    let min_lat = (point.y - lat_delta).max(-90.0);
    let max_lat = (point.y + lat_delta).min(90.0);

    let full_longitude = AABB::from_corners([-180.0, min_lat], [180.0, max_lat]);
    if point.y - lat_delta <= -90.0 || point.y + lat_delta >= 90.0 {
        return full_longitude;
    }
    let ratio = angular.sin() / point.y.to_radians().cos();
    if !(ratio.is_finite() && ratio < 1.0) {
        return full_longitude;
    }
    let lon_delta = ratio.asin().to_degrees() + ENVELOPE_PADDING_DEGREES;
    let min_lon = point.x - lon_delta;
    let max_lon = point.x + lon_delta;
    if min_lon < -180.0 || max_lon > 180.0 {
        return full_longitude;
    }
    AABB::from_corners([min_lon, min_lat], [max_lon, max_lat])
}
