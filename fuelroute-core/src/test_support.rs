//! Deterministic collaborators and fixtures for tests.
//!
//! These stand in for the live geocoding and routing services so planner and
//! pipeline behaviour can be verified without network access.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use geo::Coord;
use rust_decimal::Decimal;

use crate::distance::north_of;
use crate::{
    GeocodeCandidate, Geocoder, ProviderError, RouteDescriptor, RouteProvider, RoutingError,
    Station,
};

/// Geocoder answering from a fixed query table and recording every query.
///
/// Unknown queries return no candidates. When an error is configured every
/// query fails with it.
#[derive(Debug, Default)]
pub struct StubGeocoder {
    results: HashMap<String, Vec<GeocodeCandidate>>,
    error: Option<ProviderError>,
    queries: Mutex<Vec<String>>,
}

impl StubGeocoder {
    /// Answer `query` with `candidates`.
    #[must_use]
    pub fn with_result(
        mut self,
        query: impl Into<String>,
        candidates: Vec<GeocodeCandidate>,
    ) -> Self {
        self.results.insert(query.into(), candidates);
        self
    }

    /// Fail every query with `error`.
    #[must_use]
    pub fn with_error(mut self, error: ProviderError) -> Self {
        self.error = Some(error);
        self
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Geocoder for StubGeocoder {
    fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ProviderError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_owned());
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(self.results.get(query).cloned().unwrap_or_default())
    }
}

/// Route provider returning a fixed route or a fixed error.
#[derive(Debug)]
pub struct StubRouteProvider {
    response: Result<RouteDescriptor, RoutingError>,
    requests: Mutex<Vec<(Coord<f64>, Coord<f64>)>>,
}

impl StubRouteProvider {
    /// Always return `route`.
    #[must_use]
    pub fn with_route(route: RouteDescriptor) -> Self {
        Self {
            response: Ok(route),
            requests: Mutex::default(),
        }
    }

    /// Always fail with `error`.
    #[must_use]
    pub fn with_error(error: RoutingError) -> Self {
        Self {
            response: Err(error),
            requests: Mutex::default(),
        }
    }

    /// Coordinate pairs requested so far.
    #[must_use]
    pub fn requests(&self) -> Vec<(Coord<f64>, Coord<f64>)> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RouteProvider for StubRouteProvider {
    fn get_route(
        &self,
        start: Coord<f64>,
        end: Coord<f64>,
    ) -> Result<RouteDescriptor, RoutingError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((start, end));
        self.response.clone()
    }
}

/// A route heading due north from `start` for `miles`, with `points`
/// evenly spaced vertices (at least two).
///
/// Along a meridian the great-circle distance between vertices equals the
/// along-route distance, which keeps planner expectations exact.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "vertices are spaced evenly by index"
)]
pub fn meridian_route(start: Coord<f64>, miles: f64, points: usize) -> RouteDescriptor {
    let vertex_count = points.max(2);
    let segments = (vertex_count - 1) as f64;
    let geometry = (0..vertex_count)
        .map(|index| north_of(start, miles * index as f64 / segments))
        .collect();
    RouteDescriptor {
        distance_miles: miles,
        duration_hours: miles / 60.0,
        geometry,
        steps: Vec::new(),
    }
}

/// A station named after its identifier with no address details.
#[must_use]
pub fn station_at(external_id: &str, location: Coord<f64>, retail_price: Decimal) -> Station {
    Station {
        external_id: external_id.to_owned(),
        name: format!("Station {external_id}"),
        address: String::new(),
        city: String::new(),
        state: String::new(),
        rack_id: String::new(),
        location,
        retail_price,
    }
}
