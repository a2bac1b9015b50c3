//! HTTP-based [`RouteProvider`] using OSRM's Route API.
//!
//! The [`RouteProvider`] trait is synchronous; this provider bridges to the
//! async HTTP client by blocking on a Tokio runtime internally.

use std::time::Duration;

use fuelroute_core::distance::METRES_PER_MILE;
use fuelroute_core::{ProviderError, RouteDescriptor, RouteProvider, RouteStep, RoutingError};
use geo::Coord;
use log::debug;
use url::Url;

use super::osrm::{Maneuver, Route, RouteResponse, Step};
use crate::http::{BlockingHttp, ProviderBuildError, endpoint, parse_base_url};

/// Public OSRM demo server.
pub const DEFAULT_OSRM_URL: &str = "http://router.project-osrm.org";

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "fuelroute-routing/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// OSRM encodes `geometries=polyline` at five decimal places.
const POLYLINE_PRECISION: u32 = 5;

/// Configuration for [`HttpRouteProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct OsrmConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OSRM_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OsrmConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Driving route provider backed by the OSRM Route API.
///
/// Only the first route candidate is used. Steps are taken from the first
/// leg, which is the only leg for a two-waypoint request.
#[derive(Debug)]
pub struct HttpRouteProvider {
    http: BlockingHttp,
    base: Url,
    config: OsrmConfig,
}

impl HttpRouteProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(OsrmConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: OsrmConfig) -> Result<Self, ProviderBuildError> {
        let base = parse_base_url(&config.base_url)?;
        let http = BlockingHttp::new(&config.user_agent, config.timeout)?;
        Ok(Self { http, base, config })
    }

    /// Borrow the configuration.
    #[must_use]
    pub const fn config(&self) -> &OsrmConfig {
        &self.config
    }

    /// Build the OSRM Route API URL.
    ///
    /// The URL format is `{base_url}/route/v1/driving/{lon},{lat};{lon},{lat}`
    /// with full polyline overview and steps requested.
    fn build_route_url(&self, start: Coord<f64>, end: Coord<f64>) -> Url {
        let coordinates = format!("{},{};{},{}", start.x, start.y, end.x, end.y);
        let mut url = endpoint(&self.base, &["route", "v1", "driving", &coordinates]);
        url.query_pairs_mut()
            .append_pair("overview", "full")
            .append_pair("geometries", "polyline")
            .append_pair("steps", "true");
        url
    }

    /// Interpret a response body, falling back to the HTTP status when the
    /// body is not an OSRM payload.
    fn interpret(
        url: &Url,
        status_ok: bool,
        body: &str,
        status_error: impl FnOnce() -> ProviderError,
    ) -> Result<RouteDescriptor, RoutingError> {
        match serde_json::from_str::<RouteResponse>(body) {
            Ok(response) => convert_response(response),
            Err(_) if !status_ok => Err(status_error().into()),
            Err(err) => Err(ProviderError::Parse {
                url: url.to_string(),
                message: err.to_string(),
            }
            .into()),
        }
    }
}

/// Convert an OSRM response to a [`RouteDescriptor`] in miles and hours.
fn convert_response(response: RouteResponse) -> Result<RouteDescriptor, RoutingError> {
    if !response.is_ok() {
        return Err(RoutingError::Service {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }
    let Some(route) = response.routes.into_iter().next() else {
        return Err(RoutingError::NoRoute);
    };
    convert_route(route)
}

#[expect(
    clippy::float_arithmetic,
    reason = "OSRM reports metres and seconds; routes carry miles and hours"
)]
fn convert_route(route: Route) -> Result<RouteDescriptor, RoutingError> {
    let geometry = polyline::decode_polyline(&route.geometry, POLYLINE_PRECISION)
        .map_err(|err| RoutingError::InvalidGeometry {
            message: err.to_string(),
        })?
        .into_inner();
    let steps = route
        .legs
        .into_iter()
        .next()
        .map(|leg| leg.steps.into_iter().map(convert_step).collect())
        .unwrap_or_default();
    RouteDescriptor::new(
        route.distance / METRES_PER_MILE,
        route.duration / SECONDS_PER_HOUR,
        geometry,
        steps,
    )
    .map_err(|err| RoutingError::InvalidGeometry {
        message: err.to_string(),
    })
}

#[expect(
    clippy::float_arithmetic,
    reason = "OSRM reports metres and seconds; steps carry miles and hours"
)]
fn convert_step(step: Step) -> RouteStep {
    RouteStep {
        instruction: step
            .maneuver
            .as_ref()
            .map(Maneuver::instruction)
            .unwrap_or_default(),
        road: step.name,
        distance_miles: step.distance / METRES_PER_MILE,
        duration_hours: step.duration / SECONDS_PER_HOUR,
    }
}

impl RouteProvider for HttpRouteProvider {
    fn get_route(
        &self,
        start: Coord<f64>,
        end: Coord<f64>,
    ) -> Result<RouteDescriptor, RoutingError> {
        let url = self.build_route_url(start, end);
        let response = self.http.get(&url)?;
        let route = Self::interpret(&url, response.is_success(), &response.body, || {
            response.status_error(&url)
        })?;
        debug!(
            "osrm route: {:.1} mi, {:.2} h, {} points, {} steps",
            route.distance_miles,
            route.duration_hours,
            route.geometry.len(),
            route.steps.len()
        );
        Ok(route)
    }
}
