//! Route acquisition capability.

use geo::Coord;
use thiserror::Error;

use crate::{ProviderError, RouteDescriptor};

/// Errors returned by a [`RouteProvider`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    /// The HTTP exchange failed.
    #[error(transparent)]
    Transport(#[from] ProviderError),
    /// The routing service answered with a non-`Ok` status code.
    #[error("routing service returned {code}: {message}")]
    Service {
        /// Service status code, e.g. `NoSegment`.
        code: String,
        /// Human-readable detail reported by the service.
        message: String,
    },
    /// The service succeeded but supplied no route.
    #[error("routing service returned no route")]
    NoRoute,
    /// The returned route geometry could not be used.
    #[error("route geometry is invalid: {message}")]
    InvalidGeometry {
        /// Decoder or validation detail.
        message: String,
    },
}

/// Fetch a driving route between two coordinates.
///
/// Implementations normalise distances to miles and durations to hours.
/// A route descriptor is returned only when the service reports success.
pub trait RouteProvider {
    /// Return the driving route from `start` to `end`.
    fn get_route(&self, start: Coord<f64>, end: Coord<f64>)
    -> Result<RouteDescriptor, RoutingError>;
}

impl<P: RouteProvider + ?Sized> RouteProvider for Box<P> {
    fn get_route(
        &self,
        start: Coord<f64>,
        end: Coord<f64>,
    ) -> Result<RouteDescriptor, RoutingError> {
        (**self).get_route(start, end)
    }
}

impl<P: RouteProvider + ?Sized> RouteProvider for &P {
    fn get_route(
        &self,
        start: Coord<f64>,
        end: Coord<f64>,
    ) -> Result<RouteDescriptor, RoutingError> {
        (**self).get_route(start, end)
    }
}
