//! Driving routes returned by a routing provider.
//!
//! All quantities are normalised at the provider boundary: distances in
//! miles, durations in hours.

use geo::Coord;
use thiserror::Error;

/// One turn-by-turn instruction. Opaque to the planner.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteStep {
    /// Manoeuvre kind, e.g. `turn` or `merge`, with an optional modifier.
    pub instruction: String,
    /// Road name the step travels along.
    pub road: String,
    /// Step length in miles.
    pub distance_miles: f64,
    /// Step duration in hours.
    pub duration_hours: f64,
}

/// A driving route between two coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use fuelroute_core::RouteDescriptor;
///
/// let route = RouteDescriptor::new(
///     12.5,
///     0.25,
///     vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.18 }],
///     Vec::new(),
/// )?;
/// assert_eq!(route.geometry.len(), 2);
/// # Ok::<(), fuelroute_core::RouteDescriptorError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteDescriptor {
    /// Total driving distance in miles.
    pub distance_miles: f64,
    /// Total driving duration in hours.
    pub duration_hours: f64,
    /// Path geometry in travel order.
    pub geometry: Vec<Coord<f64>>,
    /// Turn-by-turn steps in travel order.
    pub steps: Vec<RouteStep>,
}

/// Errors returned by [`RouteDescriptor::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteDescriptorError {
    /// Fewer than two geometry points were supplied.
    #[error("route geometry needs at least two points, got {points}")]
    InsufficientGeometry {
        /// Number of points supplied.
        points: usize,
    },
    /// Distance was negative or not finite.
    #[error("route distance must be a non-negative finite number, got {value}")]
    InvalidDistance {
        /// Rejected distance in miles.
        value: f64,
    },
    /// Duration was negative or not finite.
    #[error("route duration must be a non-negative finite number, got {value}")]
    InvalidDuration {
        /// Rejected duration in hours.
        value: f64,
    },
}

impl RouteDescriptor {
    /// Validate and construct a [`RouteDescriptor`].
    pub fn new(
        distance_miles: f64,
        duration_hours: f64,
        geometry: Vec<Coord<f64>>,
        steps: Vec<RouteStep>,
    ) -> Result<Self, RouteDescriptorError> {
        if !(distance_miles.is_finite() && distance_miles >= 0.0) {
            return Err(RouteDescriptorError::InvalidDistance {
                value: distance_miles,
            });
        }
        if !(duration_hours.is_finite() && duration_hours >= 0.0) {
            return Err(RouteDescriptorError::InvalidDuration {
                value: duration_hours,
            });
        }
        if geometry.len() < 2 {
            return Err(RouteDescriptorError::InsufficientGeometry {
                points: geometry.len(),
            });
        }
        Ok(Self {
            distance_miles,
            duration_hours,
            geometry,
            steps,
        })
    }
}
