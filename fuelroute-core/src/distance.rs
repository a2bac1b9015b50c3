//! Great-circle helpers shared by the catalog and the planner.

use geo::{Coord, Distance, Haversine, Point};

/// Metres per statute mile used when converting provider distances.
pub const METRES_PER_MILE: f64 = 1609.34;

/// Mean Earth radius in metres, matching the radius used by [`Haversine`].
pub const EARTH_RADIUS_METRES: f64 = 6_371_008.8;

/// Mean Earth radius expressed in miles.
pub const EARTH_RADIUS_MILES: f64 = EARTH_RADIUS_METRES / METRES_PER_MILE;

/// Great-circle distance between two coordinates in miles.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use fuelroute_core::great_circle_miles;
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// assert_eq!(great_circle_miles(origin, origin), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "converting metres to miles divides by a constant"
)]
pub fn great_circle_miles(from: Coord<f64>, to: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to)) / METRES_PER_MILE
}

/// Latitude delta, in degrees, spanned by `miles` along a meridian.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "arc length over radius gives the subtended angle"
)]
pub const fn miles_to_latitude_degrees(miles: f64) -> f64 {
    (miles / EARTH_RADIUS_MILES).to_degrees()
}

/// Return the coordinate `miles` due north of `origin`.
///
/// Useful for laying out synthetic routes along a meridian where
/// great-circle distance equals the along-track distance.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "offsets latitude by a computed delta")]
pub const fn north_of(origin: Coord<f64>, miles: f64) -> Coord<f64> {
    Coord {
        x: origin.x,
        y: origin.y + miles_to_latitude_degrees(miles),
    }
}

/// Check that a coordinate is finite and within WGS84 bounds.
#[must_use]
pub fn is_valid_coordinate(coord: Coord<f64>) -> bool {
    coord.x.is_finite()
        && coord.y.is_finite()
        && (-180.0..=180.0).contains(&coord.x)
        && (-90.0..=90.0).contains(&coord.y)
}
