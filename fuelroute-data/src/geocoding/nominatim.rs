//! Nominatim search response types.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use fuelroute_core::GeocodeCandidate;
use serde::Deserialize;

/// One place returned by `/search?format=json`.
///
/// Nominatim encodes coordinates as decimal strings.
#[derive(Debug, Deserialize)]
pub(crate) struct Place {
    pub(crate) lat: Option<String>,
    pub(crate) lon: Option<String>,
    pub(crate) display_name: Option<String>,
}

impl From<Place> for GeocodeCandidate {
    fn from(place: Place) -> Self {
        Self {
            latitude: parse_degrees(place.lat.as_deref()),
            longitude: parse_degrees(place.lon.as_deref()),
            label: place.display_name,
        }
    }
}

fn parse_degrees(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|text| text.trim().parse::<f64>().ok())
        .filter(|degrees| degrees.is_finite())
}
