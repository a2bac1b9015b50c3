//! Geocoding capability and the fallback resolver built on top of it.
//!
//! A [`Geocoder`] issues one free-text search against an external service
//! and returns its ranked candidates. [`GeocodingResolver`] layers the
//! bounded fallback ladder on top: normalised query first, then the raw
//! query, then city and state alone.

use geo::Coord;
use log::debug;
use thiserror::Error;

use crate::ProviderError;
use crate::distance::is_valid_coordinate;

mod normalise;

pub use normalise::normalise_address;

/// One search result returned by a geocoding service.
///
/// Services may omit either component, in which case the candidate is
/// skipped by the resolver.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeocodeCandidate {
    /// Latitude in degrees, if reported.
    pub latitude: Option<f64>,
    /// Longitude in degrees, if reported.
    pub longitude: Option<f64>,
    /// Display label, if reported.
    pub label: Option<String>,
}

impl GeocodeCandidate {
    /// Candidate carrying both coordinates.
    #[must_use]
    pub const fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            label: None,
        }
    }

    /// Return the coordinate when both components are present and valid.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coord<f64>> {
        let coord = Coord {
            x: self.longitude?,
            y: self.latitude?,
        };
        is_valid_coordinate(coord).then_some(coord)
    }
}

/// Issue a single free-text search against a geocoding service.
///
/// Implementations restrict results to the configured country and request
/// several candidates. An empty result is `Ok(vec![])`, not an error.
pub trait Geocoder {
    /// Search for `query` and return candidates in service rank order.
    fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ProviderError>;
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ProviderError> {
        (**self).search(query)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ProviderError> {
        (**self).search(query)
    }
}

/// Errors returned by [`GeocodingResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// Every fallback attempt returned no usable coordinate.
    #[error("no coordinates found for {query:?}")]
    NotFound {
        /// The first query attempted.
        query: String,
    },
    /// The geocoding service failed; the ladder is abandoned.
    #[error(transparent)]
    Transport(#[from] ProviderError),
}

/// Structured address of a station record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressQuery<'a> {
    /// Street address as written in the source record.
    pub address: &'a str,
    /// City name.
    pub city: &'a str,
    /// State code.
    pub state: &'a str,
}

/// Resolve location text to coordinates with a bounded fallback ladder.
///
/// # Examples
/// ```
/// use fuelroute_core::{GeocodeCandidate, GeocodingResolver};
/// use fuelroute_core::test_support::StubGeocoder;
///
/// let geocoder = StubGeocoder::default()
///     .with_result("Columbus, OH", vec![GeocodeCandidate::at(39.96, -83.0)]);
/// let resolver = GeocodingResolver::new(geocoder);
/// let coord = resolver.resolve("Columbus, OH")?;
/// assert_eq!(coord.y, 39.96);
/// # Ok::<(), fuelroute_core::GeocodeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GeocodingResolver<G> {
    geocoder: G,
}

impl<G: Geocoder> GeocodingResolver<G> {
    /// Wrap a geocoder.
    #[must_use]
    pub const fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    /// Borrow the wrapped geocoder.
    #[must_use]
    pub const fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Resolve free-text location input.
    ///
    /// Tries the normalised text, then the text as given, then the last two
    /// comma-separated parts as city and state. The final attempt is only
    /// made when the text has at least two parts; a trailing `USA` part is
    /// ignored when picking them.
    pub fn resolve(&self, text: &str) -> Result<Coord<f64>, GeocodeError> {
        let raw = text.trim();
        let attempts = [
            normalise_address(raw),
            raw.to_owned(),
            city_and_state(raw).unwrap_or_default(),
        ];
        self.first_match(&attempts)
    }

    /// Resolve a station address.
    ///
    /// Tries `"{normalised address}, {city}, {state}, USA"`, then the same
    /// with the address as written, then `"{city}, {state}, USA"`.
    pub fn resolve_address(&self, query: &AddressQuery<'_>) -> Result<Coord<f64>, GeocodeError> {
        let city = query.city.trim();
        let state = query.state.trim();
        let attempts = [
            format!("{}, {city}, {state}, USA", normalise_address(query.address)),
            format!("{}, {city}, {state}, USA", query.address.trim()),
            format!("{city}, {state}, USA"),
        ];
        self.first_match(&attempts)
    }

    fn first_match(&self, attempts: &[String]) -> Result<Coord<f64>, GeocodeError> {
        let mut tried: Vec<&str> = Vec::with_capacity(attempts.len());
        for attempt in attempts {
            if attempt.is_empty() || tried.contains(&attempt.as_str()) {
                continue;
            }
            tried.push(attempt.as_str());
            debug!("geocoding attempt {}: {attempt:?}", tried.len());
            let candidates = self.geocoder.search(attempt)?;
            if let Some(coord) = candidates.iter().find_map(GeocodeCandidate::coordinate) {
                debug!("resolved {attempt:?} to ({}, {})", coord.y, coord.x);
                return Ok(coord);
            }
        }
        Err(GeocodeError::NotFound {
            query: attempts.first().cloned().unwrap_or_default(),
        })
    }
}

/// Join the last two comma-separated parts of `text`, skipping a trailing
/// country part.
fn city_and_state(text: &str) -> Option<String> {
    let mut parts = text
        .rsplit(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .peekable();
    parts.next_if(|part| part.eq_ignore_ascii_case("USA"));
    let state = parts.next()?;
    let city = parts.next()?;
    Some(format!("{city}, {state}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubGeocoder;
    use rstest::{fixture, rstest};

    const CITY_ONLY: &str = "Springfield, OH, USA";

    #[fixture]
    fn address() -> AddressQuery<'static> {
        AddressQuery {
            address: "123 Main St EXIT 5 & Route 9",
            city: "Springfield",
            state: "OH",
        }
    }

    #[rstest]
    fn candidate_without_longitude_has_no_coordinate() {
        let candidate = GeocodeCandidate {
            latitude: Some(1.0),
            longitude: None,
            label: None,
        };
        assert_eq!(candidate.coordinate(), None);
    }

    #[rstest]
    fn first_attempt_is_normalised(address: AddressQuery<'static>) {
        let geocoder = StubGeocoder::default();
        let resolver = GeocodingResolver::new(&geocoder);
        let err = resolver.resolve_address(&address).expect_err("nothing resolves");
        assert_eq!(
            err,
            GeocodeError::NotFound {
                query: "123 Main St 5 and Route 9, Springfield, OH, USA".to_owned(),
            }
        );
        assert_eq!(
            geocoder.queries(),
            vec![
                "123 Main St 5 and Route 9, Springfield, OH, USA".to_owned(),
                "123 Main St EXIT 5 & Route 9, Springfield, OH, USA".to_owned(),
                CITY_ONLY.to_owned(),
            ]
        );
    }

    #[rstest]
    fn falls_back_to_city_and_state(address: AddressQuery<'static>) {
        let geocoder = StubGeocoder::default()
            .with_result(CITY_ONLY, vec![GeocodeCandidate::at(39.92, -83.81)]);
        let resolver = GeocodingResolver::new(&geocoder);
        let coord = resolver.resolve_address(&address).expect("city fallback");
        assert_eq!(coord, Coord { x: -83.81, y: 39.92 });
        assert_eq!(geocoder.queries().len(), 3);
    }

    #[rstest]
    #[case::street_prefix(
        "123 Main St EXIT 5 & Route 9, Springfield, OH",
        "Springfield, OH",
        3
    )]
    #[case::country_suffix("Springfield, OH, USA", "Springfield, OH", 2)]
    fn free_text_falls_back_to_city_and_state(
        #[case] text: &str,
        #[case] known: &str,
        #[case] expected_queries: usize,
    ) {
        let geocoder =
            StubGeocoder::default().with_result(known, vec![GeocodeCandidate::at(39.92, -83.81)]);
        let resolver = GeocodingResolver::new(&geocoder);
        let coord = resolver.resolve(text).expect("city fallback");
        assert_eq!(coord, Coord { x: -83.81, y: 39.92 });
        assert_eq!(geocoder.queries().len(), expected_queries);
        assert_eq!(geocoder.queries().last().map(String::as_str), Some(known));
    }

    #[rstest]
    #[case::single_part("Dayton", None)]
    #[case::two_parts(" Dayton ,OH ", Some("Dayton, OH"))]
    #[case::country_only("OH, USA", None)]
    fn city_and_state_uses_trailing_parts(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(city_and_state(text).as_deref(), expected);
    }

    #[rstest]
    fn skips_candidates_without_coordinates(address: AddressQuery<'static>) {
        let geocoder = StubGeocoder::default().with_result(
            "123 Main St 5 and Route 9, Springfield, OH, USA",
            vec![
                GeocodeCandidate::default(),
                GeocodeCandidate::at(39.9, -83.8),
            ],
        );
        let resolver = GeocodingResolver::new(&geocoder);
        let coord = resolver.resolve_address(&address).expect("second candidate");
        assert_eq!(coord, Coord { x: -83.8, y: 39.9 });
        assert_eq!(geocoder.queries().len(), 1);
    }

    #[rstest]
    fn transport_failure_stops_the_ladder(address: AddressQuery<'static>) {
        let failure = ProviderError::HttpStatus {
            url: "http://geocoder.test/search".to_owned(),
            status: 503,
            message: "unavailable".to_owned(),
        };
        let geocoder = StubGeocoder::default().with_error(failure.clone());
        let resolver = GeocodingResolver::new(&geocoder);
        let err = resolver.resolve_address(&address).expect_err("transport");
        assert_eq!(err, GeocodeError::Transport(failure));
        assert_eq!(geocoder.queries().len(), 1);
    }

    #[rstest]
    fn free_text_skips_identical_raw_retry() {
        let geocoder = StubGeocoder::default();
        let resolver = GeocodingResolver::new(&geocoder);
        resolver.resolve("Dayton, OH").expect_err("unknown location");
        assert_eq!(geocoder.queries(), vec!["Dayton, OH".to_owned()]);
    }
}
