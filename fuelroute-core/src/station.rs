//! Fuel stations held in the catalog.

use geo::Coord;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::distance::is_valid_coordinate;

/// A retail fuel station.
///
/// The `external_id` is the natural key assigned outside this system and is
/// unique across the catalog. Coordinates are WGS84 with `x = longitude` and
/// `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use rust_decimal::Decimal;
/// use fuelroute_core::Station;
///
/// # fn main() -> Result<(), fuelroute_core::StationError> {
/// let station = Station::new("7", "Pilot #7", Coord { x: -84.5, y: 39.1 }, Decimal::new(3999, 3))?
///     .with_address("I-75 Exit 10", "Cincinnati", "OH");
/// assert_eq!(station.state, "OH");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Station {
    /// Natural key used for deduplication.
    pub external_id: String,
    /// Display name.
    pub name: String,
    /// Street address as supplied by the source record.
    pub address: String,
    /// City name.
    pub city: String,
    /// Two-letter state code.
    pub state: String,
    /// Rack (wholesale terminal) identifier.
    pub rack_id: String,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Retail price per gallon.
    pub retail_price: Decimal,
}

/// Errors returned by [`Station::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StationError {
    /// The external identifier was blank.
    #[error("station external identifier must not be empty")]
    MissingExternalId,
    /// The coordinate was outside WGS84 bounds or not finite.
    #[error("station {external_id} has an invalid coordinate")]
    InvalidLocation {
        /// Identifier of the offending station.
        external_id: String,
    },
    /// The retail price was negative.
    #[error("station {external_id} has a negative retail price {price}")]
    NegativePrice {
        /// Identifier of the offending station.
        external_id: String,
        /// Price supplied by the caller.
        price: Decimal,
    },
}

impl Station {
    /// Validate and construct a [`Station`] without address details.
    pub fn new(
        external_id: impl Into<String>,
        name: impl Into<String>,
        location: Coord<f64>,
        retail_price: Decimal,
    ) -> Result<Self, StationError> {
        let id = external_id.into().trim().to_owned();
        if id.is_empty() {
            return Err(StationError::MissingExternalId);
        }
        if !is_valid_coordinate(location) {
            return Err(StationError::InvalidLocation { external_id: id });
        }
        if retail_price.is_sign_negative() && !retail_price.is_zero() {
            return Err(StationError::NegativePrice {
                external_id: id,
                price: retail_price,
            });
        }
        Ok(Self {
            external_id: id,
            name: name.into(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            rack_id: String::new(),
            location,
            retail_price,
        })
    }

    /// Attach street address, city and state.
    #[must_use]
    pub fn with_address(
        mut self,
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        self.address = address.into();
        self.city = city.into();
        self.state = state.into();
        self
    }

    /// Attach the rack identifier.
    #[must_use]
    pub fn with_rack_id(mut self, rack_id: impl Into<String>) -> Self {
        self.rack_id = rack_id.into();
        self
    }
}
