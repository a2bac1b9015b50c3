//! HTTP-backed geocoding against a Nominatim search service.
//!
//! [`HttpGeocoder`] implements [`fuelroute_core::Geocoder`] by calling the
//! Nominatim `/search` endpoint restricted to one country. The fallback
//! ladder lives in [`fuelroute_core::GeocodingResolver`]; this adapter
//! issues exactly one request per call.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use fuelroute_core::GeocodingResolver;
//! use fuelroute_data::geocoding::{HttpGeocoder, NominatimConfig};
//!
//! let config = NominatimConfig::default()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("fleet-planner/2.0");
//! let resolver = GeocodingResolver::new(HttpGeocoder::with_config(config)?);
//! let coord = resolver.resolve("Springfield, OH")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod nominatim;
mod provider;

pub use provider::{DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT, HttpGeocoder, NominatimConfig};
