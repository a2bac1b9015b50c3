//! HTTP-based route provider for OSRM routing services.
//!
//! [`HttpRouteProvider`] implements [`fuelroute_core::RouteProvider`] by
//! calling the OSRM Route API for a driving route between two coordinates.
//! Distances are converted to miles, durations to hours and the encoded
//! polyline geometry to coordinates before anything leaves this module.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use geo::Coord;
//! use fuelroute_core::RouteProvider;
//! use fuelroute_data::routing::{HttpRouteProvider, OsrmConfig};
//!
//! let config = OsrmConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(60));
//! let provider = HttpRouteProvider::with_config(config)?;
//!
//! let route = provider.get_route(
//!     Coord { x: -96.80, y: 32.78 },
//!     Coord { x: -95.37, y: 29.76 },
//! )?;
//! assert!(route.geometry.len() >= 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod osrm;
mod provider;

pub use provider::{DEFAULT_OSRM_URL, DEFAULT_USER_AGENT, HttpRouteProvider, OsrmConfig};
