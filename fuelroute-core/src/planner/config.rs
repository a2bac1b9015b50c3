//! Planner policy values.

use std::{fmt, str::FromStr};

use super::PlanError;

/// Stop-selection algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PlanStrategy {
    /// Single-pass range-reset heuristic.
    #[default]
    Greedy,
    /// Minimum-cost path over the stations discovered along the route.
    ShortestPath,
}

impl PlanStrategy {
    /// Stable textual name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::ShortestPath => "shortest-path",
        }
    }
}

impl fmt::Display for PlanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`PlanStrategy`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown planning strategy {0:?}; expected `greedy` or `shortest-path`")]
pub struct ParseStrategyError(pub String);

impl FromStr for PlanStrategy {
    type Err = ParseStrategyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "shortest-path" | "shortest_path" => Ok(Self::ShortestPath),
            _ => Err(ParseStrategyError(value.to_owned())),
        }
    }
}

/// Vehicle parameters and stop-selection policy.
///
/// # Examples
/// ```
/// use fuelroute_core::{PlanStrategy, PlannerConfig};
///
/// let config = PlannerConfig::default()
///     .with_tank_range_miles(600.0)
///     .with_strategy(PlanStrategy::ShortestPath);
/// assert_eq!(config.trigger_threshold(), 150.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Distance a full tank covers.
    pub tank_range_miles: f64,
    /// Fuel economy.
    pub miles_per_gallon: f64,
    /// Target spacing between route samples.
    pub sample_interval_miles: f64,
    /// Fraction of the tank range below which a stop is sought.
    pub trigger_fraction: f64,
    /// Fraction of the tank range used as the station search radius.
    pub search_radius_fraction: f64,
    /// Price units charged per mile of detour when scoring candidates.
    pub deviation_weight: f64,
    /// Stop-selection algorithm.
    pub strategy: PlanStrategy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            tank_range_miles: 500.0,
            miles_per_gallon: 10.0,
            sample_interval_miles: 50.0,
            trigger_fraction: 0.25,
            search_radius_fraction: 0.20,
            deviation_weight: 0.1,
            strategy: PlanStrategy::Greedy,
        }
    }
}

impl PlannerConfig {
    /// Override the tank range.
    #[must_use]
    pub const fn with_tank_range_miles(mut self, miles: f64) -> Self {
        self.tank_range_miles = miles;
        self
    }

    /// Override the fuel economy.
    #[must_use]
    pub const fn with_miles_per_gallon(mut self, mpg: f64) -> Self {
        self.miles_per_gallon = mpg;
        self
    }

    /// Override the sample spacing.
    #[must_use]
    pub const fn with_sample_interval_miles(mut self, miles: f64) -> Self {
        self.sample_interval_miles = miles;
        self
    }

    /// Override the trigger fraction.
    #[must_use]
    pub const fn with_trigger_fraction(mut self, fraction: f64) -> Self {
        self.trigger_fraction = fraction;
        self
    }

    /// Override the search radius fraction.
    #[must_use]
    pub const fn with_search_radius_fraction(mut self, fraction: f64) -> Self {
        self.search_radius_fraction = fraction;
        self
    }

    /// Override the detour weight.
    #[must_use]
    pub const fn with_deviation_weight(mut self, weight: f64) -> Self {
        self.deviation_weight = weight;
        self
    }

    /// Select the stop-selection algorithm.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: PlanStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Remaining range below which the greedy planner looks for a station.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "threshold is a fraction of the tank range")]
    pub const fn trigger_threshold(&self) -> f64 {
        self.tank_range_miles * self.trigger_fraction
    }

    /// Station search radius around a sample point.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "radius is a fraction of the tank range")]
    pub const fn search_radius(&self) -> f64 {
        self.tank_range_miles * self.search_radius_fraction
    }

    /// Check the vehicle parameters and policy values.
    pub fn validate(&self) -> Result<(), PlanError> {
        if !(self.tank_range_miles.is_finite() && self.tank_range_miles > 0.0) {
            return Err(PlanError::InvalidTankRange {
                value: self.tank_range_miles,
            });
        }
        if !(self.miles_per_gallon.is_finite() && self.miles_per_gallon > 0.0) {
            return Err(PlanError::InvalidMilesPerGallon {
                value: self.miles_per_gallon,
            });
        }
        if !(self.sample_interval_miles.is_finite() && self.sample_interval_miles > 0.0) {
            return Err(PlanError::InvalidSampleInterval {
                value: self.sample_interval_miles,
            });
        }
        for (name, value) in [
            ("trigger_fraction", self.trigger_fraction),
            ("search_radius_fraction", self.search_radius_fraction),
        ] {
            if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
                return Err(PlanError::InvalidFraction { name, value });
            }
        }
        if !(self.deviation_weight.is_finite() && self.deviation_weight >= 0.0) {
            return Err(PlanError::InvalidFraction {
                name: "deviation_weight",
                value: self.deviation_weight,
            });
        }
        Ok(())
    }
}
