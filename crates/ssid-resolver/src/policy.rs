//! Coordinate plausibility checks.

use ssid_config::ResolverConfig;
use ssid_core::entities::Coordinate;
use ssid_core::enums::NotFoundReason;

/// Rules a coordinate must pass before it is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatePolicy {
    /// Minimum decimal digits on the more precise axis.
    pub min_decimal_digits: u32,
    pub allow_null_island: bool,
}

impl Default for CoordinatePolicy {
    fn default() -> Self {
        Self::from_config(&ResolverConfig::default())
    }
}

impl CoordinatePolicy {
    #[must_use]
    pub const fn from_config(config: &ResolverConfig) -> Self {
        Self {
            min_decimal_digits: config.min_decimal_digits,
            allow_null_island: config.allow_null_island,
        }
    }

    /// Check a coordinate, returning the first violated rule.
    ///
    /// Rules, in order: latitude in [-90, 90], longitude in [-180, 180],
    /// not exactly (0, 0) unless allowed, and enough decimal digits on at
    /// least one axis. Non-finite values fail the range checks.
    ///
    /// # Errors
    ///
    /// Returns the [`NotFoundReason`] of the first failed rule.
    pub fn check(&self, coordinate: Coordinate) -> Result<(), NotFoundReason> {
        let Coordinate { lat, lon } = coordinate;
        if !(-90.0..=90.0).contains(&lat) {
            return Err(NotFoundReason::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(NotFoundReason::LongitudeOutOfRange);
        }
        if lat == 0.0 && lon == 0.0 {
            return if self.allow_null_island {
                Ok(())
            } else {
                Err(NotFoundReason::NullIsland)
            };
        }
        if decimal_digits(lat).max(decimal_digits(lon)) < self.min_decimal_digits {
            return Err(NotFoundReason::LowPrecision);
        }
        Ok(())
    }
}

/// Digits after the decimal point in the shortest representation that
/// round-trips `value` (so `51.5` has 1, `-0.12` has 2, `52.0` has 0).
#[must_use]
pub fn decimal_digits(value: f64) -> u32 {
    let repr = value.to_string();
    repr.split_once('.')
        .map_or(0, |(_, frac)| u32::try_from(frac.len()).unwrap_or(u32::MAX))
}
