//! # ssid-resolver
//!
//! The stateful core of ssidmap: turns an accepted SSID into a coordinate.
//!
//! For each SSID the [`Resolver`] consults the [`ResolutionCache`] first and
//! only queries its [`LocationSource`] on a miss. Returned coordinates pass
//! through a [`CoordinatePolicy`] before they are trusted. Outcomes are
//! cached according to how permanent they are:
//!
//! | Outcome | Cached as | Queried again |
//! |---|---|---|
//! | valid coordinate | `resolved` | never |
//! | no data, or coordinate failed the policy | `not_found` | only with `requery_failures` |
//! | rejected / malformed response | `error` | only with `requery_failures` |
//! | transient / unauthorized failure | not cached | next run |
//!
//! [`ResolutionCache`]: ssid_cache::ResolutionCache
//! [`LocationSource`]: ssid_wigle::LocationSource

mod error;
mod policy;
mod resolver;

pub use error::ResolveError;
pub use policy::{CoordinatePolicy, decimal_digits};
pub use resolver::Resolver;

use ssid_core::entities::Coordinate;
use ssid_core::enums::{CacheStatus, FailureKind};

/// Outcome of resolving one SSID.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionResult {
    Resolved {
        coordinate: Coordinate,
        address: Option<String>,
        from_cache: bool,
    },
    /// Terminal: no usable location. `reason` is a `NotFoundReason` code.
    NotFound { reason: String, from_cache: bool },
    Error {
        kind: FailureKind,
        message: String,
        from_cache: bool,
    },
}

impl ResolutionResult {
    #[must_use]
    pub const fn from_cache(&self) -> bool {
        match self {
            Self::Resolved { from_cache, .. }
            | Self::NotFound { from_cache, .. }
            | Self::Error { from_cache, .. } => *from_cache,
        }
    }

    /// Status as it appears in the session log.
    #[must_use]
    pub const fn status(&self) -> CacheStatus {
        match self {
            Self::Resolved { .. } => CacheStatus::Resolved,
            Self::NotFound { .. } => CacheStatus::NotFound,
            Self::Error { .. } => CacheStatus::Error,
        }
    }

    #[must_use]
    pub const fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Resolved { coordinate, .. } => Some(*coordinate),
            _ => None,
        }
    }

    /// Reason code for a failed resolution: the not-found reason, or the
    /// failure kind for errors. `None` when resolved.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Resolved { .. } => None,
            Self::NotFound { reason, .. } => Some(reason),
            Self::Error { kind, .. } => Some(kind.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_reason_per_variant() {
        let resolved = ResolutionResult::Resolved {
            coordinate: Coordinate::new(51.5, -0.12),
            address: None,
            from_cache: true,
        };
        assert_eq!(resolved.failure_reason(), None);
        assert!(resolved.from_cache());
        assert_eq!(resolved.status(), CacheStatus::Resolved);

        let not_found = ResolutionResult::NotFound {
            reason: "null_island".into(),
            from_cache: false,
        };
        assert_eq!(not_found.failure_reason(), Some("null_island"));
        assert_eq!(not_found.coordinate(), None);

        let error = ResolutionResult::Error {
            kind: FailureKind::Transient,
            message: "timed out".into(),
            from_cache: false,
        };
        assert_eq!(error.failure_reason(), Some("transient"));
        assert_eq!(error.status(), CacheStatus::Error);
    }
}
