//! Status and failure enums for ssidmap.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CacheStatus
// ---------------------------------------------------------------------------

/// Outcome stored for a normalized SSID in the resolution cache.
///
/// ```text
/// resolved   → coordinate present, never re-queried
/// not_found  → terminal: no data or coordinate failed validation
/// error      → terminal: the service rejected the query or answered garbage
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    Resolved,
    NotFound,
    Error,
}

impl CacheStatus {
    /// Return the string representation used in the cache file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resolved => "resolved",
            Self::NotFound => "not_found",
            Self::Error => "error",
        }
    }

    /// Whether this status ends lookups for the key until invalidated.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::NotFound | Self::Error)
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FailureKind
// ---------------------------------------------------------------------------

/// Classification of a failed external lookup.
///
/// Only `rejected` and `malformed` are terminal and land in the cache as
/// [`CacheStatus::Error`]. `transient` and `unauthorized` are retried on a
/// later run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Timeout, transport failure, 5xx, or rate limiting.
    Transient,
    /// Credentials missing or refused (401/403).
    Unauthorized,
    /// The service refused this particular query (other 4xx, `success=false`).
    Rejected,
    /// The response body could not be understood.
    Malformed,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transient => "transient",
            Self::Unauthorized => "unauthorized",
            Self::Rejected => "rejected",
            Self::Malformed => "malformed",
        }
    }

    /// Whether a failure of this kind may be cached as a terminal outcome.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Malformed)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NotFoundReason
// ---------------------------------------------------------------------------

/// Why a lookup ended as `not_found`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    /// The service has no record of the SSID.
    NoResults,
    /// A record exists but carries no usable position.
    MissingCoordinates,
    LatitudeOutOfRange,
    LongitudeOutOfRange,
    /// Exactly (0, 0), the usual "unset" sentinel.
    NullIsland,
    /// Fewer decimal digits than the configured minimum.
    LowPrecision,
}

impl NotFoundReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoResults => "no_results",
            Self::MissingCoordinates => "missing_coordinates",
            Self::LatitudeOutOfRange => "latitude_out_of_range",
            Self::LongitudeOutOfRange => "longitude_out_of_range",
            Self::NullIsland => "null_island",
            Self::LowPrecision => "low_precision",
        }
    }
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
