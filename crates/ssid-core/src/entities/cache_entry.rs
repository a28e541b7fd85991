use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Coordinate;
use crate::enums::CacheStatus;
use crate::validate::normalize_ssid;

/// Durable outcome of resolving one normalized SSID.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CacheEntry {
    /// Cache key: trimmed, case-folded SSID.
    pub normalized_ssid: String,
    pub status: CacheStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
    pub resolved_at: DateTime<Utc>,
    /// Name of the lookup source that produced the entry (`wigle`, `mock`).
    pub source: String,
    /// Street/area label reported by the service, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Why a `not_found`/`error` entry was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CacheEntry {
    #[must_use]
    pub fn resolved(
        key: impl Into<String>,
        coordinate: Coordinate,
        address: Option<String>,
        source: impl Into<String>,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            normalized_ssid: key.into(),
            status: CacheStatus::Resolved,
            coordinate: Some(coordinate),
            resolved_at,
            source: source.into(),
            address,
            reason: None,
        }
    }

    #[must_use]
    pub fn not_found(
        key: impl Into<String>,
        reason: impl Into<String>,
        source: impl Into<String>,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            normalized_ssid: key.into(),
            status: CacheStatus::NotFound,
            coordinate: None,
            resolved_at,
            source: source.into(),
            address: None,
            reason: Some(reason.into()),
        }
    }

    #[must_use]
    pub fn error(
        key: impl Into<String>,
        reason: impl Into<String>,
        source: impl Into<String>,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            normalized_ssid: key.into(),
            status: CacheStatus::Error,
            coordinate: None,
            resolved_at,
            source: source.into(),
            address: None,
            reason: Some(reason.into()),
        }
    }

    /// Check the entry against the cache schema rules: a non-empty normalized
    /// key, and a coordinate present exactly when the status is `resolved`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        !self.normalized_ssid.is_empty()
            && normalize_ssid(&self.normalized_ssid) == self.normalized_ssid
            && (self.status == CacheStatus::Resolved) == self.coordinate.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_produce_consistent_entries() {
        let now = Utc::now();
        assert!(CacheEntry::resolved("homenet42", Coordinate::new(51.5, -0.12), None, "wigle", now)
            .is_consistent());
        assert!(CacheEntry::not_found("homenet42", "no_results", "wigle", now).is_consistent());
        assert!(CacheEntry::error("homenet42", "malformed", "wigle", now).is_consistent());
    }

    #[test]
    fn unnormalized_key_is_inconsistent() {
        let entry = CacheEntry::not_found("HomeNet42", "no_results", "wigle", Utc::now());
        assert!(!entry.is_consistent());
    }

    #[test]
    fn resolved_without_coordinate_is_inconsistent() {
        let mut entry =
            CacheEntry::resolved("cafe", Coordinate::new(1.5, 2.5), None, "wigle", Utc::now());
        entry.coordinate = None;
        assert!(!entry.is_consistent());
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let entry = CacheEntry::not_found("cafe", "no_results", "wigle", Utc::now());
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("coordinate").is_none());
        assert!(json.get("address").is_none());
        assert_eq!(json["status"], "not_found");
    }
}
