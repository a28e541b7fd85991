use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Counters for one pipeline run.
///
/// Invariants once finalized:
/// `accepted_count + rejected_count == unique_ssids_seen` and
/// `resolved_count + failed_count == accepted_count`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SessionSummary {
    pub total_records: u64,
    pub unique_ssids_seen: u64,
    pub accepted_count: u64,
    pub rejected_count: u64,
    pub cache_hits: u64,
    pub external_queries: u64,
    pub resolved_count: u64,
    pub failed_count: u64,
    #[serde(default)]
    pub maps_written: u64,
    #[serde(default)]
    pub map_failures: u64,
    /// Count per rejection reason (one verdict may contribute several).
    #[serde(default)]
    pub rejection_reasons: BTreeMap<String, u64>,
    /// Count per failure reason (`not_found` reasons and failure kinds).
    #[serde(default)]
    pub failure_reasons: BTreeMap<String, u64>,
}

impl SessionSummary {
    /// Records that repeated an SSID already seen in this run.
    #[must_use]
    pub const fn duplicate_records(&self) -> u64 {
        self.total_records.saturating_sub(self.unique_ssids_seen)
    }
}
