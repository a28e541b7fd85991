//! Session reporting.
//!
//! A [`SessionReporter`] is constructed at pipeline start, fed one
//! [`SessionEvent`] per observable step, and finalized once at the end. It is
//! the only owner of run-scoped statistics; nothing here is global.

use std::collections::HashSet;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Coordinate, SessionSummary};
use crate::enums::CacheStatus;

/// One observable step of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A probe record was read. `key` is its normalized SSID.
    RecordSeen { key: String },
    Accepted,
    Rejected { reasons: Vec<String> },
    CacheHit,
    ExternalQuery,
    Resolved,
    Failed { reason: String },
    MapWritten,
    MapFailed { reason: String },
}

/// Per-SSID resolution outcome kept for the session log.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct QueryLogEntry {
    pub ssid: String,
    pub normalized_ssid: String,
    pub outcome: CacheStatus,
    pub from_cache: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub at: DateTime<Utc>,
}

/// Map artifact written (or attempted) during the session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MapLogEntry {
    pub path: String,
    pub kind: MapKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MapKind {
    Point,
    Summary,
}

/// Complete, serializable record of one run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SessionLog {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub summary: SessionSummary,
    pub queries: Vec<QueryLogEntry>,
    pub maps: Vec<MapLogEntry>,
}

/// Accumulates counters across a run.
#[derive(Debug)]
pub struct SessionReporter {
    session_id: String,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    summary: SessionSummary,
    seen_keys: HashSet<String>,
    queries: Vec<QueryLogEntry>,
    maps: Vec<MapLogEntry>,
}

impl SessionReporter {
    /// Start a session whose id is derived from `started_at` (`%Y%m%d_%H%M%S`).
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            session_id: started_at.format("%Y%m%d_%H%M%S").to_string(),
            started_at,
            finished_at: None,
            summary: SessionSummary::default(),
            seen_keys: HashSet::new(),
            queries: Vec::new(),
            maps: Vec::new(),
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Whether a record with this normalized SSID was already seen.
    #[must_use]
    pub fn has_seen(&self, key: &str) -> bool {
        self.seen_keys.contains(key)
    }

    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Apply one event. Events arriving after [`finalize`](Self::finalize) are
    /// ignored so the finalized totals stay stable.
    pub fn record(&mut self, event: SessionEvent) {
        if self.is_finalized() {
            tracing::warn!(?event, "session already finalized; event ignored");
            return;
        }

        let summary = &mut self.summary;
        match event {
            SessionEvent::RecordSeen { key } => {
                summary.total_records += 1;
                if self.seen_keys.insert(key) {
                    summary.unique_ssids_seen += 1;
                }
            }
            SessionEvent::Accepted => summary.accepted_count += 1,
            SessionEvent::Rejected { reasons } => {
                summary.rejected_count += 1;
                for reason in reasons {
                    *summary.rejection_reasons.entry(reason).or_default() += 1;
                }
            }
            SessionEvent::CacheHit => summary.cache_hits += 1,
            SessionEvent::ExternalQuery => summary.external_queries += 1,
            SessionEvent::Resolved => summary.resolved_count += 1,
            SessionEvent::Failed { reason } => {
                summary.failed_count += 1;
                *summary.failure_reasons.entry(reason).or_default() += 1;
            }
            SessionEvent::MapWritten => summary.maps_written += 1,
            SessionEvent::MapFailed { reason } => {
                summary.map_failures += 1;
                tracing::debug!(%reason, "map artifact failure recorded");
            }
        }
    }

    /// Keep a per-SSID outcome for the session log.
    pub fn log_query(&mut self, entry: QueryLogEntry) {
        if !self.is_finalized() {
            self.queries.push(entry);
        }
    }

    /// Keep a map artifact entry for the session log.
    pub fn log_map(&mut self, entry: MapLogEntry) {
        if !self.is_finalized() {
            self.maps.push(entry);
        }
    }

    /// Close the session and return its totals. Repeated calls return the
    /// same summary.
    pub fn finalize(&mut self) -> SessionSummary {
        if self.finished_at.is_none() {
            self.finished_at = Some(Utc::now());
        }
        self.summary.clone()
    }

    /// Snapshot of the full session log.
    #[must_use]
    pub fn log(&self) -> SessionLog {
        SessionLog {
            session_id: self.session_id.clone(),
            started_at: self.started_at,
            finished_at: self.finished_at,
            summary: self.summary.clone(),
            queries: self.queries.clone(),
            maps: self.maps.clone(),
        }
    }
}

/// Render a summary as a human-readable report. Output depends only on the
/// counters, so identical runs produce identical text.
#[must_use]
pub fn render_report(summary: &SessionSummary) -> String {
    let rule = "=".repeat(60);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "WiFi GEOLOCATION PROCESSING SUMMARY");
    let _ = writeln!(out, "{rule}");

    let _ = writeln!(out, "Probe records:");
    let _ = writeln!(out, "  total records:       {}", summary.total_records);
    let _ = writeln!(out, "  unique SSIDs:        {}", summary.unique_ssids_seen);
    let _ = writeln!(out, "  duplicate records:   {}", summary.duplicate_records());
    let _ = writeln!(out, "  accepted:            {}", summary.accepted_count);
    let _ = writeln!(out, "  rejected:            {}", summary.rejected_count);
    for (reason, count) in &summary.rejection_reasons {
        let _ = writeln!(out, "    - {reason}: {count}");
    }

    let _ = writeln!(out, "Resolution:");
    let _ = writeln!(out, "  cache hits:          {}", summary.cache_hits);
    let _ = writeln!(out, "  external queries:    {}", summary.external_queries);
    let _ = writeln!(out, "  resolved:            {}", summary.resolved_count);
    let _ = writeln!(out, "  failed:              {}", summary.failed_count);
    for (reason, count) in &summary.failure_reasons {
        let _ = writeln!(out, "    - {reason}: {count}");
    }
    let _ = writeln!(out, "  success rate:        {}", success_rate(summary));

    let _ = writeln!(out, "Maps:");
    let _ = writeln!(out, "  written:             {}", summary.maps_written);
    let _ = writeln!(out, "  failed:              {}", summary.map_failures);
    let _ = writeln!(out, "{rule}");
    out
}

#[allow(clippy::cast_precision_loss)]
fn success_rate(summary: &SessionSummary) -> String {
    if summary.accepted_count == 0 {
        return String::from("0%");
    }
    let rate = summary.resolved_count as f64 / summary.accepted_count as f64 * 100.0;
    format!("{rate:.1}%")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn seen(key: &str) -> SessionEvent {
        SessionEvent::RecordSeen {
            key: key.to_string(),
        }
    }

    #[test]
    fn counts_unique_keys_once() {
        let mut reporter = SessionReporter::new(Utc::now());
        assert!(!reporter.has_seen("homenet42"));
        reporter.record(seen("homenet42"));
        assert!(reporter.has_seen("homenet42"));
        reporter.record(seen("homenet42"));
        reporter.record(seen("cafe"));

        let summary = reporter.finalize();
        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.unique_ssids_seen, 2);
        assert_eq!(summary.duplicate_records(), 1);
    }

    #[test]
    fn tallies_reasons() {
        let mut reporter = SessionReporter::new(Utc::now());
        reporter.record(SessionEvent::Rejected {
            reasons: vec!["empty".into(), "non_printable".into()],
        });
        reporter.record(SessionEvent::Rejected {
            reasons: vec!["empty".into()],
        });
        reporter.record(SessionEvent::Failed {
            reason: "transient".into(),
        });

        let summary = reporter.finalize();
        assert_eq!(summary.rejected_count, 2);
        assert_eq!(summary.rejection_reasons.get("empty"), Some(&2));
        assert_eq!(summary.rejection_reasons.get("non_printable"), Some(&1));
        assert_eq!(summary.failed_count, 1);
        assert_eq!(summary.failure_reasons.get("transient"), Some(&1));
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut reporter = SessionReporter::new(Utc::now());
        reporter.record(seen("a"));
        reporter.record(SessionEvent::Accepted);
        reporter.record(SessionEvent::Resolved);

        let first = reporter.finalize();
        let finished_at = reporter.log().finished_at;
        let second = reporter.finalize();
        assert_eq!(first, second);
        assert_eq!(reporter.log().finished_at, finished_at);
    }

    #[test]
    fn events_after_finalize_are_ignored() {
        let mut reporter = SessionReporter::new(Utc::now());
        reporter.record(SessionEvent::CacheHit);
        let before = reporter.finalize();
        reporter.record(SessionEvent::CacheHit);
        assert_eq!(reporter.finalize(), before);
        assert_eq!(before.cache_hits, 1);
    }

    #[test]
    fn session_id_uses_start_time() {
        let started = DateTime::parse_from_rfc3339("2025-03-04T05:06:07Z")
            .unwrap()
            .with_timezone(&Utc);
        let reporter = SessionReporter::new(started);
        assert_eq!(reporter.session_id(), "20250304_050607");
    }

    #[test]
    fn report_is_deterministic() {
        let mut summary = SessionSummary {
            total_records: 5,
            unique_ssids_seen: 5,
            accepted_count: 2,
            rejected_count: 3,
            external_queries: 2,
            resolved_count: 1,
            failed_count: 1,
            maps_written: 2,
            ..SessionSummary::default()
        };
        summary.rejection_reasons.insert("empty".into(), 1);
        summary.rejection_reasons.insert("repeated_character".into(), 1);

        let a = render_report(&summary);
        let b = render_report(&summary.clone());
        assert_eq!(a, b);
        assert!(a.contains("success rate:        50.0%"));
        assert!(a.contains("- empty: 1"));
        let empty_pos = a.find("- empty").unwrap();
        let repeated_pos = a.find("- repeated_character").unwrap();
        assert!(empty_pos < repeated_pos);
    }

    #[test]
    fn report_handles_zero_accepted() {
        let report = render_report(&SessionSummary::default());
        assert!(report.contains("success rate:        0%"));
    }
}
