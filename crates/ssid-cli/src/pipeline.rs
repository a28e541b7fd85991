//! Run pipeline: validate → deduplicate → resolve → emit → report.
//!
//! Records are processed one at a time in input order. Each unique
//! normalized SSID is validated and resolved once; later duplicates only
//! count as seen. Map write failures are recorded and the run continues;
//! a cache write failure aborts it.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use ssid_core::SsidValidator;
use ssid_core::entities::{Coordinate, ProbeRecord, ResolvedPoint, SessionSummary};
use ssid_core::normalize_ssid;
use ssid_core::report::{
    MapKind, MapLogEntry, QueryLogEntry, SessionEvent, SessionReporter, render_report,
};
use ssid_maps::{MapEmitter, publish_atomic, write_points_csv};
use ssid_resolver::{ResolutionResult, Resolver};
use ssid_wigle::LocationSource;

/// What a finished run produced.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub session_id: String,
    pub summary: SessionSummary,
    pub points: Vec<ResolvedPoint>,
    pub summary_map: Option<PathBuf>,
    pub results_csv: Option<PathBuf>,
    pub session_log: Option<PathBuf>,
    pub session_report: Option<PathBuf>,
}

pub struct Pipeline<'a, S> {
    validator: &'a SsidValidator,
    resolver: Resolver<S>,
    emitter: MapEmitter,
    logs_dir: PathBuf,
    results_csv: PathBuf,
    reporter: SessionReporter,
    points: Vec<ResolvedPoint>,
}

impl<'a, S: LocationSource> Pipeline<'a, S> {
    pub fn new(
        validator: &'a SsidValidator,
        resolver: Resolver<S>,
        emitter: MapEmitter,
        logs_dir: impl Into<PathBuf>,
        results_csv: impl Into<PathBuf>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            validator,
            resolver,
            emitter,
            logs_dir: logs_dir.into(),
            results_csv: results_csv.into(),
            reporter: SessionReporter::new(started_at),
            points: Vec::new(),
        }
    }

    /// Resolved SSIDs so far.
    #[must_use]
    pub fn located(&self) -> usize {
        self.points.len()
    }

    /// Process one probe record.
    ///
    /// # Errors
    ///
    /// Fails only when the resolution cache cannot be written.
    pub async fn process(&mut self, record: &ProbeRecord) -> anyhow::Result<()> {
        let key = normalize_ssid(&record.ssid);
        let duplicate = self.reporter.has_seen(&key);
        self.reporter.record(SessionEvent::RecordSeen { key: key.clone() });
        if duplicate {
            return Ok(());
        }

        let verdict = self.validator.validate_record(record);
        if !verdict.accepted {
            tracing::debug!(ssid = %record.ssid, reasons = ?verdict.reasons, "ssid rejected");
            self.reporter.record(SessionEvent::Rejected {
                reasons: verdict.reasons,
            });
            return Ok(());
        }
        self.reporter.record(SessionEvent::Accepted);

        let ssid = record.ssid.trim();
        let queries_before = self.resolver.external_queries();
        let result = self
            .resolver
            .resolve(ssid)
            .await
            .with_context(|| format!("failed to resolve {ssid:?}"))?;
        for _ in queries_before..self.resolver.external_queries() {
            self.reporter.record(SessionEvent::ExternalQuery);
        }
        if result.from_cache() {
            self.reporter.record(SessionEvent::CacheHit);
        }

        self.reporter.log_query(QueryLogEntry {
            ssid: ssid.to_string(),
            normalized_ssid: key,
            outcome: result.status(),
            from_cache: result.from_cache(),
            coordinate: result.coordinate(),
            reason: result.failure_reason().map(str::to_string),
            at: Utc::now(),
        });

        match result {
            ResolutionResult::Resolved {
                coordinate,
                address,
                ..
            } => {
                self.reporter.record(SessionEvent::Resolved);
                self.emit_point(ssid, coordinate, address);
            }
            failed => {
                let reason = failed.failure_reason().unwrap_or("unknown").to_string();
                if let ResolutionResult::Error { message, .. } = &failed {
                    tracing::warn!(%ssid, %reason, %message, "lookup failed");
                }
                self.reporter.record(SessionEvent::Failed { reason });
            }
        }
        Ok(())
    }

    fn emit_point(&mut self, ssid: &str, coordinate: Coordinate, address: Option<String>) {
        let at = Utc::now();
        match self.emitter.emit_point(ssid, coordinate, address, at) {
            Ok(point) => {
                self.reporter.record(SessionEvent::MapWritten);
                self.reporter.log_map(MapLogEntry {
                    path: self
                        .emitter
                        .dir()
                        .join(&point.map_file_name)
                        .display()
                        .to_string(),
                    kind: MapKind::Point,
                    ssid: Some(ssid.to_string()),
                    error: None,
                    at,
                });
                self.points.push(point);
            }
            Err(error) => {
                tracing::warn!(%ssid, %error, "point map not written");
                self.record_map_failure(MapKind::Point, Some(ssid), &error.to_string(), at);
            }
        }
    }

    fn record_map_failure(
        &mut self,
        kind: MapKind,
        ssid: Option<&str>,
        error: &str,
        at: DateTime<Utc>,
    ) {
        self.reporter.record(SessionEvent::MapFailed {
            reason: error.to_string(),
        });
        self.reporter.log_map(MapLogEntry {
            path: self.emitter.dir().display().to_string(),
            kind,
            ssid: ssid.map(str::to_string),
            error: Some(error.to_string()),
            at,
        });
    }

    /// Write the summary map, close the session and persist its logs.
    ///
    /// # Errors
    ///
    /// Fails when the cache cannot be flushed.
    pub fn finish(mut self) -> anyhow::Result<RunReport> {
        let at = Utc::now();
        let summary_map = match self.emitter.emit_summary(&self.points, at) {
            Ok(path) => {
                self.reporter.record(SessionEvent::MapWritten);
                self.reporter.log_map(MapLogEntry {
                    path: path.display().to_string(),
                    kind: MapKind::Summary,
                    ssid: None,
                    error: None,
                    at,
                });
                Some(path)
            }
            Err(error) => {
                tracing::warn!(%error, "summary map not written");
                self.record_map_failure(MapKind::Summary, None, &error.to_string(), at);
                None
            }
        };

        let results_csv = match write_points_csv(&self.results_csv, &self.points) {
            Ok(()) => Some(self.results_csv.clone()),
            Err(error) => {
                tracing::warn!(%error, "resolved points export not written");
                None
            }
        };

        let summary = self.reporter.finalize();
        let session_id = self.reporter.session_id().to_string();

        let log = self.reporter.log();
        let session_log = write_log(
            &self.logs_dir.join(format!("session_{session_id}.json")),
            &serde_json::to_vec_pretty(&log)?,
        );
        let session_report = write_log(
            &self.logs_dir.join(format!("session_{session_id}.txt")),
            render_report(&summary).as_bytes(),
        );

        let mut cache = self.resolver.into_cache();
        cache
            .flush()
            .with_context(|| format!("failed to flush cache {}", cache.path().display()))?;

        Ok(RunReport {
            session_id,
            summary,
            points: self.points,
            summary_map,
            results_csv,
            session_log,
            session_report,
        })
    }
}

fn write_log(path: &Path, contents: &[u8]) -> Option<PathBuf> {
    if let Some(dir) = path.parent()
        && let Err(error) = std::fs::create_dir_all(dir)
    {
        tracing::warn!(path = %dir.display(), %error, "logs directory not writable");
        return None;
    }
    match publish_atomic(path, contents) {
        Ok(()) => Some(path.to_path_buf()),
        Err(error) => {
            tracing::warn!(%error, "session log not written");
            None
        }
    }
}
