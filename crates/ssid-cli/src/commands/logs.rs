use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;
use ssid_core::report::{SessionLog, render_report};
use ssid_maps::list_artifacts;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::LogsCommands;
use crate::commands::maps::clean_older_than;
use crate::context::AppContext;
use crate::output::{output, output_with_text};

/// One line of `logs list`.
#[derive(Debug, Serialize)]
struct LogRow {
    index: usize,
    session_id: String,
    started_at: Option<DateTime<Utc>>,
    accepted: Option<u64>,
    resolved: Option<u64>,
    file: PathBuf,
}

/// Handle `ssidmap logs`.
pub fn handle(action: &LogsCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let dir = ctx.config.output.logs_dir();
    let files = session_files(&dir)?;
    match action {
        LogsCommands::List => {
            let rows: Vec<LogRow> = files
                .iter()
                .enumerate()
                .map(|(index, path)| list_row(index, path))
                .collect();
            output(&rows, flags.format)
        }
        LogsCommands::Show { index } => {
            let index = index.unwrap_or(0);
            let Some(path) = files.get(index) else {
                if files.is_empty() {
                    bail!("no session logs in {}", dir.display());
                }
                bail!("no session log at index {index} (0-{})", files.len() - 1);
            };
            let log = read_log(path)?;
            output_with_text(&log, &log_text(&log, path), flags.format)
        }
        LogsCommands::Clean { older_than_days } => {
            let response = clean_older_than(&dir, &["json", "txt"], *older_than_days)?;
            output(&response, flags.format)
        }
    }
}

/// Session log files, newest first.
fn session_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let artifacts = list_artifacts(dir, "json")
        .with_context(|| format!("failed to list session logs in {}", dir.display()))?;
    Ok(artifacts
        .into_iter()
        .filter(|artifact| artifact.file_name.starts_with("session_"))
        .map(|artifact| artifact.path)
        .collect())
}

fn read_log(path: &Path) -> anyhow::Result<SessionLog> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a session log", path.display()))
}

/// Unreadable logs are still listed, without their counters.
fn list_row(index: usize, path: &Path) -> LogRow {
    let fallback_id = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.strip_prefix("session_"))
        .unwrap_or_default()
        .to_string();
    match read_log(path) {
        Ok(log) => LogRow {
            index,
            session_id: log.session_id,
            started_at: Some(log.started_at),
            accepted: Some(log.summary.accepted_count),
            resolved: Some(log.summary.resolved_count),
            file: path.to_path_buf(),
        },
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %format!("{error:#}"),
                "session log unreadable"
            );
            LogRow {
                index,
                session_id: fallback_id,
                started_at: None,
                accepted: None,
                resolved: None,
                file: path.to_path_buf(),
            }
        }
    }
}

fn log_text(log: &SessionLog, path: &Path) -> String {
    let mut text = format!(
        "Session log: {}\nSession ID: {}\nStarted: {}\n",
        path.display(),
        log.session_id,
        log.started_at.to_rfc3339()
    );
    if let Some(finished_at) = log.finished_at {
        let _ = writeln!(text, "Finished: {}", finished_at.to_rfc3339());
    }
    text.push_str(&render_report(&log.summary));

    let resolved: Vec<_> = log
        .queries
        .iter()
        .filter_map(|query| query.coordinate.map(|c| (query.ssid.as_str(), c)))
        .collect();
    if !resolved.is_empty() {
        text.push_str("Resolved locations:\n");
        for (ssid, coordinate) in resolved {
            let _ = writeln!(text, "  {ssid}: {coordinate}");
        }
    }
    text
}
