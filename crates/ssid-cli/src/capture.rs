//! Capture import: turns capture files into [`ProbeRecord`]s.
//!
//! Text captures are tshark/tcpdump output with one frame per line. SSID
//! bytes are decoded lossily so the validator can flag undecodable names
//! instead of the import failing.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use regex::bytes::Regex;
use serde::Serialize;
use ssid_core::entities::ProbeRecord;

use crate::cli::InputFormat;

/// Counters from one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub lines_read: u64,
    pub lines_without_ssid: u64,
}

#[derive(Debug)]
pub struct Import {
    pub records: Vec<ProbeRecord>,
    pub stats: ImportStats,
}

/// Explicit format, else the file extension, else text.
#[must_use]
pub fn detect_format(path: &Path, explicit: Option<InputFormat>) -> InputFormat {
    if let Some(format) = explicit {
        return format;
    }
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jsonl" | "ndjson") => InputFormat::Jsonl,
        Some("json") => InputFormat::Json,
        _ => InputFormat::Text,
    }
}

/// Read every probe record from `path`, in file order.
pub fn import(path: &Path, format: InputFormat, now: DateTime<Utc>) -> anyhow::Result<Import> {
    let import = match format {
        InputFormat::Text => {
            let file = File::open(path)
                .with_context(|| format!("failed to open capture {}", path.display()))?;
            TextCapture::new()?
                .parse(BufReader::new(file), now)
                .with_context(|| format!("failed to read capture {}", path.display()))?
        }
        InputFormat::Jsonl => {
            let records = serde_jsonlines::json_lines::<ProbeRecord, _>(path)
                .with_context(|| format!("failed to open capture {}", path.display()))?
                .collect::<std::io::Result<Vec<_>>>()
                .with_context(|| format!("invalid probe record in {}", path.display()))?;
            from_records(records)
        }
        InputFormat::Json => {
            let file = File::open(path)
                .with_context(|| format!("failed to open capture {}", path.display()))?;
            let records: Vec<ProbeRecord> = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("{} is not a JSON array of probe records", path.display()))?;
            from_records(records)
        }
    };

    tracing::debug!(
        path = %path.display(),
        records = import.records.len(),
        skipped = import.stats.lines_without_ssid,
        "capture imported"
    );
    Ok(import)
}

fn from_records(records: Vec<ProbeRecord>) -> Import {
    Import {
        stats: ImportStats {
            lines_read: records.len() as u64,
            lines_without_ssid: 0,
        },
        records,
    }
}

/// Line matcher for text captures.
struct TextCapture {
    quoted: Regex,
    bare: Regex,
    epoch: Regex,
}

impl TextCapture {
    fn new() -> anyhow::Result<Self> {
        Ok(Self {
            // Byte mode, so classes also match octets that are not UTF-8.
            quoted: Regex::new(r#"(?-u)SSID="([^"]*)""#)?,
            bare: Regex::new(r"(?-u)SSID=([^\s,]+)")?,
            epoch: Regex::new(r"^\s*(\d{9,11})(?:\.(\d{1,9}))?\s")?,
        })
    }

    fn parse<R: BufRead>(&self, mut reader: R, now: DateTime<Utc>) -> std::io::Result<Import> {
        let mut records = Vec::new();
        let mut stats = ImportStats::default();
        let mut line = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            stats.lines_read += 1;

            let Some(ssid) = self.ssid(&line) else {
                stats.lines_without_ssid += 1;
                continue;
            };
            let captured_at = self.timestamp(&line).unwrap_or(now);
            records.push(ProbeRecord::from_octets(ssid, captured_at));
        }

        Ok(Import { records, stats })
    }

    fn ssid<'a>(&self, line: &'a [u8]) -> Option<&'a [u8]> {
        self.quoted
            .captures(line)
            .or_else(|| self.bare.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_bytes())
    }

    fn timestamp(&self, line: &[u8]) -> Option<DateTime<Utc>> {
        let caps = self.epoch.captures(line)?;
        let secs: i64 = std::str::from_utf8(caps.get(1)?.as_bytes()).ok()?.parse().ok()?;
        let nanos = match caps.get(2) {
            Some(frac) => {
                let digits = std::str::from_utf8(frac.as_bytes()).ok()?;
                format!("{digits:0<9}").parse::<u32>().ok()?
            }
            None => 0,
        };
        DateTime::from_timestamp(secs, nanos)
    }
}
