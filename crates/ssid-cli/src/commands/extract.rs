use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use ssid_core::{SsidValidator, normalize_ssid};
use ssid_core::entities::ProbeRecord;

use crate::capture::{self, ImportStats};
use crate::cli::GlobalFlags;
use crate::cli::root_commands::ExtractArgs;
use crate::context::AppContext;
use crate::output::{output_with_text, render};

/// One unique SSID found in a capture.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct ExtractedSsid {
    ssid: String,
    accepted: bool,
    reasons: Vec<String>,
    occurrences: u64,
}

#[derive(Debug, Serialize)]
struct ExtractResponse {
    stats: ImportStats,
    ssids: Vec<ExtractedSsid>,
}

/// Handle `ssidmap extract`.
pub fn handle(args: &ExtractArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let format = capture::detect_format(&args.input, args.input_format);
    let import = capture::import(&args.input, format, Utc::now())?;

    let mut ssids = unique_verdicts(&import.records, &ctx.validator);
    if args.accepted_only {
        ssids.retain(|entry| entry.accepted);
    }

    let text = format!(
        "{}\n{} lines read, {} without an SSID",
        render(&ssids, flags.format)?,
        import.stats.lines_read,
        import.stats.lines_without_ssid
    );
    let response = ExtractResponse {
        stats: import.stats,
        ssids,
    };
    output_with_text(&response, &text, flags.format)
}

/// First-seen order; the first spelling of each normalized SSID is kept.
fn unique_verdicts(records: &[ProbeRecord], validator: &SsidValidator) -> Vec<ExtractedSsid> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<ExtractedSsid> = Vec::new();
    for record in records {
        let key = normalize_ssid(&record.ssid);
        if let Some(&position) = index.get(&key) {
            out[position].occurrences += 1;
            continue;
        }
        let verdict = validator.validate_record(record);
        index.insert(key, out.len());
        out.push(ExtractedSsid {
            ssid: verdict.ssid,
            accepted: verdict.accepted,
            reasons: verdict.reasons,
            occurrences: 1,
        });
    }
    out
}
