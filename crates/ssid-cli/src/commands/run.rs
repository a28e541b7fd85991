use std::fmt::Write as _;

use anyhow::Context;
use chrono::Utc;
use ssid_core::report::render_report;
use ssid_maps::MapEmitter;

use crate::capture;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::RunArgs;
use crate::context::AppContext;
use crate::output::output_with_text;
use crate::pipeline::{Pipeline, RunReport};
use crate::progress::RunProgress;

/// Handle `ssidmap run`.
pub async fn handle(args: &RunArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mock = ctx.mock_mode(args.mock);
    let source = ctx.source(mock)?;

    let started_at = Utc::now();
    let format = capture::detect_format(&args.input, args.input_format);
    let import = capture::import(&args.input, format, started_at)?;
    tracing::info!(
        records = import.records.len(),
        lines = import.stats.lines_read,
        skipped = import.stats.lines_without_ssid,
        "capture loaded"
    );

    let cache = ctx.open_cache(mock)?;
    let resolver_config = ctx.resolver_config(mock, args.requery_failures);
    let resolver = ctx.resolver(source, cache, &resolver_config);
    let maps_dir = ctx.config.output.maps_dir();
    let emitter = MapEmitter::new(&maps_dir)
        .with_context(|| format!("cannot write maps to {}", maps_dir.display()))?;

    let mut pipeline = Pipeline::new(
        &ctx.validator,
        resolver,
        emitter,
        ctx.config.output.logs_dir(),
        ctx.config.output.results_csv_path(mock),
        started_at,
    );

    let progress = RunProgress::start(import.records.len());
    for record in &import.records {
        if let Err(error) = pipeline.process(record).await {
            progress.abort();
            return Err(error);
        }
        progress.record_done(record.ssid.trim(), pipeline.located());
    }
    progress.finish();

    let report = pipeline.finish()?;
    output_with_text(&report, &report_text(&report, mock), flags.format)?;

    if args.open {
        match &report.summary_map {
            Some(path) => {
                if let Err(error) = open::that(path) {
                    tracing::warn!(path = %path.display(), %error, "could not open summary map");
                }
            }
            None => tracing::warn!("no summary map to open"),
        }
    }
    Ok(())
}

fn report_text(report: &RunReport, mock: bool) -> String {
    let mut text = render_report(&report.summary);
    if mock {
        text.push_str("(mock mode: coordinates are synthetic)\n");
    }
    for (label, path) in [
        ("summary map", &report.summary_map),
        ("results csv", &report.results_csv),
        ("session log", &report.session_log),
        ("session report", &report.session_report),
    ] {
        if let Some(path) = path {
            let _ = writeln!(text, "{label}: {}", path.display());
        }
    }
    text
}
