use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use chrono::Utc;
use serde::Serialize;
use ssid_maps::{Artifact, list_artifacts, remove_older_than};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MapsCommands;
use crate::context::AppContext;
use crate::output::output;

const SECS_PER_DAY: u64 = 24 * 60 * 60;
const SUMMARY_PREFIX: &str = "WiFiGeoMap_Summary_";

#[derive(Debug, Serialize)]
pub(super) struct CleanResponse {
    removed: usize,
    files: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct OpenResponse {
    opened: PathBuf,
}

/// Handle `ssidmap maps`.
pub fn handle(action: &MapsCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let dir = ctx.config.output.maps_dir();
    match action {
        MapsCommands::List => {
            let artifacts = list_artifacts(&dir, "html")
                .with_context(|| format!("failed to list maps in {}", dir.display()))?;
            output(&artifacts, flags.format)
        }
        MapsCommands::Open {
            index,
            latest_summary,
        } => {
            let artifacts = list_artifacts(&dir, "html")
                .with_context(|| format!("failed to list maps in {}", dir.display()))?;
            let map = select_map(&artifacts, *index, *latest_summary, &dir)?;
            open::that(&map.path)
                .with_context(|| format!("failed to open {}", map.path.display()))?;
            output(
                &OpenResponse {
                    opened: map.path.clone(),
                },
                flags.format,
            )
        }
        MapsCommands::Clean { older_than_days } => {
            let response = clean_older_than(&dir, &["html"], *older_than_days)?;
            output(&response, flags.format)
        }
    }
}

/// Pick from a newest-first listing: the newest summary map, or the map at
/// `index` (default 0).
fn select_map<'a>(
    artifacts: &'a [Artifact],
    index: Option<usize>,
    latest_summary: bool,
    dir: &Path,
) -> anyhow::Result<&'a Artifact> {
    if latest_summary {
        return artifacts
            .iter()
            .find(|artifact| artifact.file_name.starts_with(SUMMARY_PREFIX))
            .with_context(|| format!("no summary maps in {}", dir.display()));
    }
    if artifacts.is_empty() {
        bail!("no maps in {}", dir.display());
    }
    let index = index.unwrap_or(0);
    artifacts
        .get(index)
        .with_context(|| format!("no map at index {index} (0-{})", artifacts.len() - 1))
}

/// Delete files in `dir` with any of `extensions` older than `days`.
pub(super) fn clean_older_than(
    dir: &Path,
    extensions: &[&str],
    days: u32,
) -> anyhow::Result<CleanResponse> {
    let age = Duration::from_secs(u64::from(days) * SECS_PER_DAY);
    let now = Utc::now();
    let mut files = Vec::new();
    for extension in extensions {
        files.extend(
            remove_older_than(dir, extension, age, now)
                .with_context(|| format!("failed to clean {}", dir.display()))?,
        );
    }
    Ok(CleanResponse {
        removed: files.len(),
        files,
    })
}
