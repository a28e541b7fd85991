use chrono::{DateTime, Utc};
use serde::Serialize;
use ssid_cache::{ResolutionCache, cache_file_schema};
use ssid_core::entities::CacheEntry;
use ssid_core::enums::CacheStatus;

use crate::cli::subcommands::CacheCommands;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;

/// Flat view of a cache entry for listing.
#[derive(Debug, Serialize)]
struct CacheRow {
    ssid: String,
    status: CacheStatus,
    lat: Option<f64>,
    lon: Option<f64>,
    reason: Option<String>,
    source: String,
    resolved_at: DateTime<Utc>,
}

impl From<&CacheEntry> for CacheRow {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            ssid: entry.normalized_ssid.clone(),
            status: entry.status,
            lat: entry.coordinate.map(|c| c.lat),
            lon: entry.coordinate.map(|c| c.lon),
            reason: entry.reason.clone(),
            source: entry.source.clone(),
            resolved_at: entry.resolved_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct InvalidateResponse {
    ssid: String,
    removed: bool,
}

#[derive(Debug, Serialize)]
struct CleanResponse {
    removed: usize,
    remaining: usize,
}

/// Handle `ssidmap cache`.
pub fn handle(
    action: &CacheCommands,
    mock: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CacheCommands::Schema => {
            let format = match flags.format {
                OutputFormat::Raw => OutputFormat::Raw,
                OutputFormat::Json | OutputFormat::Table => OutputFormat::Json,
            };
            output(&cache_file_schema(), format)
        }
        CacheCommands::List => {
            let cache = ctx.open_cache(mock)?;
            let rows: Vec<CacheRow> = cache.iter().map(CacheRow::from).collect();
            output(&rows, flags.format)
        }
        CacheCommands::Stats => output(&ctx.open_cache(mock)?.stats(), flags.format),
        CacheCommands::Invalidate { ssid } => {
            let removed = ctx.open_cache(mock)?.remove(ssid)?.is_some();
            if !removed {
                tracing::info!(%ssid, "ssid was not cached");
            }
            output(
                &InvalidateResponse {
                    ssid: ssid.clone(),
                    removed,
                },
                flags.format,
            )
        }
        CacheCommands::Clean { all, .. } => {
            let mut cache = ctx.open_cache(mock)?;
            let removed = clean(&mut cache, *all)?;
            output(
                &CleanResponse {
                    removed,
                    remaining: cache.len(),
                },
                flags.format,
            )
        }
    }
}

fn clean(cache: &mut ResolutionCache, all: bool) -> anyhow::Result<usize> {
    let removed = if all {
        cache.clear()?
    } else {
        cache.retain_resolved()?
    };
    tracing::info!(removed, path = %cache.path().display(), "cache cleaned");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use ssid_cache::{Durability, ResolutionCache};
    use ssid_core::entities::{CacheEntry, Coordinate};

    use super::{CacheRow, clean};

    fn populated(dir: &tempfile::TempDir) -> ResolutionCache {
        let mut cache =
            ResolutionCache::open(dir.path().join("cache.json"), Durability::WriteThrough).unwrap();
        cache
            .put(CacheEntry::resolved(
                "homenet42",
                Coordinate::new(51.5, -0.12),
                None,
                "wigle",
                Utc::now(),
            ))
            .unwrap();
        cache
            .put(CacheEntry::not_found("cafe", "no_results", "wigle", Utc::now()))
            .unwrap();
        cache
    }

    #[test]
    fn clean_defaults_to_failures() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut cache = populated(&dir);
        assert_eq!(clean(&mut cache, false).unwrap(), 1);
        assert!(cache.get("HomeNet42").is_some());
    }

    #[test]
    fn clean_all_empties_the_cache() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut cache = populated(&dir);
        assert_eq!(clean(&mut cache, true).unwrap(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn rows_flatten_coordinates() {
        let dir = tempfile::TempDir::new().unwrap();
        let cache = populated(&dir);
        let rows: Vec<CacheRow> = cache.iter().map(CacheRow::from).collect();
        let cafe = rows.iter().find(|row| row.ssid == "cafe").unwrap();
        assert_eq!(cafe.lat, None);
        assert_eq!(cafe.reason.as_deref(), Some("no_results"));
        let home = rows.iter().find(|row| row.ssid == "homenet42").unwrap();
        assert_eq!(home.lat, Some(51.5));
    }
}
