//! Listing and pruning generated artifacts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::MapError;

/// A generated file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
}

/// Files in `dir` with the given extension, newest first. A missing
/// directory lists as empty.
///
/// # Errors
///
/// Returns [`MapError::Read`] if the directory exists but cannot be read.
pub fn list_artifacts(dir: &Path, extension: &str) -> Result<Vec<Artifact>, MapError> {
    let read_err = |source| MapError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(error) => return Err(read_err(error)),
    };

    let mut artifacts = Vec::new();
    for entry in entries {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(extension) {
            continue;
        }
        let metadata = entry.metadata().map_err(read_err)?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_default();
        artifacts.push(Artifact {
            file_name: entry.file_name().to_string_lossy().into_owned(),
            path,
            size_bytes: metadata.len(),
            modified,
        });
    }

    artifacts.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| b.file_name.cmp(&a.file_name))
    });
    Ok(artifacts)
}

/// Delete files in `dir` with the given extension last modified more than
/// `age` before `now`. Returns the removed paths.
///
/// # Errors
///
/// Returns [`MapError::Read`] if listing fails or a file cannot be removed.
pub fn remove_older_than(
    dir: &Path,
    extension: &str,
    age: Duration,
    now: DateTime<Utc>,
) -> Result<Vec<PathBuf>, MapError> {
    let age = chrono::Duration::from_std(age).unwrap_or(chrono::Duration::MAX);
    let cutoff = now.checked_sub_signed(age).unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut removed = Vec::new();
    for artifact in list_artifacts(dir, extension)? {
        if artifact.modified >= cutoff {
            continue;
        }
        std::fs::remove_file(&artifact.path).map_err(|source| MapError::Read {
            path: artifact.path.clone(),
            source,
        })?;
        tracing::info!(path = %artifact.path.display(), "removed old artifact");
        removed.push(artifact.path);
    }
    Ok(removed)
}
