//! On-disk format of the cache store.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ssid_core::entities::CacheEntry;

use crate::CacheError;

/// Version written to (and required from) the `version` field.
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// The complete cache document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CacheFile {
    pub version: u32,
    pub entries: Vec<CacheEntry>,
}

#[derive(Serialize)]
struct CacheFileRef<'a> {
    version: u32,
    entries: Vec<&'a CacheEntry>,
}

/// JSON schema of [`CacheFile`].
#[must_use]
pub fn cache_file_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(CacheFile)).unwrap_or_default()
}

/// Where a corrupt store is moved: the store path with `.corrupt` appended.
#[must_use]
pub fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".corrupt");
    PathBuf::from(name)
}

/// Read the store. A missing file is an empty cache; a file that does not
/// parse or has an unknown version is quarantined and also yields an empty
/// cache. Entries failing [`CacheEntry::is_consistent`] are dropped.
pub(crate) fn load(path: &Path) -> Result<BTreeMap<String, CacheEntry>, CacheError> {
    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no cache store yet; starting empty");
            return Ok(BTreeMap::new());
        }
        Err(source) => {
            return Err(CacheError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let file = match serde_json::from_slice::<CacheFile>(&raw) {
        Ok(file) if file.version == CACHE_FORMAT_VERSION => file,
        Ok(file) => {
            tracing::warn!(
                path = %path.display(),
                version = file.version,
                "unsupported cache store version; resetting cache"
            );
            quarantine(path);
            return Ok(BTreeMap::new());
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "corrupt cache store; resetting cache");
            quarantine(path);
            return Ok(BTreeMap::new());
        }
    };

    let mut entries = BTreeMap::new();
    for entry in file.entries {
        if !entry.is_consistent() {
            tracing::warn!(
                key = %entry.normalized_ssid,
                status = %entry.status,
                "dropping inconsistent cache entry"
            );
            continue;
        }
        if let Some(previous) = entries.insert(entry.normalized_ssid.clone(), entry) {
            tracing::warn!(key = %previous.normalized_ssid, "duplicate cache key; keeping the later entry");
        }
    }
    Ok(entries)
}

fn quarantine(path: &Path) {
    let target = corrupt_path(path);
    if let Err(error) = std::fs::rename(path, &target) {
        tracing::warn!(
            path = %path.display(),
            target = %target.display(),
            %error,
            "could not move corrupt cache store aside"
        );
    }
}

/// Serialize `entries` (already key-ordered) and atomically replace the store.
pub(crate) fn write_atomic(
    path: &Path,
    entries: &BTreeMap<String, CacheEntry>,
) -> Result<(), CacheError> {
    let io_err = |source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(io_err)?;

    let document = CacheFileRef {
        version: CACHE_FORMAT_VERSION,
        entries: entries.values().collect(),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    serde_json::to_writer_pretty(&mut tmp, &document).map_err(|source| {
        CacheError::Serialize {
            path: path.to_path_buf(),
            source,
        }
    })?;
    tmp.write_all(b"\n").map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|error| io_err(error.error))?;
    Ok(())
}
