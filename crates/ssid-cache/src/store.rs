//! In-memory view of the cache store with its load/flush lifecycle.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use ssid_core::entities::CacheEntry;
use ssid_core::enums::CacheStatus;
use ssid_core::normalize_ssid;

use crate::{CacheError, file};

/// When writes reach disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Durability {
    /// Every mutation is durable before the call returns.
    #[default]
    WriteThrough,
    /// Mutations stay in memory until [`ResolutionCache::flush`] (or drop).
    Deferred,
}

/// Entry counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total: usize,
    pub resolved: usize,
    pub not_found: usize,
    pub error: usize,
}

/// Process-local, single-writer resolution cache.
///
/// Keys are normalized SSIDs. `put` is last-write-wins, so there is never more
/// than one entry per key.
#[derive(Debug)]
pub struct ResolutionCache {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
    durability: Durability,
    dirty: bool,
}

impl ResolutionCache {
    /// Load the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] only when an existing store cannot be read at
    /// all (e.g. permission denied). Missing and corrupt stores load as empty.
    pub fn open(path: impl Into<PathBuf>, durability: Durability) -> Result<Self, CacheError> {
        let path = path.into();
        let entries = file::load(&path)?;
        tracing::debug!(path = %path.display(), entries = entries.len(), "cache loaded");
        Ok(Self {
            path,
            entries,
            durability,
            dirty: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn durability(&self) -> Durability {
        self.durability
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an SSID. The argument is normalized first, so display and key
    /// forms both work.
    #[must_use]
    pub fn get(&self, ssid: &str) -> Option<&CacheEntry> {
        self.entries.get(&normalize_ssid(ssid))
    }

    /// Insert or overwrite the entry for its key.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InconsistentEntry`] for entries that would not
    /// survive a reload, and write errors in write-through mode.
    pub fn put(&mut self, entry: CacheEntry) -> Result<(), CacheError> {
        if !entry.is_consistent() {
            return Err(CacheError::InconsistentEntry {
                key: entry.normalized_ssid,
            });
        }
        tracing::debug!(key = %entry.normalized_ssid, status = %entry.status, "cache put");
        self.entries.insert(entry.normalized_ssid.clone(), entry);
        self.mark_dirty()
    }

    /// Remove the entry for an SSID, returning it.
    ///
    /// # Errors
    ///
    /// Returns write errors in write-through mode.
    pub fn remove(&mut self, ssid: &str) -> Result<Option<CacheEntry>, CacheError> {
        let removed = self.entries.remove(&normalize_ssid(ssid));
        if removed.is_some() {
            self.mark_dirty()?;
        }
        Ok(removed)
    }

    /// Drop every `not_found`/`error` entry so those SSIDs are looked up
    /// again. Returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns write errors in write-through mode.
    pub fn retain_resolved(&mut self) -> Result<usize, CacheError> {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.status == CacheStatus::Resolved);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.mark_dirty()?;
        }
        Ok(removed)
    }

    /// Remove every entry. Returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns write errors in write-through mode.
    pub fn clear(&mut self) -> Result<usize, CacheError> {
        let removed = self.entries.len();
        self.entries.clear();
        if removed > 0 {
            self.mark_dirty()?;
        }
        Ok(removed)
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            total: self.entries.len(),
            ..CacheStats::default()
        };
        for entry in self.entries.values() {
            match entry.status {
                CacheStatus::Resolved => stats.resolved += 1,
                CacheStatus::NotFound => stats.not_found += 1,
                CacheStatus::Error => stats.error += 1,
            }
        }
        stats
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry> {
        self.entries.values()
    }

    /// Write pending changes to disk. A no-op when nothing changed.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] or [`CacheError::Serialize`] when the store
    /// cannot be replaced.
    pub fn flush(&mut self) -> Result<(), CacheError> {
        if !self.dirty {
            return Ok(());
        }
        file::write_atomic(&self.path, &self.entries)?;
        self.dirty = false;
        tracing::debug!(path = %self.path.display(), entries = self.entries.len(), "cache flushed");
        Ok(())
    }

    fn mark_dirty(&mut self) -> Result<(), CacheError> {
        self.dirty = true;
        match self.durability {
            Durability::WriteThrough => self.flush(),
            Durability::Deferred => Ok(()),
        }
    }
}

impl Drop for ResolutionCache {
    fn drop(&mut self) {
        if let Err(error) = self.flush() {
            tracing::warn!(path = %self.path.display(), %error, "failed to flush cache on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use ssid_core::entities::Coordinate;

    use super::*;

    fn resolved(key: &str) -> CacheEntry {
        CacheEntry::resolved(key, Coordinate::new(51.5, -0.12), None, "wigle", Utc::now())
    }

    fn not_found(key: &str) -> CacheEntry {
        CacheEntry::not_found(key, "no_results", "wigle", Utc::now())
    }

    #[test]
    fn missing_store_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResolutionCache::open(dir.path().join("cache.json"), Durability::WriteThrough)
            .unwrap();
        assert!(cache.is_empty());
        assert!(!dir.path().join("cache.json").exists());
    }

    #[test]
    fn put_is_durable_in_write_through_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let mut cache = ResolutionCache::open(&path, Durability::WriteThrough).unwrap();
        cache.put(resolved("homenet42")).unwrap();

        // A second handle sees the entry without the first being dropped.
        let reopened = ResolutionCache::open(&path, Durability::Deferred).unwrap();
        let entry = reopened.get("HomeNet42").unwrap();
        assert_eq!(entry.coordinate, Some(Coordinate::new(51.5, -0.12)));
    }

    #[test]
    fn deferred_mode_waits_for_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let mut cache = ResolutionCache::open(&path, Durability::Deferred).unwrap();
        cache.put(not_found("cafe")).unwrap();
        assert!(!path.exists());

        cache.flush().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn drop_flushes_pending_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        {
            let mut cache = ResolutionCache::open(&path, Durability::Deferred).unwrap();
            cache.put(resolved("a1")).unwrap();
        }
        let cache = ResolutionCache::open(&path, Durability::Deferred).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn put_overwrites_same_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache =
            ResolutionCache::open(dir.path().join("cache.json"), Durability::Deferred).unwrap();
        cache.put(not_found("homenet42")).unwrap();
        cache.put(resolved("homenet42")).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("homenet42").unwrap().status, CacheStatus::Resolved);
    }

    #[test]
    fn put_rejects_unnormalized_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache =
            ResolutionCache::open(dir.path().join("cache.json"), Durability::Deferred).unwrap();
        let err = cache.put(resolved("HomeNet42")).unwrap_err();
        assert!(matches!(err, CacheError::InconsistentEntry { ref key } if key == "HomeNet42"));
        assert!(cache.is_empty());
    }

    #[test]
    fn retain_resolved_drops_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache =
            ResolutionCache::open(dir.path().join("cache.json"), Durability::Deferred).unwrap();
        cache.put(resolved("a1")).unwrap();
        cache.put(not_found("b2")).unwrap();
        cache
            .put(CacheEntry::error("c3", "rejected", "wigle", Utc::now()))
            .unwrap();

        assert_eq!(cache.retain_resolved().unwrap(), 2);
        assert_eq!(
            cache.stats(),
            CacheStats {
                total: 1,
                resolved: 1,
                not_found: 0,
                error: 0,
            }
        );
    }

    #[test]
    fn remove_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache =
            ResolutionCache::open(dir.path().join("cache.json"), Durability::WriteThrough).unwrap();
        cache.put(resolved("a1")).unwrap();
        cache.put(resolved("b2")).unwrap();

        assert!(cache.remove("  A1 ").unwrap().is_some());
        assert!(cache.remove("a1").unwrap().is_none());
        assert_eq!(cache.clear().unwrap(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn iter_is_key_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache =
            ResolutionCache::open(dir.path().join("cache.json"), Durability::Deferred).unwrap();
        cache.put(resolved("zeta")).unwrap();
        cache.put(resolved("alpha")).unwrap();
        let keys: Vec<_> = cache.iter().map(|e| e.normalized_ssid.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }
}
