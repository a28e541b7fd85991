//! Error types for the resolution cache.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    /// The store could not be read or written.
    #[error("cache store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory entries could not be serialized.
    #[error("failed to serialize cache store {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An entry violating the cache schema was offered to `put`.
    #[error("refusing to store inconsistent cache entry for '{key}'")]
    InconsistentEntry { key: String },
}
