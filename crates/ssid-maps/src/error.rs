//! Map emitter error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    /// The output directory cannot be created or written to.
    #[error("output directory {path} is not writable: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single artifact could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory listing or removal failed.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row of the resolved-points export could not be encoded.
    #[error("failed to encode {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
