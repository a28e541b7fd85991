//! Resolver error types.
//!
//! Lookup failures are not errors at this level; they come back as
//! [`ResolutionResult`](crate::ResolutionResult) variants. Only conditions
//! that should stop the run surface here.

use ssid_cache::CacheError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The cache store could not be written.
    #[error("resolution cache is not writable: {0}")]
    Cache(#[from] CacheError),

    /// The SSID normalizes to an empty key.
    #[error("cannot resolve SSID '{0}': empty after normalization")]
    EmptySsid(String),
}
