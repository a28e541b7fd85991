//! Cross-cutting error types for ssidmap.
//!
//! Domain-specific errors (e.g., `CacheError`, `LookupError`) are defined in
//! their respective crates. The binary converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by core types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A placeholder policy pattern failed to compile.
    #[error("Invalid placeholder pattern for '{reason}': {source}")]
    InvalidPattern {
        reason: String,
        #[source]
        source: regex::Error,
    },

    /// Data failed validation (schema, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
