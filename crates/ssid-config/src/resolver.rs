//! Resolver behaviour: re-query policy, retries, pacing, coordinate checks.

use serde::{Deserialize, Serialize};

/// Upper bound on retries regardless of configuration.
pub const MAX_RETRIES_CAP: u32 = 3;

const fn default_retry_backoff_ms() -> u64 {
    500
}

const fn default_request_delay_ms() -> u64 {
    2500
}

const fn default_min_decimal_digits() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Re-query SSIDs whose cached outcome is `not_found` or `error`.
    #[serde(default)]
    pub requery_failures: bool,

    /// Retries for transient failures within one resolve call.
    #[serde(default)]
    pub max_retries: u32,

    /// Initial retry backoff; doubles on each attempt.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Minimum gap between two consecutive external queries.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Coordinates where neither axis has at least this many decimal digits
    /// are treated as placeholder data.
    #[serde(default = "default_min_decimal_digits")]
    pub min_decimal_digits: u32,

    /// Accept (0, 0) as a real location.
    #[serde(default)]
    pub allow_null_island: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            requery_failures: false,
            max_retries: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
            request_delay_ms: default_request_delay_ms(),
            min_decimal_digits: default_min_decimal_digits(),
            allow_null_island: false,
        }
    }
}

impl ResolverConfig {
    /// Configured retries clamped to [`MAX_RETRIES_CAP`].
    #[must_use]
    pub fn effective_retries(&self) -> u32 {
        self.max_retries.min(MAX_RETRIES_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ResolverConfig::default();
        assert!(!config.requery_failures);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.request_delay_ms, 2500);
        assert_eq!(config.min_decimal_digits, 1);
        assert!(!config.allow_null_island);
    }

    #[test]
    fn retries_are_capped() {
        let config = ResolverConfig {
            max_retries: 50,
            ..Default::default()
        };
        assert_eq!(config.effective_retries(), MAX_RETRIES_CAP);
    }
}
