//! SSID validator policy, including the placeholder policy table.

use serde::{Deserialize, Serialize};
use ssid_core::validate::{DEFAULT_PLACEHOLDERS, MAX_SSID_BYTES, PlaceholderRule};
use ssid_core::SsidValidator;

use crate::ConfigError;

const fn default_min_length() -> usize {
    2
}

const fn default_max_bytes() -> usize {
    MAX_SSID_BYTES
}

const fn default_true() -> bool {
    true
}

fn default_placeholders() -> Vec<PlaceholderEntry> {
    DEFAULT_PLACEHOLDERS
        .iter()
        .map(|(reason, pattern)| PlaceholderEntry {
            reason: (*reason).to_string(),
            pattern: (*pattern).to_string(),
        })
        .collect()
}

/// One row of the placeholder policy table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlaceholderEntry {
    /// Reason code reported on a match.
    pub reason: String,
    /// Regex matched against the trimmed SSID.
    pub pattern: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidatorConfig {
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    #[serde(default = "default_true")]
    pub reject_repeated_characters: bool,

    /// Replaces the built-in table when set.
    #[serde(default = "default_placeholders")]
    pub placeholders: Vec<PlaceholderEntry>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_bytes: default_max_bytes(),
            reject_repeated_characters: true,
            placeholders: default_placeholders(),
        }
    }
}

impl ValidatorConfig {
    /// Compile the configured policy into a validator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `max_bytes` exceeds the
    /// protocol limit or a placeholder pattern does not compile.
    pub fn build(&self) -> Result<SsidValidator, ConfigError> {
        if self.max_bytes == 0 || self.max_bytes > MAX_SSID_BYTES {
            return Err(ConfigError::InvalidValue {
                field: "validator.max_bytes".into(),
                reason: format!("must be between 1 and {MAX_SSID_BYTES}"),
            });
        }

        let rules = self
            .placeholders
            .iter()
            .map(|entry| {
                PlaceholderRule::new(entry.reason.clone(), &entry.pattern).map_err(|error| {
                    ConfigError::InvalidValue {
                        field: "validator.placeholders".into(),
                        reason: error.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SsidValidator::new(
            self.min_length,
            self.max_bytes,
            self.reject_repeated_characters,
            rules,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_core_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.placeholders.len(), DEFAULT_PLACEHOLDERS.len());
        let validator = config.build().expect("default policy builds");
        assert!(!validator.validate("linksys").accepted);
        assert!(validator.validate("HomeNet42").accepted);
    }

    #[test]
    fn bad_pattern_is_invalid_value() {
        let config = ValidatorConfig {
            placeholders: vec![PlaceholderEntry {
                reason: "broken".into(),
                pattern: "[".into(),
            }],
            ..Default::default()
        };
        assert!(matches!(
            config.build(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "validator.placeholders"
        ));
    }

    #[test]
    fn max_bytes_above_protocol_limit_is_rejected() {
        let config = ValidatorConfig {
            max_bytes: 64,
            ..Default::default()
        };
        assert!(config.build().is_err());
    }
}
