//! WiGLE lookup service configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default WiGLE network search endpoint.
fn default_endpoint() -> String {
    String::from("https://api.wigle.net/api/v2/network/search")
}

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WigleConfig {
    /// API name (the basic-auth user).
    #[serde(default)]
    pub api_name: String,

    /// API token (the basic-auth password).
    #[serde(default)]
    pub api_token: String,

    /// Network search endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout. Zero is rejected; there is no "wait forever".
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Answer lookups from the offline mock source instead of the service.
    #[serde(default)]
    pub mock: bool,
}

impl Default for WigleConfig {
    fn default() -> Self {
        Self {
            api_name: String::new(),
            api_token: String::new(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            mock: false,
        }
    }
}

impl WigleConfig {
    /// Check if both credentials are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_name.is_empty() && !self.api_token.is_empty()
    }

    /// Check values that would make every request fail.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero timeout or an empty endpoint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "wigle.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "wigle.endpoint".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}
