//! # ssid-config
//!
//! Layered configuration loading for ssidmap using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SSIDMAP_*` prefix, `__` as separator)
//! 2. Legacy credential variables `WIGLE_API_NAME` / `WIGLE_API_TOKEN`
//! 3. An explicit `--config` file, when given
//! 4. Project-level `.ssidmap/config.toml`
//! 5. User-level `~/.config/ssidmap/config.toml`
//! 6. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SSIDMAP_WIGLE__API_NAME` -> `wigle.api_name`,
//! `SSIDMAP_RESOLVER__MAX_RETRIES` -> `resolver.max_retries`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use ssid_config::SsidConfig;
//!
//! let config = SsidConfig::load_with_dotenv().expect("config");
//! if config.wigle.is_configured() {
//!     println!("WiGLE endpoint: {}", config.wigle.endpoint);
//! }
//! ```

mod error;
mod output;
mod resolver;
mod validator;
mod wigle;

pub use error::ConfigError;
pub use output::OutputConfig;
pub use resolver::{MAX_RETRIES_CAP, ResolverConfig};
pub use validator::{PlaceholderEntry, ValidatorConfig};
pub use wigle::WigleConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SsidConfig {
    #[serde(default)]
    pub wigle: WigleConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub validator: ValidatorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl SsidConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`load_with_dotenv`](Self::load_with_dotenv)
    /// if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, merging an explicit config file above the
    /// discovered TOML files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source cannot be parsed or a value is invalid.
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_with(explicit).extract()?;
        config.wigle.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source cannot be parsed or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the default figment provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_with(None)
    }

    /// Build the figment provider chain with an optional explicit file.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment_with(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".ssidmap/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Explicit file
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        // Layer 4: Legacy credential variables
        figment = figment.merge(
            Env::raw()
                .only(&["WIGLE_API_NAME", "WIGLE_API_TOKEN"])
                .map(|key| {
                    key.as_str()
                        .to_ascii_lowercase()
                        .replacen("wigle_", "wigle.", 1)
                        .into()
                }),
        );

        // Layer 5: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("SSIDMAP_").split("__"));

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ssidmap").join("config.toml"))
    }
}
