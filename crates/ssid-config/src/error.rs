use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Layer merge or deserialization failed (bad TOML, wrong type in an env var).
    #[error("failed to load ssidmap configuration: {0}")]
    Figment(#[from] figment::Error),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
