//! Error types for config loading and validation.

use thiserror::Error;

/// Errors returned while loading or validating the agents config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a config file failed.
    #[error("failed to read agents config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing a config file failed.
    #[error("failed to parse agents config: {0}")]
    ParseFailed(#[from] serde_yaml::Error),
    /// The document parsed but contains no agent entries.
    #[error("agents config is empty")]
    Empty,
    /// An agent referenced by a caller is not in the config.
    #[error("unknown agent: {0}")]
    UnknownAgent(String),
    /// An agent entry is missing a required field.
    #[error("agent '{agent}' is missing required field '{field}'")]
    MissingField { agent: String, field: String },
}
