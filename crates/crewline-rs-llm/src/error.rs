//! Error types for model resolution.

use crewline_rs_config::ConfigError;
use thiserror::Error;

/// Errors returned while resolving an agent to a client handle.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Configuration lookup or validation failed.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// The selected provider requires a credential that is not set.
    #[error(
        "credential for agent '{agent}' not found in environment; set the {var} environment variable"
    )]
    CredentialMissing { agent: String, var: String },
}
