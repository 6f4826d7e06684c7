//! Agent configuration models and loading.
//!
//! This crate owns the `agents.yaml` schema, its validation, and the
//! default-path discovery used by both the resolver and the CLI.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Default config path discovery.
pub use loader::default_config_path;
/// Configuration schema models.
pub use model::*;
