//! Error types for knowledge store operations.

/// Errors raised internally while reading or writing knowledge documents.
///
/// Public store operations convert these to boolean or default returns and
/// log the cause; they never reach callers.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
