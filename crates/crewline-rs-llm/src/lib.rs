//! Per-agent LLM client resolution.
//!
//! Maps a configured agent to a provider-classified, memoized client handle.
//! Resolution is pure configuration work; connectivity is only exercised by
//! the maintenance calls in [`local`].

mod client;
mod error;
mod local;
mod provider;
mod resolver;

/// Connection parameter types for resolved clients.
pub use client::{ClientParams, LocalModelOptions, ResolvedClient, context_length, thread_count};
/// Resolver error type.
pub use error::LlmError;
/// Local model-server maintenance client.
pub use local::LocalServer;
/// Provider classification.
pub use provider::{Provider, classify};
/// Agent-to-client resolver and credential source.
pub use resolver::{AgentModelInfo, Credentials, ModelResolver};
