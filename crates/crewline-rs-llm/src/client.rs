//! Resolved client handles and provider-specific connection parameters.

use crate::Provider;
use serde::{Deserialize, Serialize};

/// Base URL of the local model server.
pub(crate) const LOCAL_BASE_URL: &str = "http://localhost:11434";
/// Base URL of the gateway's OpenAI-compatible inference endpoint.
pub(crate) const GATEWAY_BASE_URL: &str = "https://models.github.ai/inference";

/// Sampling temperature for hosted and gateway calls.
const HOSTED_TEMPERATURE: f64 = 0.7;
/// Token cap for hosted and gateway calls.
const HOSTED_MAX_TOKENS: u32 = 2000;
/// Context length used when a local model is not in the lookup table.
const DEFAULT_CONTEXT_LENGTH: u32 = 4096;

/// Connection parameters for a resolved client, by provider.
///
/// Serialized untagged so each variant matches the wire shape the provider
/// expects; more specific variants come first for deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClientParams {
    Gateway {
        /// Wire model id with the gateway prefix stripped, `openai/<name>`.
        model: String,
        api_key: String,
        base_url: String,
        temperature: f64,
        max_tokens: u32,
    },
    Local {
        /// Wire model id, `ollama/<name>`.
        model: String,
        base_url: String,
        options: LocalModelOptions,
    },
    Hosted {
        /// Wire model id, `openai/<name>`.
        model: String,
        api_key: String,
        temperature: f64,
        max_tokens: u32,
    },
}

impl ClientParams {
    pub(crate) fn hosted(model_name: &str, api_key: String) -> Self {
        ClientParams::Hosted {
            model: format!("openai/{model_name}"),
            api_key,
            temperature: HOSTED_TEMPERATURE,
            max_tokens: HOSTED_MAX_TOKENS,
        }
    }

    pub(crate) fn gateway(stripped_name: &str, api_key: String) -> Self {
        ClientParams::Gateway {
            model: format!("openai/{stripped_name}"),
            api_key,
            base_url: GATEWAY_BASE_URL.to_string(),
            temperature: HOSTED_TEMPERATURE,
            max_tokens: HOSTED_MAX_TOKENS,
        }
    }

    pub(crate) fn local(model_name: &str, thinking: bool) -> Self {
        ClientParams::Local {
            model: format!("ollama/{model_name}"),
            base_url: LOCAL_BASE_URL.to_string(),
            options: LocalModelOptions {
                think: thinking,
                num_ctx: context_length(model_name),
                num_thread: thread_count(),
                ..LocalModelOptions::default()
            },
        }
    }

    /// Wire model id for this client.
    pub fn model(&self) -> &str {
        match self {
            ClientParams::Hosted { model, .. }
            | ClientParams::Gateway { model, .. }
            | ClientParams::Local { model, .. } => model,
        }
    }
}

/// Runtime options passed to the local model server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalModelOptions {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub repeat_penalty: f64,
    pub think: bool,
    pub num_ctx: u32,
    pub num_thread: u32,
    pub use_mmap: bool,
    pub use_mlock: bool,
    pub numa: bool,
}

impl Default for LocalModelOptions {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            top_p: 0.9,
            top_k: 40,
            repeat_penalty: 1.08,
            think: true,
            num_ctx: DEFAULT_CONTEXT_LENGTH,
            num_thread: thread_count(),
            use_mmap: true,
            use_mlock: false,
            numa: false,
        }
    }
}

/// A memoized, provider-classified client handle for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedClient {
    /// Agent this client was resolved for.
    pub agent_id: String,
    /// Model name as configured, before any prefix handling.
    pub model_name: String,
    /// Owning provider.
    pub provider: Provider,
    /// Provider-specific connection parameters.
    pub params: ClientParams,
}

/// Context lengths tuned per local model, small enough to avoid exhausting
/// a single consumer GPU. Unlisted models fall back to the safe default.
const CONTEXT_LENGTHS: &[(&str, u32)] = &[
    ("qwen2.5:0.5b", 4096),
    ("qwen2.5:1.5b", 4096),
    ("qwen2.5:3b", 6144),
    ("qwen3:1.7b", 4096),
    ("phi3.5:3.8b", 4096),
    ("llama3.2:1b", 4096),
    ("gemma2:2b", 4096),
    ("openhermes:v2.5", 6144),
    ("mistral:7b", 6144),
    ("llama3.2:3b", 6144),
    ("llama3.1:7b", 6144),
    ("llama3.1:13b", 8192),
    ("llama3.1:70b", 8192),
];

/// Context length for a local model name.
pub fn context_length(model_name: &str) -> u32 {
    CONTEXT_LENGTHS
        .iter()
        .find(|(name, _)| *name == model_name)
        .map(|(_, len)| *len)
        .unwrap_or(DEFAULT_CONTEXT_LENGTH)
}

/// Thread count for the local server: half the cores, clamped to [2, 8].
pub fn thread_count() -> u32 {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(4);
    (cores / 2).clamp(2, 8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn context_length_uses_table_with_fallback() {
        assert_eq!(context_length("llama3.1:7b"), 6144);
        assert_eq!(context_length("llama3.1:70b"), 8192);
        assert_eq!(context_length("qwen2.5:0.5b"), 4096);
        assert_eq!(context_length("some-new-model:42b"), 4096);
    }

    #[test]
    fn thread_count_stays_in_bounds() {
        let threads = thread_count();
        assert!((2..=8).contains(&threads));
    }

    #[test]
    fn local_params_carry_model_options() {
        let params = ClientParams::local("llama3.1:7b", false);
        let ClientParams::Local { model, options, .. } = &params else {
            panic!("expected local params");
        };
        assert_eq!(model, "ollama/llama3.1:7b");
        assert_eq!(options.num_ctx, 6144);
        assert!(!options.think);
        assert_eq!(params.model(), "ollama/llama3.1:7b");
    }

    #[test]
    fn gateway_params_point_at_gateway_base_url() {
        let params = ClientParams::gateway("llama-foo", "token".to_string());
        let ClientParams::Gateway {
            model, base_url, ..
        } = &params
        else {
            panic!("expected gateway params");
        };
        assert_eq!(model, "openai/llama-foo");
        assert_eq!(base_url, GATEWAY_BASE_URL);
    }
}
