//! Provider classification for configured model names.

use serde::{Deserialize, Serialize};

/// Model name prefixes owned by the hosted provider.
const HOSTED_PREFIXES: &[&str] = &["gpt-", "o1-"];
/// Exact model names owned by the hosted provider.
const HOSTED_EXACT: &[&str] = &["gpt-4o", "gpt-4o-mini"];
/// Prefix marking gateway-routed models; stripped before the wire call.
pub(crate) const GATEWAY_PREFIX: &str = "github/";

/// Backend family serving an LLM request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Hosted API (OpenAI-style model names).
    Hosted,
    /// GitHub-hosted model gateway speaking the OpenAI-compatible protocol.
    Gateway,
    /// Local model server; the default when nothing else matches.
    Local,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Hosted => write!(f, "hosted"),
            Provider::Gateway => write!(f, "gateway"),
            Provider::Local => write!(f, "local"),
        }
    }
}

/// One classification rule: predicate plus the provider it selects.
struct ProviderRule {
    matches: fn(&str) -> bool,
    provider: Provider,
}

/// Ordered rule table; the first match wins, so hosted names are checked
/// before the gateway prefix and the local provider catches the rest.
const PROVIDER_RULES: &[ProviderRule] = &[
    ProviderRule {
        matches: is_hosted_model,
        provider: Provider::Hosted,
    },
    ProviderRule {
        matches: is_gateway_model,
        provider: Provider::Gateway,
    },
    ProviderRule {
        matches: |_| true,
        provider: Provider::Local,
    },
];

fn is_hosted_model(model_name: &str) -> bool {
    HOSTED_PREFIXES
        .iter()
        .any(|prefix| model_name.starts_with(prefix))
        || HOSTED_EXACT.contains(&model_name)
}

fn is_gateway_model(model_name: &str) -> bool {
    model_name.starts_with(GATEWAY_PREFIX)
}

/// Classify a configured model name into its owning provider.
pub fn classify(model_name: &str) -> Provider {
    PROVIDER_RULES
        .iter()
        .find(|rule| (rule.matches)(model_name))
        .map(|rule| rule.provider)
        .unwrap_or(Provider::Local)
}

/// Strip the gateway prefix from a model name for the wire call.
pub(crate) fn strip_gateway_prefix(model_name: &str) -> &str {
    model_name.strip_prefix(GATEWAY_PREFIX).unwrap_or(model_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hosted_prefixes_and_exact_names() {
        assert_eq!(classify("gpt-4o"), Provider::Hosted);
        assert_eq!(classify("gpt-4o-mini"), Provider::Hosted);
        assert_eq!(classify("gpt-3.5-turbo"), Provider::Hosted);
        assert_eq!(classify("o1-preview"), Provider::Hosted);
    }

    #[test]
    fn gateway_prefix_is_recognized_and_stripped() {
        assert_eq!(classify("github/llama-foo"), Provider::Gateway);
        assert_eq!(strip_gateway_prefix("github/llama-foo"), "llama-foo");
    }

    #[test]
    fn everything_else_is_local() {
        assert_eq!(classify("llama3.1:7b"), Provider::Local);
        assert_eq!(classify("openhermes:v2.5"), Provider::Local);
        assert_eq!(classify(""), Provider::Local);
    }

    /// Hosted rules take priority over the gateway rule.
    #[test]
    fn rule_order_is_hosted_before_gateway() {
        assert_eq!(classify("gpt-4o"), Provider::Hosted);
        assert_eq!(classify("github/gpt-4o"), Provider::Gateway);
    }
}
