//! Agent-to-client resolution with a process-scoped cache.

use crate::client::{ClientParams, ResolvedClient};
use crate::provider::{Provider, classify, strip_gateway_prefix};
use crate::{LlmError, LocalServer};
use crewline_rs_config::AgentsConfig;
use log::{debug, info};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Environment variable holding the hosted provider credential.
pub const HOSTED_CREDENTIAL_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the gateway credential.
pub const GATEWAY_CREDENTIAL_VAR: &str = "GITHUB_TOKEN";

/// Provider credentials, injected so tests never read process env.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Hosted provider API key.
    pub openai: Option<String>,
    /// Gateway access token.
    pub github: Option<String>,
}

impl Credentials {
    /// Read the credentials from the environment.
    pub fn from_env() -> Self {
        Self {
            openai: std::env::var(HOSTED_CREDENTIAL_VAR).ok(),
            github: std::env::var(GATEWAY_CREDENTIAL_VAR).ok(),
        }
    }
}

/// Read-only description of an agent's model binding.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentModelInfo {
    pub model_name: String,
    pub provider: Provider,
    pub thinking: bool,
}

/// Resolves agents to provider-classified client handles.
///
/// Owns its cache; the check-then-create sequence runs under one lock so at
/// most one client exists per agent.
pub struct ModelResolver {
    config: AgentsConfig,
    credentials: Credentials,
    cache: Mutex<HashMap<String, Arc<ResolvedClient>>>,
}

impl ModelResolver {
    /// Create a resolver over a loaded config and credential set.
    pub fn new(config: AgentsConfig, credentials: Credentials) -> Self {
        Self {
            config,
            credentials,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The configuration this resolver was built from.
    pub fn config(&self) -> &AgentsConfig {
        &self.config
    }

    /// Resolve an agent to its client handle, creating and caching it on
    /// first use. Performs no network I/O.
    pub fn resolve(&self, agent_id: &str) -> Result<Arc<ResolvedClient>, LlmError> {
        let mut cache = self.cache.lock();
        if let Some(client) = cache.get(agent_id) {
            debug!("returning cached client (agent_id={agent_id})");
            return Ok(client.clone());
        }

        let binding = self.config.binding(agent_id)?;
        let model_name = binding.llm.clone();
        let provider = classify(&model_name);
        let params = match provider {
            Provider::Hosted => {
                let api_key = self.credential(agent_id, HOSTED_CREDENTIAL_VAR)?;
                ClientParams::hosted(&model_name, api_key)
            }
            Provider::Gateway => {
                let token = self.credential(agent_id, GATEWAY_CREDENTIAL_VAR)?;
                ClientParams::gateway(strip_gateway_prefix(&model_name), token)
            }
            Provider::Local => ClientParams::local(&model_name, binding.thinking),
        };

        let client = Arc::new(ResolvedClient {
            agent_id: agent_id.to_string(),
            model_name: model_name.clone(),
            provider,
            params,
        });
        cache.insert(agent_id.to_string(), client.clone());
        info!("created client (agent_id={agent_id}, model={model_name}, provider={provider})");
        Ok(client)
    }

    /// Describe an agent's binding without constructing a client.
    pub fn describe(&self, agent_id: &str) -> Result<AgentModelInfo, LlmError> {
        let binding = self.config.binding(agent_id)?;
        Ok(AgentModelInfo {
            model_name: binding.llm.clone(),
            provider: classify(&binding.llm),
            thinking: binding.thinking,
        })
    }

    /// Drop one cached client so the next resolve rebuilds it.
    pub fn invalidate(&self, agent_id: &str) {
        if self.cache.lock().remove(agent_id).is_some() {
            debug!("invalidated cached client (agent_id={agent_id})");
        }
    }

    /// Drop every cached client.
    pub fn invalidate_all(&self) {
        let mut cache = self.cache.lock();
        let dropped = cache.len();
        cache.clear();
        debug!("cleared client cache (dropped={dropped})");
    }

    /// Unload every configured local model from the server and clear the
    /// cache. Used as a memory-management affordance between crew runs.
    pub async fn cleanup_local_models(&self, server: &LocalServer) {
        for (agent, model) in self.config.models() {
            if classify(model) == Provider::Local {
                debug!("unloading local model (agent={agent}, model={model})");
                server.unload(model).await;
            }
        }
        self.invalidate_all();
        info!("local model cleanup completed");
    }

    fn credential(&self, agent_id: &str, var: &str) -> Result<String, LlmError> {
        let value = match var {
            HOSTED_CREDENTIAL_VAR => self.credentials.openai.as_ref(),
            _ => self.credentials.github.as_ref(),
        };
        value.cloned().ok_or_else(|| LlmError::CredentialMissing {
            agent: agent_id.to_string(),
            var: var.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"
coach:
  llm: llama3.1:7b
  thinking: false
influencer:
  llm: gpt-4o
researcher:
  llm: github/llama-foo
"#;

    fn build_resolver(credentials: Credentials) -> ModelResolver {
        let config = AgentsConfig::load_from_str(CONFIG).expect("config");
        ModelResolver::new(config, credentials)
    }

    fn full_credentials() -> Credentials {
        Credentials {
            openai: Some("sk-test".to_string()),
            github: Some("ghp-test".to_string()),
        }
    }

    #[test]
    fn hosted_agent_requires_hosted_credential() {
        let resolver = build_resolver(Credentials::default());
        let err = resolver.resolve("influencer").unwrap_err();
        let LlmError::CredentialMissing { agent, var } = err else {
            panic!("expected missing credential");
        };
        assert_eq!(agent, "influencer");
        assert_eq!(var, HOSTED_CREDENTIAL_VAR);
    }

    #[test]
    fn gateway_agent_requires_gateway_credential_and_strips_prefix() {
        let resolver = build_resolver(full_credentials());
        let client = resolver.resolve("researcher").expect("client");
        assert_eq!(client.provider, Provider::Gateway);
        assert_eq!(client.params.model(), "openai/llama-foo");

        let without_token = build_resolver(Credentials {
            openai: Some("sk-test".to_string()),
            github: None,
        });
        let err = without_token.resolve("researcher").unwrap_err();
        assert!(format!("{err}").contains(GATEWAY_CREDENTIAL_VAR));
    }

    #[test]
    fn local_agent_never_needs_credentials() {
        let resolver = build_resolver(Credentials::default());
        let client = resolver.resolve("coach").expect("client");
        assert_eq!(client.provider, Provider::Local);
        assert_eq!(client.params.model(), "ollama/llama3.1:7b");
        let ClientParams::Local { options, .. } = &client.params else {
            panic!("expected local params");
        };
        assert!(!options.think);
    }

    #[test]
    fn resolve_is_memoized_until_invalidated() {
        let resolver = build_resolver(Credentials::default());
        let first = resolver.resolve("coach").expect("client");
        let second = resolver.resolve("coach").expect("client");
        assert!(Arc::ptr_eq(&first, &second));

        resolver.invalidate("coach");
        let third = resolver.resolve("coach").expect("client");
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }

    #[test]
    fn invalidate_all_clears_every_agent() {
        let resolver = build_resolver(full_credentials());
        let coach = resolver.resolve("coach").expect("client");
        let influencer = resolver.resolve("influencer").expect("client");
        resolver.invalidate_all();
        assert!(!Arc::ptr_eq(&coach, &resolver.resolve("coach").expect("client")));
        assert!(!Arc::ptr_eq(
            &influencer,
            &resolver.resolve("influencer").expect("client")
        ));
    }

    #[test]
    fn describe_does_not_populate_the_cache() {
        let resolver = build_resolver(Credentials::default());
        let info = resolver.describe("influencer").expect("info");
        assert_eq!(
            info,
            AgentModelInfo {
                model_name: "gpt-4o".to_string(),
                provider: Provider::Hosted,
                thinking: true,
            }
        );
        // Hosted resolution would fail without a credential, so a describe
        // call must not have created a client.
        assert!(resolver.resolve("influencer").is_err());
    }

    #[test]
    fn unknown_agent_propagates_config_error() {
        let resolver = build_resolver(Credentials::default());
        let err = resolver.resolve("editor").unwrap_err();
        assert!(matches!(err, LlmError::Config(_)));
    }
}
