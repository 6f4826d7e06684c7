//! Configuration schema for Crewline agents.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Model binding and run flags for a single named agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentBinding {
    /// Model name, e.g. `"gpt-4o"`, `"github/gpt-4o"`, `"llama3.1:7b"`.
    #[serde(default)]
    pub llm: String,
    /// Whether the local backend should run with thinking enabled.
    #[serde(default = "default_thinking")]
    pub thinking: bool,
    /// Verbose execution flag, passed through to the crew runtime.
    #[serde(default)]
    pub verbose: bool,
    /// Optional human-readable role description.
    #[serde(default)]
    pub role: Option<String>,
}

fn default_thinking() -> bool {
    true
}

/// The whole agents document: a mapping from agent id to its binding.
///
/// Deserialized once and immutable afterwards. Validation happens in
/// [`AgentsConfig::validate`] at load time, so lookups never discover
/// structural defects late.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AgentsConfig {
    pub agents: BTreeMap<String, AgentBinding>,
}

impl AgentsConfig {
    /// Look up the binding for an agent.
    pub fn binding(&self, agent_id: &str) -> Result<&AgentBinding, ConfigError> {
        self.agents
            .get(agent_id)
            .ok_or_else(|| ConfigError::UnknownAgent(agent_id.to_string()))
    }

    /// Model name configured for an agent.
    pub fn model_name(&self, agent_id: &str) -> Result<&str, ConfigError> {
        Ok(self.binding(agent_id)?.llm.as_str())
    }

    /// Thinking flag for an agent (defaults to true when unset).
    pub fn thinking(&self, agent_id: &str) -> Result<bool, ConfigError> {
        Ok(self.binding(agent_id)?.thinking)
    }

    /// All agent id to model name pairs, in agent-id order.
    pub fn models(&self) -> BTreeMap<&str, &str> {
        self.agents
            .iter()
            .map(|(agent, binding)| (agent.as_str(), binding.llm.as_str()))
            .collect()
    }

    /// Validate the document in a single pass, failing on the first defect.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.agents.is_empty() {
            return Err(ConfigError::Empty);
        }
        for (agent, binding) in &self.agents {
            if binding.llm.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    agent: agent.clone(),
                    field: "llm".to_string(),
                });
            }
        }
        Ok(())
    }
}
