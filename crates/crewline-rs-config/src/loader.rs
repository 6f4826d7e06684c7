//! Loading and path discovery for the agents config document.

use crate::{AgentsConfig, ConfigError};
use directories::ProjectDirs;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Config filename expected under the config directory.
const CONFIG_FILE: &str = "agents.yaml";
/// Config directory relative to a project root.
const CONFIG_DIR: &str = "config";

impl AgentsConfig {
    /// Load and validate the agents config from a path.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading agents config from {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Load and validate the agents config from YAML contents.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("parsing agents config (len={})", contents.len());
        let config: AgentsConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }
}

/// Default location of `agents.yaml`.
///
/// Prefers `config/agents.yaml` under the working directory; falls back to
/// the user-level config directory when the project-local file is absent.
pub fn default_config_path(cwd: impl AsRef<Path>) -> PathBuf {
    let local = cwd.as_ref().join(CONFIG_DIR).join(CONFIG_FILE);
    if local.exists() {
        return local;
    }
    if let Some(dirs) = ProjectDirs::from("", "", "crewline") {
        let user = dirs.config_dir().join(CONFIG_FILE);
        if user.exists() {
            return user;
        }
    }
    local
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
coach:
  role: Senior Career Coach
  llm: llama3.1:7b
  thinking: false
influencer:
  llm: gpt-4o
  verbose: true
researcher:
  llm: github/gpt-4o-mini
"#;

    /// A well-formed document parses with per-agent defaults applied.
    #[test]
    fn parses_sample_config() {
        let config = AgentsConfig::load_from_str(SAMPLE).expect("config");
        assert_eq!(config.agents.len(), 3);
        assert_eq!(config.model_name("coach").expect("coach"), "llama3.1:7b");
        assert!(!config.thinking("coach").expect("coach"));
        assert!(config.thinking("influencer").expect("influencer"));
        assert!(config.binding("influencer").expect("influencer").verbose);
        assert_eq!(
            config.binding("coach").expect("coach").role.as_deref(),
            Some("Senior Career Coach")
        );
    }

    /// An empty document is rejected at load time.
    #[test]
    fn rejects_empty_document() {
        let err = AgentsConfig::load_from_str("{}").unwrap_err();
        assert!(matches!(err, ConfigError::Empty));
    }

    /// A missing `llm` field is a hard configuration error naming the field.
    #[test]
    fn rejects_missing_llm_field() {
        let yaml = "coach:\n  role: Coach\n";
        let err = AgentsConfig::load_from_str(yaml).unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("coach"));
        assert!(msg.contains("llm"));
    }

    /// Lookups for unknown agents surface the agent id.
    #[test]
    fn unknown_agent_is_reported() {
        let config = AgentsConfig::load_from_str(SAMPLE).expect("config");
        let err = config.binding("editor").unwrap_err();
        assert_eq!(format!("{err}"), "unknown agent: editor");
    }

    /// Listing models covers every agent in id order.
    #[test]
    fn models_lists_all_agents() {
        let config = AgentsConfig::load_from_str(SAMPLE).expect("config");
        let models = config.models();
        assert_eq!(
            models.into_iter().collect::<Vec<_>>(),
            vec![
                ("coach", "llama3.1:7b"),
                ("influencer", "gpt-4o"),
                ("researcher", "github/gpt-4o-mini"),
            ]
        );
    }

    /// The project-local path wins when the file exists.
    #[test]
    fn default_path_prefers_project_local_file() {
        let temp = TempDir::new().expect("tmp");
        let config_dir = temp.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).expect("dir");
        let local = config_dir.join(CONFIG_FILE);
        std::fs::write(&local, SAMPLE).expect("write");

        assert_eq!(default_config_path(temp.path()), local);
        let config = AgentsConfig::load_from_path(&local).expect("config");
        assert_eq!(config.agents.len(), 3);
    }
}
