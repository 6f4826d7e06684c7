//! Command-line entry point for knowledge maintenance and model inspection.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use crewline_rs_config::{AgentsConfig, default_config_path};
use crewline_rs_knowledge::{DEFAULT_SIMILARITY_THRESHOLD, KnowledgeStore, ResetScope};
use crewline_rs_llm::{Credentials, LocalServer, ModelResolver, Provider, classify};
use log::debug;
use std::path::PathBuf;

/// Command-line options for the crewline utility.
#[derive(Parser)]
#[command(name = "crewline", about = "Model resolution and knowledge tracking for content crews")]
struct Cli {
    /// Path to agents.yaml (defaults to config/agents.yaml in the cwd).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Project root holding the knowledge directory.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List configured agents with their model, provider, and thinking flag.
    Models,
    /// Check a candidate topic against previously written articles.
    Check {
        topic: String,
        #[arg(long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
        threshold: f64,
    },
    /// Print knowledge store statistics.
    Stats,
    /// Reset knowledge collections back to their empty state.
    Reset {
        #[arg(value_enum)]
        scope: Scope,
        /// Show statistics before and after the reset.
        #[arg(long)]
        stats: bool,
    },
    /// Probe whether the local model server is reachable.
    Probe {
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Unload models from the local server (all configured local models by default).
    Unload {
        models: Vec<String>,
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Scope {
    Search,
    Articles,
    All,
}

impl From<Scope> for ResetScope {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Search => ResetScope::Search,
            Scope::Articles => ResetScope::Articles,
            Scope::All => ResetScope::All,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    crewline_rs::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Models => {
            let config = load_config(&cli)?;
            let resolver = ModelResolver::new(config, Credentials::from_env());
            for (agent, _) in resolver.config().models() {
                let info = resolver.describe(agent)?;
                println!(
                    "{agent}: {} ({}) (thinking: {})",
                    info.model_name, info.provider, info.thinking
                );
            }
        }
        Command::Check { topic, threshold } => {
            let store = KnowledgeStore::new(&cli.root)?;
            let check = store.check_similarity(&topic, threshold);
            println!("covered: {}", check.covered);
            for similar in &check.similar_articles {
                println!(
                    "  {:.2}  {}  ({})",
                    similar.similarity, similar.topic, similar.timestamp
                );
            }
            println!("{}", check.recommendation);
        }
        Command::Stats => {
            let store = KnowledgeStore::new(&cli.root)?;
            let stats = store.stats();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Reset { scope, stats } => {
            let store = KnowledgeStore::new(&cli.root)?;
            if stats {
                println!("before: {}", serde_json::to_string_pretty(&store.stats())?);
            }
            if !store.reset(scope.into()) {
                bail!("knowledge reset failed");
            }
            if stats {
                println!("after: {}", serde_json::to_string_pretty(&store.stats())?);
            }
        }
        Command::Probe { base_url } => {
            let server = local_server(base_url);
            if server.is_reachable().await {
                println!("local model server reachable at {}", server.base_url());
            } else {
                bail!("local model server not reachable at {}", server.base_url());
            }
        }
        Command::Unload { ref models, ref base_url } => {
            let server = local_server(base_url.clone());
            let models = if models.is_empty() {
                let config = load_config(&cli)?;
                config
                    .models()
                    .values()
                    .filter(|model| classify(model) == Provider::Local)
                    .map(|model| model.to_string())
                    .collect()
            } else {
                models.clone()
            };
            let mut failed = 0usize;
            for model in &models {
                debug!("unloading model: {model}");
                if !server.unload(model).await {
                    failed += 1;
                }
            }
            println!("unloaded {}/{} models", models.len() - failed, models.len());
            if failed > 0 {
                bail!("{failed} model(s) failed to unload");
            }
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<AgentsConfig> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| default_config_path(&cli.root));
    AgentsConfig::load_from_path(&path)
        .with_context(|| format!("loading agents config from {}", path.display()))
}

fn local_server(base_url: Option<String>) -> LocalServer {
    match base_url {
        Some(url) => LocalServer::new(url),
        None => LocalServer::default(),
    }
}
