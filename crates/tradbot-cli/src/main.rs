//! CLI entry point for tradbot.
//!
//! This binary provides the `tradbot` command with subcommands for chatting
//! on the terminal, serving the HTTP API, and checking a rule file.

mod check;
mod cli;
mod helpers;
mod repl;
mod settings;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tradbot_engine::RuleTable;
use tradbot_web::WebServer;

use crate::cli::{Cli, Commands};
use crate::helpers::init_tracing;
use crate::settings::load_settings;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = load_settings(&cli.config);

    match cli.command {
        Commands::Chat { rules, seed } => {
            init_tracing("warn");
            let rules = load_rules(&settings.rules_path(rules))?;
            repl::cmd_chat(rules, seed).await
        }
        Commands::Serve { rules, bind, port } => {
            init_tracing("info");
            let rules = load_rules(&settings.rules_path(rules))?;
            let mut config = settings.web;
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            WebServer::new(config, rules)
                .start()
                .await
                .context("web server failed")
        }
        Commands::Check { rules } => {
            init_tracing("warn");
            let path = settings.rules_path(rules);
            let rules = load_rules(&path)?;
            println!("{}: ok", path.display());
            check::write_report(&rules, std::io::stdout().lock())
                .context("failed to write report")
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_rules(path: &Path) -> Result<Arc<RuleTable>> {
    let rules = RuleTable::from_path(path)
        .with_context(|| format!("failed to load rules from {}", path.display()))?;
    info!(path = %path.display(), intents = rules.len(), "rules loaded");
    Ok(Arc::new(rules))
}
