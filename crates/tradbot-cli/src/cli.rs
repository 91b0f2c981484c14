//! CLI argument definitions for tradbot.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tradbot -- a rule-based chatbot with a pizza ordering dialog.
#[derive(Parser)]
#[command(
    name = "tradbot",
    version,
    about = "tradbot -- rule-based chatbot",
    long_about = "A traditional chatbot that answers from an ordered table of regex intents \
                  and walks users through a pizza order with a finite-state dialog."
)]
pub struct Cli {
    /// Runtime settings file.
    #[arg(long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chat on the terminal.
    Chat {
        /// Rule file to load (overrides TRADBOT_RULES and the settings file).
        #[arg(long, short)]
        rules: Option<PathBuf>,

        /// Seed the response picker for reproducible replies.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Start the HTTP chat API.
    Serve {
        /// Rule file to load (overrides TRADBOT_RULES and the settings file).
        #[arg(long, short)]
        rules: Option<PathBuf>,

        /// Address to bind the HTTP server to.
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on.
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Load a rule file and list its intents in match order.
    Check {
        /// Rule file to load (overrides TRADBOT_RULES and the settings file).
        #[arg(long, short)]
        rules: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_chat_with_seed() {
        let cli = Cli::try_parse_from(["tradbot", "chat", "--seed", "7"]).unwrap();
        match cli.command {
            Commands::Chat { rules, seed } => {
                assert!(rules.is_none());
                assert_eq!(seed, Some(7));
            }
            _ => panic!("expected chat"),
        }
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
    }

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::try_parse_from([
            "tradbot", "serve", "--bind", "0.0.0.0", "-p", "8080", "--rules", "r.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve { rules, bind, port } => {
                assert_eq!(rules, Some(PathBuf::from("r.json")));
                assert_eq!(bind.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
            }
            _ => panic!("expected serve"),
        }
    }
}
