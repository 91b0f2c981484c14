//! Interactive terminal chat.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tradbot_engine::{Engine, GOODBYE_REPLY, RuleTable};

const BANNER: &str = "Simple Traditional Chatbot\n\
    Type 'help' for capabilities, 'order pizza' to start a demo dialog, 'quit' to exit.\n";

/// Run the `chat` subcommand on stdin/stdout.
pub async fn cmd_chat(rules: Arc<RuleTable>, seed: Option<u64>) -> Result<()> {
    let engine = match seed {
        Some(seed) => Engine::with_seed(rules, seed),
        None => Engine::new(rules),
    }
    .context("failed to build dialog engine")?;

    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n{GOODBYE_REPLY}");
            std::process::exit(0);
        }
    });

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(engine, stdin.lock(), stdout.lock()).context("terminal I/O failed")
}

/// Drive one conversation over `input`, writing the banner, prompts and
/// replies to `output`.  Stops on end of input or an exit command.
pub fn run_session<R: BufRead, W: Write>(
    mut engine: Engine,
    mut input: R,
    mut output: W,
) -> io::Result<()> {
    writeln!(output, "{BANNER}")?;

    let mut line_buf = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        line_buf.clear();
        if input.read_line(&mut line_buf)? == 0 {
            writeln!(output, "\n{GOODBYE_REPLY}")?;
            info!("EOF received, exiting");
            break;
        }

        let reply = engine.respond_with_route(&line_buf);
        writeln!(output, "{}", reply.text)?;

        if reply.is_exit() {
            info!("user requested exit");
            break;
        }
    }

    Ok(())
}
