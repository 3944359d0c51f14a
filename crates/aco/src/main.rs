// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aco - a chat relay that answers through a generative-text backend.
//!
//! This is the binary entry point.

mod console;
mod shell;

use aco_config::model::AcoConfig;
use clap::{Parser, Subcommand};

/// Aco - a chat relay that answers through a generative-text backend.
#[derive(Parser, Debug)]
#[command(name = "aco", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Chat with the relay from the terminal.
    Shell,
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match aco_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            aco_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    match cli.command {
        Some(Commands::Shell) => {
            if let Err(e) = shell::run_shell(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match render_config(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("error: failed to render configuration: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("aco: use --help for available commands");
        }
    }
}

/// Renders the configuration as TOML with the API key masked.
fn render_config(config: &AcoConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.gemini.api_key.is_some() {
        shown.gemini.api_key = Some("********".to_string());
    }
    toml::to_string_pretty(&shown)
}

/// Installs the fmt subscriber. `RUST_LOG` overrides `agent.log_level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "aco={log_level},aco_relay={log_level},aco_gemini={log_level},aco_config={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
