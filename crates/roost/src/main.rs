// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Roost - a Discord gateway for private LLM chat sessions.
//!
//! This is the binary entry point for the Roost gateway.

use clap::{Parser, Subcommand};
use roost_config::RoostConfig;

mod serve;
mod shutdown;

/// Roost - a Discord gateway for private LLM chat sessions.
#[derive(Parser, Debug)]
#[command(name = "roost", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Roost gateway.
    Serve,
    /// Validate the configuration and report what is set.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match roost_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            for e in &errors {
                eprintln!("roost: config error: {e}");
            }
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("roost: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig) => check_config(&config),
        None => println!("roost: use --help for available commands"),
    }
}

fn check_config(config: &RoostConfig) {
    let presence = |set: bool| if set { "set" } else { "missing" };
    println!("configuration OK");
    println!("  default model:       {}", config.agent.default_model);
    println!("  database:            {}", config.storage.database_path);
    println!(
        "  discord token:       {}",
        presence(config.discord.token.is_some())
    );
    println!(
        "  entry channel:       {}",
        config
            .discord
            .entry_channel_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "unset (use !setentrychannel)".to_string())
    );
    println!(
        "  gemini api key:      {}",
        presence(config.gemini.api_key.is_some())
    );
    println!(
        "  openrouter api key:  {} (model {})",
        presence(config.openrouter.api_key.is_some()),
        config.openrouter.model
    );
    println!(
        "  inactivity timeout:  {} hours",
        config.reaper.inactivity_timeout_hours
    );
}
