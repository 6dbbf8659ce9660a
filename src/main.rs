//! Gramcheck - grammar assistant chat sessions
//!
#![doc = "Main entry point for the Gramcheck command-line front end."]

use anyhow::Result;

use gramcheck::cli::{Cli, Commands};
use gramcheck::commands;
use gramcheck::config::Config;
use gramcheck::devlog::init_tracing;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Initialize tracing once the logging configuration is known
    init_tracing(&config.logging)?;
    tracing::debug!(backend = %config.storage.backend, "Configuration loaded");

    let store = commands::open_session_store(&config)?;

    match cli.command {
        Commands::Sessions { command } => {
            tracing::debug!("Starting sessions command");
            commands::sessions::handle_sessions(&store, command)?;
            Ok(())
        }
        Commands::Chat { session } => {
            if let Some(id) = &session {
                tracing::debug!("Resuming session: {}", id);
            }
            commands::chat::run_chat(&store, &config, session)?;
            Ok(())
        }
    }
}
