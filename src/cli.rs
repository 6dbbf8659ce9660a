//! Command-line interface definition for Gramcheck
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for managing stored chat sessions and an
//! interactive chat loop.

use clap::{Parser, Subcommand};

/// Gramcheck - grammar assistant chat sessions
///
/// Manage persisted chat sessions and draft text for grammar checking.
#[derive(Parser, Debug, Clone)]
#[command(name = "gramcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging and storage diagnostics
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the storage location (directory or database path)
    #[arg(long, env = "GRAMCHECK_STORAGE_PATH")]
    pub storage_path: Option<String>,

    /// Override the storage backend (file, sqlite, sled, memory)
    #[arg(long)]
    pub backend: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Gramcheck
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Manage stored chat sessions
    Sessions {
        /// Session subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Start an interactive chat in the current (or given) session
    Chat {
        /// Session to resume; a new one is created when omitted and none is current
        #[arg(short, long)]
        session: Option<String>,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List stored sessions
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one session with its messages
    Show {
        /// Session identifier
        id: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Create an empty session
    New {
        /// Session title
        #[arg(short, long)]
        title: Option<String>,

        /// Make the new session current
        #[arg(long)]
        select: bool,
    },

    /// Change a session's title
    Rename {
        /// Session identifier
        id: String,

        /// New title
        title: String,
    },

    /// Delete a session
    Delete {
        /// Session identifier
        id: String,
    },

    /// Append a message to a session
    AddMessage {
        /// Session identifier
        id: String,

        /// Message author (user, assistant, system)
        #[arg(short, long, default_value = "user")]
        role: String,

        /// Message text
        content: String,
    },

    /// Make a session current
    Use {
        /// Session identifier
        id: String,
    },

    /// Show the current session identifier
    Current,

    /// Remove all stored sessions and the current-session pointer
    Clear,

    /// Show storage size and session count
    Info,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
