//! Command-line interface definition for Scopechat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions, domain
//! checks, credential storage, and candidate model listing.

use clap::{Parser, Subcommand};

/// Scopechat - domain-restricted conversational assistant
///
/// Answers questions about a single configured topic using a remote LLM
/// completion service, and politely refuses everything else.
#[derive(Parser, Debug, Clone)]
#[command(name = "scopechat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the candidate model list (comma separated, tried in order)
    #[arg(long = "model", value_delimiter = ',', global = true)]
    pub models: Vec<String>,

    /// Forward every question to the backend, skipping the keyword gate
    #[arg(long, global = true)]
    pub no_gate: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Scopechat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Ask a single question and print the answer
    Ask {
        /// The question to ask
        question: String,
    },

    /// Check whether a text would be admitted by the domain filter
    Check {
        /// Text to classify
        text: String,
    },

    /// Store the API key in the system keyring
    Auth {
        /// API key to store; read from stdin when omitted
        #[arg(long)]
        key: Option<String>,
    },

    /// List candidate models in fallback order
    Models {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            models: Vec::new(),
            no_gate: false,
            command: Commands::Models { json: false },
        }
    }
}
