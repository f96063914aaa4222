//! Scopechat - domain-restricted conversational assistant
//!
#![doc = "Main entry point for the Scopechat CLI."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scopechat::cli::{Cli, Commands};
use scopechat::commands;
use scopechat::config::Config;
use scopechat::credentials::{default_providers, resolve_credential};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Chat => {
            let api_key = resolve_credential(&default_providers(&config.provider))?;
            commands::chat::run_chat(config, api_key).await?;
            Ok(())
        }
        Commands::Ask { question } => {
            let api_key = resolve_credential(&default_providers(&config.provider))?;
            commands::ask::run_ask(config, api_key, question).await?;
            Ok(())
        }
        Commands::Check { text } => {
            commands::check::run_check(&config, &text)?;
            Ok(())
        }
        Commands::Auth { key } => {
            commands::auth::run_auth(&config, key)?;
            Ok(())
        }
        Commands::Models { json } => {
            commands::models::list_models(&config, json)?;
            Ok(())
        }
    }
}

/// Logs go to stderr so command output on stdout stays clean
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "scopechat=debug"
    } else {
        "scopechat=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
