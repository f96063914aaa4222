/*!
Command handlers for the CLI

This module provides the handlers invoked by the CLI entrypoint:

- `chat`  : Interactive session
- `ask`   : One gated question, answer printed to stdout
- `check` : Domain filter only, no backend and no credential
- `auth`  : Store the API key in the system keyring
- `models`: Candidate models in fallback order

Handlers that talk to the backend receive an already resolved [`Secret`].
*/

use crate::completion::CompletionClient;
use crate::config::Config;
use crate::conversation::{Role, Turn};
use crate::credentials::Secret;
use crate::domain::DomainSpec;
use crate::error::Result;
use crate::providers::create_provider;
use crate::session::{SessionOrchestrator, TurnOutcome, TurnReply};
use colored::Colorize;
use std::sync::Arc;

// Special commands parser for the interactive session
pub mod special_commands;

/// Build a session from configuration and a resolved API key
///
/// # Errors
///
/// Returns error if the HTTP client cannot be created
pub fn build_session(config: &Config, api_key: Secret) -> Result<SessionOrchestrator> {
    let domain = Arc::new(DomainSpec::from_config(&config.domain));
    let provider = create_provider(&config.provider, api_key)?;
    let client = CompletionClient::from_config(provider, &config.provider, &config.domain);
    Ok(SessionOrchestrator::new(domain, client).with_domain_gate(config.chat.domain_gate))
}

/// Render one stored turn for the terminal
fn render_turn(turn: &Turn) {
    match turn.role() {
        Role::User => println!("{} {}", "you>".cyan().bold(), turn.content()),
        Role::Assistant => println!("{} {}\n", "bot>".green().bold(), turn.content()),
        Role::System => {}
    }
}

/// Render a fresh reply, tinted by how it was produced
fn render_reply(reply: &TurnReply) {
    match &reply.outcome {
        TurnOutcome::Answered { model } => {
            tracing::debug!("Reply from {}", model);
            println!("\n{}\n", reply.content);
        }
        TurnOutcome::Refused => println!("\n{}\n", reply.content.yellow()),
        TurnOutcome::Unavailable => println!("\n{}\n", reply.content.red()),
    }
}

// Chat command handler
pub mod chat {
    //! Interactive session handler.
    //!
    //! Builds one [`SessionOrchestrator`] and runs a readline loop that
    //! submits each line to it.

    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use super::*;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start the interactive session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `api_key` - Resolved backend credential
    pub async fn run_chat(config: Config, api_key: Secret) -> Result<()> {
        tracing::info!("Starting interactive chat session");

        let mut session = build_session(&config, api_key)?;
        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&config);

        loop {
            match rl.readline(&config.chat.prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    rl.add_history_entry(trimmed)?;

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::Clear) => {
                            session.clear();
                            println!("{}\n", "Conversation cleared.".dimmed());
                            continue;
                        }
                        Ok(SpecialCommand::History) => {
                            if session.history().is_empty() {
                                println!("{}\n", "No conversation yet.".dimmed());
                            }
                            for turn in session.history().turns() {
                                render_turn(turn);
                            }
                            continue;
                        }
                        Ok(SpecialCommand::ShowStatus) => {
                            print_status(&session);
                            continue;
                        }
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {}
                        Err(e) => {
                            eprintln!("{}\n", e.to_string().red());
                            continue;
                        }
                    }

                    let reply = session.handle_input(trimmed).await?;
                    render_reply(&reply);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome_banner(config: &Config) {
        println!("\n{}", config.chat.title.bold());
        println!("{}\n", config.chat.caption.dimmed());
        if !config.chat.domain_gate {
            println!(
                "{}\n",
                "Domain gate is off: every question is sent to the model.".yellow()
            );
        }
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    fn print_status(session: &SessionOrchestrator) {
        let gate = if session.gate_enabled() {
            "on".green()
        } else {
            "off".yellow()
        };
        println!();
        println!("Conversation Size: {} turns", session.history().len());
        println!("Domain Gate:       {}", gate);
        println!("Keywords:          {}", session.domain().filter().keywords().len());
        println!("Backend:           {}", session.provider_name());
        println!("Candidate Models:  {}", session.candidates().join(" -> "));
        println!();
    }
}

// One-shot question handler
pub mod ask {
    use super::*;

    /// Ask one question in a fresh session and print the reply
    pub async fn run_ask(config: Config, api_key: Secret, question: String) -> Result<()> {
        let mut session = build_session(&config, api_key)?;
        let reply = session.handle_input(&question).await?;
        match reply.outcome {
            TurnOutcome::Answered { model } => {
                tracing::info!("Answered by {}", model);
            }
            TurnOutcome::Refused => tracing::info!("Question refused as out of domain"),
            TurnOutcome::Unavailable => tracing::warn!("No model could answer"),
        }
        println!("{}", reply.content);
        Ok(())
    }
}

// Domain check handler
pub mod check {
    use super::*;

    /// Classify `text` against the configured keywords
    ///
    /// Prints `in domain (matched: <keyword>)` or `out of domain`.
    pub fn run_check(config: &Config, text: &str) -> Result<()> {
        let domain = DomainSpec::from_config(&config.domain);
        match domain.filter().matched_keyword(text) {
            Some(keyword) => println!("in domain (matched: {})", keyword),
            None => println!("out of domain"),
        }
        Ok(())
    }
}

// Credential storage handler
pub mod auth {
    use super::*;
    use crate::credentials::store_credential;
    use std::io::BufRead;

    /// Store an API key in the system keyring
    ///
    /// Reads one line from stdin when `key` is not given.
    pub fn run_auth(config: &Config, key: Option<String>) -> Result<()> {
        let key = match key {
            Some(key) => key,
            None => {
                eprintln!("Paste the {} value and press Enter:", config.provider.api_key_env);
                let mut line = String::new();
                std::io::stdin().lock().read_line(&mut line)?;
                line.trim().to_string()
            }
        };

        store_credential(&config.provider, &Secret::new(key))?;
        println!(
            "API key stored in the system keyring (service: {}, user: {})",
            crate::credentials::KEYRING_SERVICE,
            config.provider.api_key_env
        );
        Ok(())
    }
}

// Candidate model listing handler
pub mod models {
    use super::*;

    /// Print candidate models in the order they are tried
    pub fn list_models(config: &Config, json: bool) -> Result<()> {
        let models: Vec<&str> = config
            .provider
            .candidate_models
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .collect();

        if json {
            println!("{}", serde_json::to_string_pretty(&models)?);
            return Ok(());
        }

        println!("\nCandidate models (tried in order)\n");
        for (i, model) in models.iter().enumerate() {
            println!("  {}. {}", i + 1, model);
        }
        println!();
        Ok(())
    }
}
