//! Scopechat - domain-restricted conversational assistant library
//!
//! This library answers questions about one configured topic through a
//! remote LLM completion service and refuses everything else.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `domain`: Topic definition and keyword admission filter
//! - `conversation`: Turns and the per-session append-only history
//! - `prompts`: System prompt and request assembly
//! - `providers`: Completion backend abstraction and HTTP implementation
//! - `completion`: Ordered model fallback
//! - `session`: Per-session turn handling
//! - `credentials`: API key resolution (keyring, then environment)
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface and handlers
//!
//! # Example
//!
//! ```no_run
//! use scopechat::commands::build_session;
//! use scopechat::config::Config;
//! use scopechat::credentials::{default_providers, resolve_credential};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let api_key = resolve_credential(&default_providers(&config.provider))?;
//!     let mut session = build_session(&config, api_key)?;
//!     let reply = session.handle_input("Kaj je pametni dom?").await?;
//!     println!("{}", reply.content);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod conversation;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use completion::{CompletionClient, CompletionOutcome};
pub use config::Config;
pub use conversation::{ConversationHistory, Role, Turn};
pub use domain::{DomainFilter, DomainSpec};
pub use error::{Result, ScopechatError};
pub use session::{SessionOrchestrator, TurnOutcome, TurnReply};

#[cfg(test)]
pub mod test_utils;
