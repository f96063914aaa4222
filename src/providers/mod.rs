//! Provider module for Scopechat
//!
//! This module contains the completion backend abstraction and the
//! OpenAI-compatible chat completions implementation.

pub mod base;
pub mod chat_completions;

pub use base::{CompletionRequest, CompletionResponse, Provider, TokenUsage};
pub use chat_completions::ChatCompletionsProvider;

use crate::config::ProviderConfig;
use crate::credentials::Secret;
use crate::error::Result;
use std::sync::Arc;

/// Create the completion backend described by configuration
///
/// The returned handle is shared read-only across sessions.
///
/// # Errors
///
/// Returns error if the HTTP client cannot be initialized
pub fn create_provider(config: &ProviderConfig, api_key: Secret) -> Result<Arc<dyn Provider>> {
    Ok(Arc::new(ChatCompletionsProvider::new(config, api_key)?))
}
