//! Base provider trait and common types for Scopechat
//!
//! This module defines the [`Provider`] trait that completion backends
//! implement, along with the per-attempt request and response types.

use crate::conversation::Turn;
use crate::error::BackendCallError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single completion attempt against one model
///
/// Constructed per attempt by the
/// [`CompletionClient`](crate::completion::CompletionClient) and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Model identifier for this attempt
    pub model: String,
    /// System turn followed by the conversation
    pub messages: Vec<Turn>,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a new request
    ///
    /// # Examples
    ///
    /// ```
    /// use scopechat::conversation::Turn;
    /// use scopechat::providers::CompletionRequest;
    ///
    /// let request = CompletionRequest::new("llama3-8b-8192", vec![Turn::user("Hi")], 0.5, 400);
    /// assert_eq!(request.model, "llama3-8b-8192");
    /// assert_eq!(request.max_tokens, 400);
    /// ```
    pub fn new(
        model: impl Into<String>,
        messages: Vec<Turn>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature,
            max_tokens,
        }
    }
}

/// Token usage information from a completion
///
/// Tracks the number of tokens used in prompts and completions,
/// as reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use scopechat::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Successful completion: the first choice's text plus optional usage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Generated reply text
    pub content: String,
    /// Token usage, when the backend reports it
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a response without usage information
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }

    /// Create a response with token usage
    pub fn with_usage(content: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            content: content.into(),
            usage: Some(usage),
        }
    }
}

/// Completion backend
///
/// One call is one attempt against one model. Failures are returned as
/// [`BackendCallError`] values; implementations must not retry internally,
/// since fallback across models is the caller's job.
///
/// # Examples
///
/// ```no_run
/// use async_trait::async_trait;
/// use scopechat::error::BackendCallError;
/// use scopechat::providers::{CompletionRequest, CompletionResponse, Provider};
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     async fn complete(
///         &self,
///         request: &CompletionRequest,
///     ) -> Result<CompletionResponse, BackendCallError> {
///         let last = request.messages.last().ok_or(BackendCallError::EmptyChoices)?;
///         Ok(CompletionResponse::new(last.content()))
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Issues one completion request
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<CompletionResponse, BackendCallError>;

    /// Short name used in logs
    fn name(&self) -> &str {
        "provider"
    }
}
