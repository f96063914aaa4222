//! Sequential model fallback over a single completion backend
//!
//! [`CompletionClient`] tries each candidate model in order and returns the
//! first successful reply. Failed attempts are logged and skipped. When every
//! candidate fails the client answers with a fixed fallback message instead
//! of an error.

use crate::config::{DomainConfig, ProviderConfig};
use crate::conversation::Turn;
use crate::error::BackendCallError;
use crate::providers::{CompletionRequest, Provider};
use std::sync::Arc;

/// One failed attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    /// Model that was tried
    pub model: String,
    /// Why it failed
    pub error: BackendCallError,
}

/// Result of running the whole candidate list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// A candidate produced a reply
    Answered {
        /// Model that answered
        model: String,
        /// Reply text
        content: String,
        /// Attempts that failed before this one
        attempts: Vec<FailedAttempt>,
    },
    /// Every candidate failed (or there were none)
    Exhausted {
        /// All failed attempts, in order
        attempts: Vec<FailedAttempt>,
    },
}

/// Completion client with ordered model fallback
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use scopechat::completion::CompletionClient;
/// use scopechat::conversation::Turn;
/// use scopechat::error::BackendCallError;
/// use scopechat::providers::{CompletionRequest, CompletionResponse, Provider};
///
/// struct Down;
///
/// #[async_trait]
/// impl Provider for Down {
///     async fn complete(
///         &self,
///         _: &CompletionRequest,
///     ) -> Result<CompletionResponse, BackendCallError> {
///         Err(BackendCallError::Transport("connection refused".to_string()))
///     }
/// }
///
/// let models = vec!["m1".to_string(), "m2".to_string()];
/// let client = CompletionClient::new(Arc::new(Down), models, 0.5, 400, "Sorry.");
/// let reply = tokio_test::block_on(client.complete(&[Turn::user("Hi")]));
/// assert_eq!(reply, "Sorry.");
/// ```
#[derive(Clone)]
pub struct CompletionClient {
    provider: Arc<dyn Provider>,
    candidates: Vec<String>,
    temperature: f32,
    max_tokens: u32,
    fallback_message: String,
}

impl CompletionClient {
    /// Create a client over `provider` trying `candidates` in order
    pub fn new(
        provider: Arc<dyn Provider>,
        candidates: Vec<String>,
        temperature: f32,
        max_tokens: u32,
        fallback_message: impl Into<String>,
    ) -> Self {
        let candidates = candidates
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        Self {
            provider,
            candidates,
            temperature,
            max_tokens,
            fallback_message: fallback_message.into(),
        }
    }

    /// Create a client from configuration
    pub fn from_config(
        provider: Arc<dyn Provider>,
        provider_config: &ProviderConfig,
        domain_config: &DomainConfig,
    ) -> Self {
        Self::new(
            provider,
            provider_config.candidate_models.clone(),
            provider_config.temperature,
            provider_config.max_tokens,
            domain_config.fallback_message.trim(),
        )
    }

    /// Candidate models in the order they are tried
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Name of the backend, as reported by the provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Text returned when every candidate fails
    pub fn fallback_message(&self) -> &str {
        &self.fallback_message
    }

    /// Try each candidate in order and report what happened
    pub async fn complete_with_outcome(&self, messages: &[Turn]) -> CompletionOutcome {
        let mut attempts = Vec::new();

        for model in &self.candidates {
            let request = CompletionRequest::new(
                model.as_str(),
                messages.to_vec(),
                self.temperature,
                self.max_tokens,
            );

            match self.provider.complete(&request).await {
                Ok(response) => {
                    tracing::info!(
                        "Model {} answered via {} after {} failed attempt(s)",
                        model,
                        self.provider.name(),
                        attempts.len()
                    );
                    return CompletionOutcome::Answered {
                        model: model.clone(),
                        content: response.content,
                        attempts,
                    };
                }
                Err(error) => {
                    tracing::warn!(
                        "Model {} failed via {}: {}",
                        model,
                        self.provider.name(),
                        error
                    );
                    attempts.push(FailedAttempt {
                        model: model.clone(),
                        error,
                    });
                }
            }
        }

        tracing::error!(
            "All {} candidate model(s) failed, using fallback reply",
            self.candidates.len()
        );
        CompletionOutcome::Exhausted { attempts }
    }

    /// Reply text for `messages`; never fails
    ///
    /// Returns the first candidate's reply that succeeds, or the fallback
    /// message if none does.
    pub async fn complete(&self, messages: &[Turn]) -> String {
        match self.complete_with_outcome(messages).await {
            CompletionOutcome::Answered { content, .. } => content,
            CompletionOutcome::Exhausted { .. } => self.fallback_message.clone(),
        }
    }
}
