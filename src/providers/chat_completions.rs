//! OpenAI-compatible chat completions provider
//!
//! Talks to any server implementing `POST {api_base}/chat/completions`
//! (Groq, OpenAI, vLLM, llama.cpp server, ...). One call is one attempt;
//! every failure is mapped to a [`BackendCallError`].

use crate::config::ProviderConfig;
use crate::credentials::Secret;
use crate::error::{BackendCallError, Result, ScopechatError};
use crate::providers::{CompletionRequest, CompletionResponse, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat completions API provider
///
/// # Examples
///
/// ```
/// use scopechat::config::ProviderConfig;
/// use scopechat::credentials::Secret;
/// use scopechat::providers::ChatCompletionsProvider;
///
/// let provider =
///     ChatCompletionsProvider::new(&ProviderConfig::default(), Secret::new("gsk_test"));
/// assert!(provider.is_ok());
/// ```
pub struct ChatCompletionsProvider {
    client: Client,
    completions_url: String,
    api_key: Secret,
}

/// Request body for `/chat/completions`
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response body from `/chat/completions`
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

impl ChatCompletionsProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &ProviderConfig, api_key: Secret) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("scopechat/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ScopechatError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        let completions_url = format!(
            "{}/chat/completions",
            config.api_base.trim_end_matches('/')
        );

        tracing::info!("Initialized chat completions provider: url={}", completions_url);

        Ok(Self {
            client,
            completions_url,
            api_key,
        })
    }

    /// Endpoint the provider posts to
    pub fn completions_url(&self) -> &str {
        &self.completions_url
    }

    fn build_body<'a>(request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|t| ChatMessage {
                    role: t.role().as_str(),
                    content: t.content(),
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

/// Extract the first choice's text from a decoded response
fn first_choice(
    response: ChatResponse,
) -> std::result::Result<CompletionResponse, BackendCallError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(BackendCallError::EmptyChoices)?;

    let content = choice
        .message
        .content
        .ok_or_else(|| BackendCallError::Malformed("first choice has no content".to_string()))?;

    Ok(match response.usage {
        Some(usage) => CompletionResponse::with_usage(
            content,
            TokenUsage::new(usage.prompt_tokens, usage.completion_tokens),
        ),
        None => CompletionResponse::new(content),
    })
}

#[async_trait]
impl Provider for ChatCompletionsProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<CompletionResponse, BackendCallError> {
        let body = Self::build_body(request);

        tracing::debug!(
            "Sending completion request: model={}, {} messages",
            request.model,
            body.messages.len()
        );

        let response = self
            .client
            .post(&self.completions_url)
            .bearer_auth(self.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendCallError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendCallError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| BackendCallError::Transport(e.to_string()))?;
        let decoded: ChatResponse =
            serde_json::from_str(&text).map_err(|e| BackendCallError::Malformed(e.to_string()))?;

        let completion = first_choice(decoded)?;
        if let Some(usage) = completion.usage {
            tracing::debug!(
                "Completion usage: model={}, prompt_tokens={}, completion_tokens={}",
                request.model,
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }
        Ok(completion)
    }

    fn name(&self) -> &str {
        "chat_completions"
    }
}
