//! Test utilities for Scopechat
//!
//! Provides a scripted [`MockProvider`] and small fixtures shared by the unit
//! tests.

use crate::config::Config;
use crate::domain::DomainSpec;
use crate::error::BackendCallError;
use crate::providers::{CompletionRequest, CompletionResponse, Provider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Provider that answers from a per-model script and records every request
///
/// Models without a scripted result fail with a transport error.
#[derive(Default)]
pub struct MockProvider {
    script: HashMap<String, Result<String, BackendCallError>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    /// Create a provider with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `model` to answer with `content`
    pub fn answer(mut self, model: &str, content: &str) -> Self {
        self.script
            .insert(model.to_string(), Ok(content.to_string()));
        self
    }

    /// Script `model` to fail with `error`
    pub fn fail(mut self, model: &str, error: BackendCallError) -> Self {
        self.script.insert(model.to_string(), Err(error));
        self
    }

    /// Every request seen so far, in order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Models attempted so far, in order
    pub fn attempted_models(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.model).collect()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, BackendCallError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.script.get(&request.model) {
            Some(Ok(content)) => Ok(CompletionResponse::new(content.clone())),
            Some(Err(error)) => Err(error.clone()),
            None => Err(BackendCallError::Transport(format!(
                "no scripted response for {}",
                request.model
            ))),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Small domain about smart homes, used across tests
pub fn test_domain() -> DomainSpec {
    DomainSpec::new(
        "You are a smart home assistant.",
        "Answer briefly.",
        ["pametni dom", "chatbot", "ai", "avtomatizacija"],
        "Refused.",
    )
}

/// Default configuration with a short candidate list
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.provider.candidate_models = vec!["model-a".to_string(), "model-b".to_string()];
    config
}

/// Assert that an anyhow error's message contains `expected`
pub fn assert_error_contains<T: std::fmt::Debug>(result: anyhow::Result<T>, expected: &str) {
    match result {
        Ok(value) => panic!("expected error containing '{}', got Ok({:?})", expected, value),
        Err(e) => assert!(
            e.to_string().contains(expected),
            "error '{}' does not contain '{}'",
            e,
            expected
        ),
    }
}
