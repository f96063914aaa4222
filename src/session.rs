//! Per-session turn handling
//!
//! A [`SessionOrchestrator`] owns one conversation. Every input is recorded
//! as a user turn, gated by the domain filter, answered (or refused) and
//! recorded as an assistant turn, so the history always alternates
//! user/assistant.

use crate::completion::{CompletionClient, CompletionOutcome};
use crate::conversation::ConversationHistory;
use crate::domain::DomainSpec;
use crate::error::Result;
use crate::prompts;
use std::sync::Arc;

/// How a reply was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A backend model answered
    Answered {
        /// Model that answered
        model: String,
    },
    /// The input was outside the domain; no backend call was made
    Refused,
    /// Every candidate model failed; the reply is the fallback message
    Unavailable,
}

/// Reply to one user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    /// Text shown to the user and stored as the assistant turn
    pub content: String,
    /// How the text was produced
    pub outcome: TurnOutcome,
}

/// Drives one conversation
pub struct SessionOrchestrator {
    domain: Arc<DomainSpec>,
    client: CompletionClient,
    history: ConversationHistory,
    gate_enabled: bool,
}

impl SessionOrchestrator {
    /// Create a gated session with an empty history
    pub fn new(domain: Arc<DomainSpec>, client: CompletionClient) -> Self {
        Self {
            domain,
            client,
            history: ConversationHistory::new(),
            gate_enabled: true,
        }
    }

    /// Enable or disable the domain gate
    ///
    /// With the gate off every input goes to the backend and relies on the
    /// system prompt alone to stay on topic.
    pub fn with_domain_gate(mut self, enabled: bool) -> Self {
        if !enabled {
            tracing::warn!("Domain gate disabled: all input will be sent to the backend");
        }
        self.gate_enabled = enabled;
        self
    }

    /// Handle one user input and return the reply
    ///
    /// # Errors
    ///
    /// Returns error only if the history invariant is violated, which cannot
    /// happen through this type's public API.
    pub async fn handle_input(&mut self, text: &str) -> Result<TurnReply> {
        self.history.add_user_turn(text);

        let reply = if self.gate_enabled && !self.domain.filter().is_in_domain(text) {
            tracing::debug!("Input outside domain, refusing");
            TurnReply {
                content: self.domain.refusal_message().to_string(),
                outcome: TurnOutcome::Refused,
            }
        } else {
            if let Some(keyword) = self.domain.filter().matched_keyword(text) {
                tracing::debug!("Input matched domain keyword '{}'", keyword);
            }
            let messages = prompts::assemble(&self.domain, &self.history, text);
            match self.client.complete_with_outcome(&messages).await {
                CompletionOutcome::Answered { model, content, .. } => TurnReply {
                    content,
                    outcome: TurnOutcome::Answered { model },
                },
                CompletionOutcome::Exhausted { .. } => TurnReply {
                    content: self.client.fallback_message().to_string(),
                    outcome: TurnOutcome::Unavailable,
                },
            }
        };

        self.history.add_assistant_turn(reply.content.as_str())?;
        Ok(reply)
    }

    /// Forget the conversation
    pub fn clear(&mut self) {
        tracing::info!("Clearing {} turns", self.history.len());
        self.history.clear();
    }

    /// Conversation so far
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Whether the domain gate is active
    pub fn gate_enabled(&self) -> bool {
        self.gate_enabled
    }

    /// Domain this session is restricted to
    pub fn domain(&self) -> &DomainSpec {
        &self.domain
    }

    /// Name of the completion backend
    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    /// Candidate models in fallback order
    pub fn candidates(&self) -> &[String] {
        self.client.candidates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Role, Turn};
    use crate::error::BackendCallError;
    use crate::test_utils::{test_domain, MockProvider};

    fn session(provider: Arc<MockProvider>) -> SessionOrchestrator {
        let client = CompletionClient::new(
            provider,
            vec!["model-a".to_string(), "model-b".to_string()],
            0.5,
            400,
            "Technical difficulties.",
        );
        SessionOrchestrator::new(Arc::new(test_domain()), client)
    }

    #[tokio::test]
    async fn test_in_domain_input_is_answered() {
        let provider = Arc::new(MockProvider::new().answer("model-a", "A smart home is..."));
        let mut session = session(provider.clone());

        let reply = session.handle_input("Kaj je pametni dom?").await.unwrap();

        assert_eq!(reply.content, "A smart home is...");
        assert_eq!(
            reply.outcome,
            TurnOutcome::Answered {
                model: "model-a".to_string()
            }
        );
        assert_eq!(
            session.history().turns(),
            &[
                Turn::user("Kaj je pametni dom?"),
                Turn::assistant("A smart home is...")
            ]
        );

        let request = &provider.requests()[0];
        assert_eq!(request.messages[0].role(), Role::System);
        assert_eq!(request.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_out_of_domain_input_is_refused_without_backend_call() {
        let provider = Arc::new(MockProvider::new().answer("model-a", "unused"));
        let mut session = session(provider.clone());

        let reply = session.handle_input("Kdo je zmagal tekmo?").await.unwrap();

        assert_eq!(reply.content, "Refused.");
        assert_eq!(reply.outcome, TurnOutcome::Refused);
        assert!(provider.requests().is_empty());
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn test_backend_failure_stores_fallback() {
        let provider = Arc::new(
            MockProvider::new()
                .fail("model-a", BackendCallError::EmptyChoices)
                .fail("model-b", BackendCallError::Transport("down".to_string())),
        );
        let mut session = session(provider);

        let reply = session.handle_input("Kaj je chatbot?").await.unwrap();

        assert_eq!(reply.content, "Technical difficulties.");
        assert_eq!(reply.outcome, TurnOutcome::Unavailable);
        assert_eq!(
            session.history().last(),
            Some(&Turn::assistant("Technical difficulties."))
        );
    }

    #[tokio::test]
    async fn test_disabled_gate_sends_everything() {
        let provider = Arc::new(MockProvider::new().answer("model-a", "Off topic answer"));
        let mut session = session(provider.clone()).with_domain_gate(false);
        assert!(!session.gate_enabled());

        let reply = session.handle_input("Kdo je zmagal tekmo?").await.unwrap();

        assert_eq!(reply.content, "Off topic answer");
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_history_alternates_and_clear_resets() {
        let provider = Arc::new(MockProvider::new().answer("model-a", "ok"));
        let mut session = session(provider.clone());

        session.handle_input("ai").await.unwrap();
        session.handle_input("weather").await.unwrap();
        session.handle_input("chatbot").await.unwrap();

        let roles: Vec<Role> = session.history().turns().iter().map(Turn::role).collect();
        assert_eq!(
            roles,
            vec![
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant
            ]
        );

        // the third request carries the whole prior conversation
        let last = provider.requests().pop().unwrap();
        assert_eq!(last.messages.len(), 1 + 5);

        session.clear();
        assert!(session.history().is_empty());
        session.clear();
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_clear_with_unanswered_user_turn() {
        let provider = Arc::new(MockProvider::new().answer("model-a", "ok"));
        let mut session = session(provider.clone());

        session.handle_input("Kaj je chatbot?").await.unwrap();
        session.history.add_user_turn("Kaj je ai?");
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.history().last().map(Turn::role), Some(Role::User));

        session.clear();
        assert!(session.history().is_empty());

        session.handle_input("Kaj je avtomatizacija?").await.unwrap();
        assert_eq!(
            session.history().turns(),
            &[Turn::user("Kaj je avtomatizacija?"), Turn::assistant("ok")]
        );
        let last = provider.requests().pop().unwrap();
        assert_eq!(last.messages.len(), 2);
    }
}
