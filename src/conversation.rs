//! Session-scoped conversation history
//!
//! A [`ConversationHistory`] is an append-only log of [`Turn`]s owned by a
//! single session. System instructions are never stored here; they are
//! injected at request-assembly time by [`crate::prompts`].

use crate::error::{Result, ScopechatError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the conversation
    System,
    /// The human asking questions
    User,
    /// The assistant's replies
    Assistant,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a conversation
///
/// # Examples
///
/// ```
/// use scopechat::conversation::{Role, Turn};
///
/// let turn = Turn::user("Kaj je pametni dom?");
/// assert_eq!(turn.role(), Role::User);
/// assert_eq!(turn.content(), "Kaj je pametni dom?");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    /// Create a turn with an explicit role
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system turn
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Role of the author
    pub fn role(&self) -> Role {
        self.role
    }

    /// Text of the turn
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered, append-only log of user and assistant turns
///
/// Invariants:
/// - never contains a `system` turn
/// - every `assistant` turn directly follows a `user` turn
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    /// Creates an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user turn
    pub fn add_user_turn(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
    }

    /// Appends an assistant turn answering the latest user turn
    ///
    /// # Errors
    ///
    /// Returns [`ScopechatError::Conversation`] if the last stored turn is not
    /// a user turn.
    ///
    /// # Examples
    ///
    /// ```
    /// use scopechat::conversation::ConversationHistory;
    ///
    /// let mut history = ConversationHistory::new();
    /// assert!(history.add_assistant_turn("orphan").is_err());
    ///
    /// history.add_user_turn("Kaj je AI?");
    /// assert!(history.add_assistant_turn("Umetna inteligenca ...").is_ok());
    /// assert_eq!(history.len(), 2);
    /// ```
    pub fn add_assistant_turn(&mut self, content: impl Into<String>) -> Result<()> {
        if self.last().map(Turn::role) != Some(Role::User) {
            return Err(ScopechatError::Conversation(
                "assistant turn must follow a user turn".to_string(),
            )
            .into());
        }
        self.turns.push(Turn::assistant(content));
        Ok(())
    }

    /// All turns in chronological order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Most recent turn
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of stored turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drops every turn
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
