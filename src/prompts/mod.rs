//! Request assembly for the completion backend
//!
//! The system prompt is derived from the [`DomainSpec`] and prepended to the
//! stored history on every request. It is never written into the history
//! itself.

use crate::conversation::{ConversationHistory, Role, Turn};
use crate::domain::DomainSpec;

/// Builds the system prompt for a domain
///
/// The prompt is the domain description followed by a blank line and the
/// answering rules.
///
/// # Examples
///
/// ```
/// use scopechat::domain::DomainSpec;
/// use scopechat::prompts::build_system_prompt;
///
/// let domain = DomainSpec::new("Garden helper.", "Answer briefly.", ["tomato"], "No.");
/// assert_eq!(build_system_prompt(&domain), "Garden helper.\n\nAnswer briefly.");
/// ```
pub fn build_system_prompt(domain: &DomainSpec) -> String {
    format!("{}\n\n{}", domain.description(), domain.rules())
}

/// Builds the ordered message sequence sent to the backend
///
/// Returns `[system] ++ history`. If the history does not end with a user
/// turn, `input` is appended as a synthetic user turn so the backend always
/// sees the question being answered. The history itself is not modified.
///
/// # Examples
///
/// ```
/// use scopechat::conversation::{ConversationHistory, Role};
/// use scopechat::domain::DomainSpec;
/// use scopechat::prompts::assemble;
///
/// let domain = DomainSpec::new("Desc", "Rules", ["ai"], "No.");
/// let mut history = ConversationHistory::new();
/// history.add_user_turn("Kaj je AI?");
///
/// let messages = assemble(&domain, &history, "Kaj je AI?");
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[0].role(), Role::System);
/// assert_eq!(messages[1].content(), "Kaj je AI?");
/// ```
pub fn assemble(domain: &DomainSpec, history: &ConversationHistory, input: &str) -> Vec<Turn> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Turn::system(build_system_prompt(domain)));
    messages.extend(
        history
            .turns()
            .iter()
            .filter(|t| t.role() != Role::System)
            .cloned(),
    );

    if history.last().map(Turn::role) != Some(Role::User) {
        tracing::debug!("History does not end with a user turn, appending input");
        messages.push(Turn::user(input));
    }

    messages
}
