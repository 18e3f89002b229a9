use std::cell::OnceCell;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::formatter::{format_response, RenderNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Label used for this role inside the upstream context block.
    pub fn prompt_label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(format!("invalid message role: {value}")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

/// What selecting a suggestion does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// Stage the suggestion text as the next input.
    Prompt,
    /// Stage the most recent user message again.
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub kind: SuggestionKind,
}

pub const RETRY_LABEL: &str = "Try again";

impl Suggestion {
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SuggestionKind::Prompt,
        }
    }

    pub fn retry() -> Self {
        Self {
            text: RETRY_LABEL.to_string(),
            kind: SuggestionKind::Retry,
        }
    }

    pub fn is_retry(&self) -> bool {
        self.kind == SuggestionKind::Retry
    }
}

/// Unit of conversation history.
///
/// Messages are immutable once appended to a conversation; the render tree of
/// assistant messages is derived on first access and cached.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    raw_content: String,
    timestamp: DateTime<Utc>,
    suggestions: Vec<Suggestion>,
    is_error: bool,
    is_welcome: bool,
    #[serde(skip)]
    rendered: OnceCell<Vec<RenderNode>>,
}

impl Message {
    pub fn user(id: MessageId, content: impl Into<String>) -> Self {
        Self::build(id, Role::User, content.into(), Vec::new(), false, false)
    }

    pub fn assistant(id: MessageId, content: impl Into<String>, suggestions: Vec<Suggestion>) -> Self {
        Self::build(id, Role::Assistant, content.into(), suggestions, false, false)
    }

    pub fn error(id: MessageId, content: impl Into<String>, suggestions: Vec<Suggestion>) -> Self {
        Self::build(id, Role::Assistant, content.into(), suggestions, true, false)
    }

    pub fn welcome(id: MessageId, content: impl Into<String>, suggestions: Vec<Suggestion>) -> Self {
        Self::build(id, Role::Assistant, content.into(), suggestions, false, true)
    }

    fn build(
        id: MessageId,
        role: Role,
        raw_content: String,
        suggestions: Vec<Suggestion>,
        is_error: bool,
        is_welcome: bool,
    ) -> Self {
        Self {
            id,
            role,
            raw_content,
            timestamp: Utc::now(),
            suggestions,
            is_error,
            is_welcome,
            rendered: OnceCell::new(),
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn raw_content(&self) -> &str {
        &self.raw_content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// True for the greeting seeded into every new conversation.
    pub fn is_welcome(&self) -> bool {
        self.is_welcome
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Structured render tree for assistant and error messages. User messages
    /// are displayed verbatim and never go through the formatter.
    pub fn rendered_content(&self) -> Option<&[RenderNode]> {
        if self.is_user() {
            return None;
        }
        Some(
            self.rendered
                .get_or_init(|| format_response(&self.raw_content))
                .as_slice(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formatter::Span;

    #[test]
    fn user_messages_never_render() {
        let message = Message::user(MessageId::new(1), "**bold** question");
        assert!(message.rendered_content().is_none());
        assert!(message.suggestions().is_empty());
        assert!(!message.is_error());
    }

    #[test]
    fn assistant_messages_render_lazily_and_cache() {
        let message = Message::assistant(MessageId::new(2), "**Risk:** High", Vec::new());
        let first = message.rendered_content().expect("rendered");
        assert_eq!(
            first[0].spans(),
            &[Span::emphasis("Risk:"), Span::plain(" High")]
        );
        let second = message.rendered_content().expect("rendered");
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn ids_sort_in_creation_order() {
        assert!(MessageId::new(3) < MessageId::new(4));
        assert_eq!(MessageId::new(7).to_string(), "#7");
    }

    #[test]
    fn invalid_role_strings_are_rejected() {
        assert!(Role::try_from("system").is_err());
        assert_eq!(Role::try_from("assistant"), Ok(Role::Assistant));
    }

    #[test]
    fn retry_suggestion_is_tagged() {
        let retry = Suggestion::retry();
        assert!(retry.is_retry());
        assert_eq!(retry.text, RETRY_LABEL);
        assert!(!Suggestion::prompt(RETRY_LABEL).is_retry());
    }
}
