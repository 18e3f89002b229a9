use crate::core::constants::MAX_CONTEXT_ENTRIES;
use crate::core::message::{Message, Role};

pub const SYSTEM_INSTRUCTIONS: &str = "\
You are an AI Financial Assistant embedded in a personal finance application.
You help users with portfolio analysis, investment recommendations, market trends, \
financial planning, and risk assessment. Politely steer unrelated questions back to these topics.

Response rules:
- Use **double asterisks** to emphasise key terms and figures.
- Structure answers with bulleted lists (- item) or numbered lists (1. item) where it helps.
- Keep responses under 500 words.
- Whenever you discuss specific investments, include a short risk disclaimer \
reminding the user that investing involves risk and past performance does not guarantee future results.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextEntry {
    pub role: Role,
    pub content: String,
}

/// Everything sent upstream for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    pub system_instructions: String,
    pub context: Vec<ContextEntry>,
    pub query: String,
}

impl PromptPayload {
    /// Flattens the payload into the single plain-text prompt the service
    /// receives: instructions, the context block, then the new query.
    pub fn to_prompt_text(&self) -> String {
        let mut text = String::with_capacity(
            self.system_instructions.len()
                + self.query.len()
                + self.context.iter().map(|e| e.content.len() + 12).sum::<usize>()
                + 64,
        );
        text.push_str(&self.system_instructions);
        text.push_str("\n\n");

        if !self.context.is_empty() {
            text.push_str("Previous conversation:\n");
            for entry in &self.context {
                text.push_str(entry.role.prompt_label());
                text.push_str(": ");
                text.push_str(&entry.content);
                text.push('\n');
            }
            text.push('\n');
        }

        text.push_str("User: ");
        text.push_str(&self.query);
        text.push_str("\nAssistant:");
        text
    }
}

/// Builds the upstream payload for `query` from the conversation so far.
///
/// `history` must not yet contain the message for `query`.
pub fn build_prompt(history: &[Message], query: &str) -> PromptPayload {
    PromptPayload {
        system_instructions: SYSTEM_INSTRUCTIONS.to_string(),
        context: context_window(history),
        query: query.trim().to_string(),
    }
}

/// Most recent eligible entries, capped at [`MAX_CONTEXT_ENTRIES`], in
/// original order.
pub fn context_window(history: &[Message]) -> Vec<ContextEntry> {
    let eligible: Vec<&Message> = history
        .iter()
        .enumerate()
        .filter(|(index, message)| is_eligible(history, *index, message))
        .map(|(_, message)| message)
        .collect();

    let start = eligible.len().saturating_sub(MAX_CONTEXT_ENTRIES);
    eligible[start..]
        .iter()
        .map(|message| ContextEntry {
            role: message.role(),
            content: message.raw_content().to_string(),
        })
        .collect()
}

/// Only genuine exchanged turns go upstream: error messages, the seeded
/// greeting, and questions whose answer was an error are left out.
fn is_eligible(history: &[Message], index: usize, message: &Message) -> bool {
    if message.is_error() || message.is_welcome() {
        return false;
    }
    if message.is_user() {
        let answered_by_error = history
            .get(index + 1)
            .is_some_and(|next| next.is_error());
        return !answered_by_error;
    }
    true
}
