//! Payloads for the `generateContent` endpoint of the generative-language API.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// A single-turn request carrying the whole prompt as one user part.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

/// Why a decoded response carries no usable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyError {
    Blocked(String),
    Empty,
}

impl GenerateContentResponse {
    /// Text of the first candidate, joined across parts.
    pub fn reply_text(&self) -> Result<String, ReplyError> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_ref())
        {
            return Err(ReplyError::Blocked(reason.clone()));
        }

        let candidate = self.candidates.first().ok_or(ReplyError::Empty)?;
        let text: String = candidate
            .content
            .as_ref()
            .map(|content| content.parts.iter().map(|part| part.text.as_str()).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return match candidate.finish_reason.as_deref() {
                Some(reason @ ("SAFETY" | "RECITATION" | "PROHIBITED_CONTENT" | "BLOCKLIST")) => {
                    Err(ReplyError::Blocked(reason.to_string()))
                }
                _ => Err(ReplyError::Empty),
            };
        }
        Ok(text)
    }
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorDetail {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}

/// One-line summary of an error body: the API's message plus its status
/// code name when present, falling back to the collapsed raw text.
pub fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(trimmed) {
        let message = parsed
            .error
            .message
            .map(|message| collapse_whitespace(&message))
            .filter(|message| !message.is_empty());
        return match (message, parsed.error.status) {
            (Some(message), Some(status)) => format!("{message} ({status})"),
            (Some(message), None) => message,
            (None, Some(status)) => status,
            (None, None) => "<empty error>".to_string(),
        };
    }

    if trimmed.is_empty() {
        "<no body>".to_string()
    } else {
        collapse_whitespace(trimmed)
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
