use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::message::Suggestion;

/// Failure reported by the inference layer, carrying the unclassified
/// description of what went wrong upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    pub message: String,
}

impl RemoteFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::new("timeout")
    }
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for RemoteFailure {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidCredential,
    QuotaExceeded,
    ContentFiltered,
    ServiceUnavailable,
    NetworkError,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidCredential => "invalid_credential",
            ErrorKind::QuotaExceeded => "quota_exceeded",
            ErrorKind::ContentFiltered => "content_filtered",
            ErrorKind::ServiceUnavailable => "service_unavailable",
            ErrorKind::NetworkError => "network_error",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Fixed explanation shown to the user for this kind of failure.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::InvalidCredential => {
                "Invalid API key. Please check your API key configuration and try again."
            }
            ErrorKind::QuotaExceeded => {
                "API quota exceeded. Please try again later or check your billing."
            }
            ErrorKind::ContentFiltered => {
                "Your request was blocked by the content safety filter. Please rephrase your question."
            }
            ErrorKind::ServiceUnavailable => {
                "The AI service is temporarily unavailable. Please try again in a few moments."
            }
            ErrorKind::NetworkError => {
                "Network error. Please check your internet connection and try again."
            }
            ErrorKind::Unknown => "Sorry, I encountered an unexpected error. Please try again.",
        }
    }

    /// Follow-ups offered with an error message. The first entry is always
    /// the retry action.
    pub fn suggestions(self) -> Vec<Suggestion> {
        let extra: &[&str] = match self {
            ErrorKind::InvalidCredential => &["Check API key setup", "Show market trends"],
            ErrorKind::QuotaExceeded => &["Ask a shorter question", "Analyze my portfolio"],
            ErrorKind::ContentFiltered => &["Rephrase my question", "Investment advice"],
            ErrorKind::ServiceUnavailable | ErrorKind::NetworkError => {
                &["Show market trends", "Analyze my portfolio"]
            }
            ErrorKind::Unknown => &["Investment advice", "Risk analysis"],
        };
        std::iter::once(Suggestion::retry())
            .chain(extra.iter().map(|text| Suggestion::prompt(*text)))
            .collect()
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Rule {
    kind: ErrorKind,
    patterns: &'static [&'static str],
}

/// Evaluated top to bottom; the first rule with a matching pattern wins.
/// Specific credential and quota signals sit above the generic words that
/// would otherwise shadow them.
const RULES: &[Rule] = &[
    Rule {
        kind: ErrorKind::InvalidCredential,
        patterns: &[
            "api key",
            "api_key",
            "apikey",
            "credential",
            "unauthenticated",
            "unauthorized",
            "permission denied",
            "permission_denied",
            "http 401",
            "http 403",
        ],
    },
    Rule {
        kind: ErrorKind::QuotaExceeded,
        patterns: &[
            "quota",
            "resource_exhausted",
            "resource exhausted",
            "too many requests",
            "http 429",
            "billing",
        ],
    },
    Rule {
        kind: ErrorKind::ContentFiltered,
        patterns: &[
            "safety",
            "blocked",
            "content filter",
            "prohibited_content",
            "recitation",
        ],
    },
    Rule {
        kind: ErrorKind::QuotaExceeded,
        patterns: &["rate limit", "limit exceeded"],
    },
    Rule {
        kind: ErrorKind::ServiceUnavailable,
        patterns: &[
            "unavailable",
            "overloaded",
            "internal server error",
            "bad gateway",
            "deadline_exceeded",
            "http 500",
            "http 502",
            "http 503",
            "http 504",
        ],
    },
    Rule {
        kind: ErrorKind::NetworkError,
        patterns: &[
            "timeout",
            "timed out",
            "network",
            "connection",
            "connect error",
            "dns",
            "unreachable",
            "failed to fetch",
            "cancelled",
        ],
    },
];

/// Maps an upstream failure onto the fixed taxonomy. Total and deterministic:
/// every message yields exactly one kind and unmatched input is `Unknown`.
pub fn classify(failure: &RemoteFailure) -> ErrorKind {
    let lower = failure.message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.patterns.iter().any(|pattern| lower.contains(pattern)))
        .map(|rule| rule.kind)
        .unwrap_or(ErrorKind::Unknown)
}
