//! Shared constants used across the application

/// Upper bound on prior history entries included in an upstream prompt.
pub const MAX_CONTEXT_ENTRIES: usize = 10;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI Financial Assistant. I can help you with portfolio analysis, investment recommendations, market insights, and financial planning. What would you like to know?";

pub const WELCOME_SUGGESTIONS: [&str; 4] = [
    "Analyze my portfolio performance",
    "What are the best crypto investments right now?",
    "Create a financial plan for retirement",
    "Show me market trends",
];

/// Label and staged query for each quick action offered above the transcript.
pub const QUICK_ACTIONS: [(&str, &str); 4] = [
    ("Portfolio Analysis", "Analyze my portfolio performance"),
    ("Market Trends", "Show me current market trends"),
    ("Investment Advice", "What are the best investments right now?"),
    ("Financial Planning", "Help me create a financial plan"),
];
