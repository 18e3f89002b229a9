//! Terminal presentation for chat sessions.
//!
//! - [`transcript`]: turns conversation messages and their render trees into
//!   styled [`ratatui`] lines, plus the suggestion, quick-action and error
//!   banner rows shown around them.
//! - [`terminal`]: writes those lines to stdout as ANSI text.
//! - [`theme`]: color/style policy.
//!
//! Ownership boundary: this layer only presents state, while [`crate::core`]
//! owns the conversation and backend coordination.

pub mod terminal;
pub mod theme;
pub mod transcript;
