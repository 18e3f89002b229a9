pub mod config;
pub mod constants;
pub mod conversation;
pub mod errors;
pub mod formatter;
pub mod inference;
pub mod message;
pub mod prompt;
pub mod request_service;
pub mod suggestions;
