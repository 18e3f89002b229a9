//! Finchat is a terminal client for a conversational financial assistant
//! backed by a remote text-generation model.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation controller, prompt building, reply
//!   formatting, follow-up suggestions, error classification, and the
//!   inference client.
//! - [`api`] defines the request/response payloads of the upstream
//!   `generateContent` endpoint.
//! - [`ui`] turns conversation state into styled terminal lines.
//! - [`utils`] holds URL helpers and the transcript log.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into the interactive
//! [`cli::chat`] loop or the one-shot [`cli::say`] command.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
