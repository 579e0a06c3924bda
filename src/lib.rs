#![deny(missing_docs)]
//! Telegram bot that relays user messages to an `OpenRouter` chat model.

/// Telegram handlers and static views.
pub mod bot;
/// Configuration management.
pub mod config;
/// LLM chat-completion client.
pub mod llm;
/// Tracing setup with secret redaction.
pub mod logging;
/// Telegram runtime entrypoint.
pub mod runner;
