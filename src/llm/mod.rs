//! LLM chat-completion client
//!
//! Request/response shapes for an OpenAI-compatible chat completions API and
//! the [`LlmProvider`] seam used by the Telegram handlers.

mod http_utils;
/// `OpenRouter` implementation of [`LlmProvider`]
pub mod openrouter;

pub use http_utils::{create_http_client, extract_reply, send_json_request};
pub use openrouter::OpenRouterProvider;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while relaying a message to the LLM
#[derive(Debug, Error)]
pub enum LlmError {
    /// Error returned by the provider's API (non-success status)
    #[error("API error: {0}")]
    ApiError(String),
    /// Error during network communication
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Error during JSON serialization or deserialization
    #[error("JSON error: {0}")]
    JsonError(String),
    /// Response carried no usable `choices[0].message.content`
    #[error("Response has no choices")]
    MissingChoices,
    /// Reply content was empty after trimming
    #[error("Empty response")]
    EmptyReply,
}

/// A single conversational turn
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: String,
    /// Text content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new user message, keeping the text exactly as given
    #[must_use]
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Body of a chat completion request
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,
    /// Conversation turns
    pub messages: Vec<ChatMessage>,
}

/// Body of a chat completion response
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChatCompletionResponse {
    /// Generated choices; absent is treated as empty
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One generated choice
#[derive(Debug, Deserialize, Clone)]
pub struct Choice {
    /// The assistant message of this choice
    pub message: ChoiceMessage,
}

/// Message payload of a choice
#[derive(Debug, Deserialize, Clone)]
pub struct ChoiceMessage {
    /// Generated text, `null` for tool-only answers
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Extract `choices[0].message.content` trimmed of surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::MissingChoices` when there is no first choice or it
    /// has no content, and `LlmError::EmptyReply` when the content is blank.
    pub fn first_reply(&self) -> Result<String, LlmError> {
        let content = self
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or(LlmError::MissingChoices)?;

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(LlmError::EmptyReply);
        }
        Ok(trimmed.to_string())
    }
}

/// Interface for chat-completion backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a single user turn and return the trimmed reply text
    async fn chat_completion(&self, user_message: &str) -> Result<String, LlmError>;
}
