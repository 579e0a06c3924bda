use crate::config::Settings;
use crate::llm::http_utils::{create_http_client, extract_reply, send_json_request};
use crate::llm::{ChatCompletionRequest, ChatMessage, LlmError, LlmProvider};
use async_trait::async_trait;
use tracing::{debug, info};

/// LLM provider implementation for `OpenRouter`
pub struct OpenRouterProvider {
    api_key: String,
    api_url: String,
    model: String,
}

impl OpenRouterProvider {
    /// Create a new `OpenRouter` provider instance
    #[must_use]
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            api_key,
            api_url,
            model,
        }
    }

    /// Create a provider from loaded settings
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.openrouter_api_key.clone(),
            settings.openrouter_api_url.clone(),
            settings.openrouter_model.clone(),
        )
    }

    /// Model identifier sent with each request
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the single-turn request body for `user_message`
    #[must_use]
    pub fn build_request(&self, user_message: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(user_message)],
        }
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    async fn chat_completion(&self, user_message: &str) -> Result<String, LlmError> {
        let body = self.build_request(user_message);
        let auth = format!("Bearer {}", self.api_key);

        // Client lives only for this request
        let http_client = create_http_client();
        debug!(model = %self.model, url = %self.api_url, "Sending chat completion request");

        let res_json = send_json_request(&http_client, &self.api_url, &body, Some(&auth)).await?;
        info!("Successful response received from OpenRouter");

        extract_reply(res_json)
    }
}
