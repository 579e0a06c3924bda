//! HTTP utilities for the chat-completion client
//!
//! Request/response handling shared by provider implementations.

use crate::config::get_llm_http_timeout_secs;
use crate::llm::{ChatCompletionResponse, LlmError};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Creates an HTTP client for a single relay call.
///
/// Applies `LLM_HTTP_TIMEOUT_SECS` when it is set; otherwise the request may
/// wait indefinitely.
#[must_use]
pub fn create_http_client() -> HttpClient {
    let mut builder = HttpClient::builder();
    if let Some(secs) = get_llm_http_timeout_secs() {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().unwrap_or_else(|_| HttpClient::new())
}

/// Sends an HTTP POST request with JSON body and returns parsed JSON response.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `url` - Target URL
/// * `body` - Value serialized as the JSON body
/// * `auth_header` - Optional authorization header value (e.g., "Bearer token")
///
/// # Errors
///
/// Returns `LlmError::NetworkError` on connectivity issues, `LlmError::ApiError` on non-success status codes,
/// or `LlmError::JsonError` if parsing fails.
pub async fn send_json_request<B: Serialize + ?Sized>(
    client: &HttpClient,
    url: &str,
    body: &B,
    auth_header: Option<&str>,
) -> Result<Value, LlmError> {
    let mut request = client
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .json(body);

    if let Some(auth) = auth_header {
        request = request.header(AUTHORIZATION, auth);
    }

    let response = request
        .send()
        .await
        .map_err(|e| LlmError::NetworkError(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(LlmError::ApiError(summarize_error_body(status, &error_text)));
    }

    response
        .json()
        .await
        .map_err(|e| LlmError::JsonError(e.to_string()))
}

/// Extracts the trimmed `choices[0].message.content` from a raw response.
///
/// # Errors
///
/// Returns `LlmError::JsonError` if the value does not have the response
/// shape, otherwise the errors of [`ChatCompletionResponse::first_reply`].
pub fn extract_reply(response: Value) -> Result<String, LlmError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_value(response).map_err(|e| LlmError::JsonError(e.to_string()))?;
    parsed.first_reply()
}

fn summarize_error_body(status: reqwest::StatusCode, error_text: &str) -> String {
    let trimmed = error_text.trim_start();

    // Nginx/proxy error pages
    let is_html = trimmed.starts_with("<!DOCTYPE")
        || trimmed.starts_with("<html")
        || trimmed.starts_with("<HTML");

    if is_html {
        return format!("{status} (Server returned HTML error page)");
    }

    match error_text.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{status} - {}... (truncated)", &error_text[..cut]),
        None => format!("{status} - {error_text}"),
    }
}
