//! Chat completions wire format shared by the HTTP adapters.
//!
//! Azure OpenAI and OpenAI-compatible services accept the same request body
//! and return the same response shape; only the URL and the auth header
//! differ.

use crate::llm::base::{ChatMessage, TransportError};
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(crate) struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Deserialize)]
pub(crate) struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Sends a prepared request and returns the first choice's content.
pub(crate) async fn send_chat(request: RequestBuilder) -> Result<String, TransportError> {
    let response = request.send().await.map_err(map_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_status(status, &body));
    }

    let body = response
        .text()
        .await
        .map_err(|e| TransportError::Network(format!("Failed to read response body: {e}")))?;

    parse_completion(&body)
}

/// Extracts the completion text from a response body.
pub(crate) fn parse_completion(body: &str) -> Result<String, TransportError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| TransportError::InvalidResponse(format!("Failed to parse response: {e}")))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| TransportError::InvalidResponse("Response contained no choices".to_string()))?;

    choice
        .message
        .content
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| TransportError::InvalidResponse("Response contained no content".to_string()))
}

/// Maps a non-success HTTP status to a transport error.
pub(crate) fn classify_status(status: StatusCode, body: &str) -> TransportError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TransportError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => TransportError::RateLimited(message),
        _ => TransportError::Service {
            status: status.as_u16(),
            message,
        },
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Network(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        TransportError::Network(format!("Connection failed: {e}"))
    } else {
        TransportError::Network(e.to_string())
    }
}
