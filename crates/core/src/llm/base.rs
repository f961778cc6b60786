//! Base language model client trait and supporting types.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of an ordered chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A language model call failed before producing text.
///
/// Failures are never returned as model text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Could not reach language model service: {0}")]
    Network(String),
    #[error("Language model service rejected credentials: {0}")]
    Auth(String),
    #[error("Rate limited by language model service: {0}")]
    RateLimited(String),
    #[error("Language model service returned {status}: {message}")]
    Service { status: u16, message: String },
    #[error("Language model call timed out after {0:?}")]
    Timeout(Duration),
    #[error("Malformed language model response: {0}")]
    InvalidResponse(String),
    #[error("Language model client not available: {0}")]
    NotAvailable(String),
}

impl TransportError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Network(_)
            | TransportError::RateLimited(_)
            | TransportError::Timeout(_) => true,
            TransportError::Service { status, .. } => *status >= 500,
            TransportError::Auth(_)
            | TransportError::InvalidResponse(_)
            | TransportError::NotAvailable(_) => false,
        }
    }
}

/// A text-completion capability.
///
/// Implementations send the ordered messages to a model and return the
/// completion text.
#[async_trait]
pub trait LanguageModelClient: Send + Sync {
    /// Short name used in logs, e.g. `azure:gpt-4`.
    fn describe(&self) -> String;

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, TransportError>;
}
