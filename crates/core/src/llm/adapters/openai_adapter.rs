//! OpenAI-compatible chat completions adapter.

use crate::llm::adapters::wire::{self, ChatRequest};
use crate::llm::base::{ChatMessage, LanguageModelClient, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use sk_protocol::config_models::LlmSettings;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiAdapter {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiAdapter {
    /// Build an adapter from connection settings. An empty endpoint means
    /// the public OpenAI API.
    pub fn new(settings: &LlmSettings) -> Result<Self, TransportError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                TransportError::NotAvailable(
                    "OpenAI API key is not configured (set OPENAI_API_KEY)".to_string(),
                )
            })?;

        let base_url = match settings.endpoint.trim().trim_end_matches('/') {
            "" => DEFAULT_BASE_URL.to_string(),
            url => url.to_string(),
        };

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TransportError::NotAvailable(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            model: settings.model.clone(),
            api_key,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LanguageModelClient for OpenAiAdapter {
    fn describe(&self) -> String {
        format!("openai:{}", self.model)
    }

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, TransportError> {
        debug!(model = %self.model, messages = messages.len(), "Sending OpenAI request");

        let body = ChatRequest {
            model: Some(&self.model),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let request = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body);

        wire::send_chat(request).await
    }
}
