//! Azure OpenAI chat completions adapter.

use crate::llm::adapters::wire::{self, ChatRequest};
use crate::llm::base::{ChatMessage, LanguageModelClient, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use sk_protocol::config_models::LlmSettings;
use std::time::Duration;
use tracing::debug;

pub struct AzureOpenAiAdapter {
    client: Client,
    endpoint: String,
    deployment: String,
    api_version: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
}

impl AzureOpenAiAdapter {
    /// Build an adapter from connection settings.
    ///
    /// Fails with `NotAvailable` when the endpoint or API key is missing.
    pub fn new(settings: &LlmSettings) -> Result<Self, TransportError> {
        let endpoint = settings.endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(TransportError::NotAvailable(
                "Azure OpenAI endpoint is not configured (set AZURE_OPENAI_ENDPOINT)".to_string(),
            ));
        }

        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                TransportError::NotAvailable(
                    "Azure OpenAI API key is not configured (set AZURE_OPENAI_API_KEY)".to_string(),
                )
            })?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TransportError::NotAvailable(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            deployment: settings.model.clone(),
            api_version: settings.api_version.clone(),
            api_key,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }

    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

#[async_trait]
impl LanguageModelClient for AzureOpenAiAdapter {
    fn describe(&self) -> String {
        format!("azure:{}", self.deployment)
    }

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, TransportError> {
        let url = self.completions_url();
        debug!(deployment = %self.deployment, messages = messages.len(), "Sending Azure OpenAI request");

        // The deployment in the URL selects the model
        let body = ChatRequest {
            model: None,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let request = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body);

        wire::send_chat(request).await
    }
}
