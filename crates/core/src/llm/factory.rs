//! Client factory for creating language model clients from configuration.

use crate::config::models::AppConfig;
use crate::llm::adapters::{AzureOpenAiAdapter, MockClient, OpenAiAdapter};
use crate::llm::base::LanguageModelClient;
use crate::llm::provider_type::ProviderType;
use crate::llm::retry::RetryingClient;
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::info;

/// Factory for creating client instances based on configuration.
///
/// The factory picks the adapter from `llm.provider` and wraps it in a
/// [`RetryingClient`] built from the retry and timeout settings.
pub struct ClientFactory;

impl ClientFactory {
    /// Create a client from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Fails when the provider name is unknown or the selected adapter is
    /// missing its endpoint or credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use sk_core::config::models::AppConfig;
    /// use sk_core::llm::ClientFactory;
    ///
    /// let mut config = AppConfig::default();
    /// config.global.llm.provider = "mock".to_string();
    ///
    /// let client = ClientFactory::create(&config).unwrap();
    /// assert_eq!(client.describe(), "mock");
    /// ```
    pub fn create(config: &AppConfig) -> Result<Arc<dyn LanguageModelClient>> {
        let settings = &config.global.llm;
        let provider = ProviderType::from_name(&settings.provider)
            .ok_or_else(|| anyhow!("Unknown language model provider '{}'", settings.provider))?;

        let inner: Arc<dyn LanguageModelClient> = match provider {
            ProviderType::Azure => Arc::new(
                AzureOpenAiAdapter::new(settings).context("Failed to configure Azure OpenAI client")?,
            ),
            ProviderType::OpenAi => Arc::new(
                OpenAiAdapter::new(settings).context("Failed to configure OpenAI client")?,
            ),
            ProviderType::Mock => Arc::new(MockClient::success()),
        };

        let policy = config.retry_policy();
        info!(
            client = %inner.describe(),
            max_attempts = policy.max_attempts,
            timeout_secs = policy.attempt_timeout.as_secs(),
            "Language model client ready"
        );

        Ok(Arc::new(RetryingClient::new(inner, policy)))
    }
}
