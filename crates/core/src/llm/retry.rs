//! Timeout and retry with exponential backoff.
//!
//! `RetryingClient` wraps any client: each attempt is bounded by the
//! per-attempt timeout, and transient failures are retried after a doubling
//! delay until the attempt budget is spent.

use crate::llm::base::{ChatMessage, LanguageModelClient, TransportError};
use async_trait::async_trait;
use sk_protocol::config_models::{LlmSettings, RetrySettings};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&RetrySettings::default(), &LlmSettings::default())
    }
}

impl RetryPolicy {
    pub fn from_settings(retry: &RetrySettings, llm: &LlmSettings) -> Self {
        Self {
            max_attempts: retry.max_attempts.max(1),
            initial_backoff: Duration::from_millis(retry.initial_backoff_ms),
            max_backoff: Duration::from_millis(retry.max_backoff_ms),
            attempt_timeout: Duration::from_secs(llm.timeout_secs),
        }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1).min(16));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// A client decorator that applies a [`RetryPolicy`].
pub struct RetryingClient {
    inner: Arc<dyn LanguageModelClient>,
    policy: RetryPolicy,
}

impl RetryingClient {
    pub fn new(inner: Arc<dyn LanguageModelClient>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl LanguageModelClient for RetryingClient {
    fn describe(&self) -> String {
        self.inner.describe()
    }

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, TransportError> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let result =
                match tokio::time::timeout(self.policy.attempt_timeout, self.inner.generate(messages))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(TransportError::Timeout(self.policy.attempt_timeout)),
                };

            match result {
                Ok(text) => return Ok(text),
                Err(error) if error.is_transient() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.backoff_for(attempt);
                    warn!(
                        client = %self.inner.describe(),
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Transient language model failure, retrying"
                    );
                    sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
