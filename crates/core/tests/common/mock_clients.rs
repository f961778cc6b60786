//! Scripted clients for tests that need more than `MockClient`.

#![allow(dead_code)]

use async_trait::async_trait;
use sk_core::llm::base::{ChatMessage, LanguageModelClient, TransportError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fails with a transient error `failures` times, then answers `reply`.
pub struct FlakyClient {
    failures: usize,
    reply: String,
    attempts: AtomicUsize,
}

impl FlakyClient {
    pub fn new(failures: usize, reply: &str) -> Self {
        Self {
            failures,
            reply: reply.to_string(),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModelClient for FlakyClient {
    fn describe(&self) -> String {
        "flaky".to_string()
    }

    async fn generate(&self, _messages: &[ChatMessage]) -> Result<String, TransportError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            Err(TransportError::RateLimited("slow down".to_string()))
        } else {
            Ok(self.reply.clone())
        }
    }
}

/// Echoes the document back inside a conformant summary, so output depends
/// only on input.
pub struct EchoClient;

#[async_trait]
impl LanguageModelClient for EchoClient {
    fn describe(&self) -> String {
        "echo".to_string()
    }

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, TransportError> {
        let prompt = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
        Ok(format!(
            "{}\n- Prompt length {}",
            super::fixtures::summary_for("Echo Co"),
            prompt.len()
        ))
    }
}
