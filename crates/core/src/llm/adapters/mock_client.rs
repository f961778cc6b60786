//! Mock language model client for tests and dry runs.
//!
//! Replies are chosen per stage. The stage is recognised from the request's
//! user prompt, so one mock can serve several concurrent runs.

use crate::engine::prompts::stage_for_prompt;
use crate::llm::base::{ChatMessage, LanguageModelClient, Role, TransportError};
use async_trait::async_trait;
use sk_protocol::stage_models::Stage;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::Mutex;

pub const MOCK_ANALYSIS: &str = "Participants: Account manager and client representatives\n\
Main topics: Contract renewal and service scope\n\
Key decisions: Proceed with renewal review\n\
Action items: Send revised proposal\n\
Dates: None stated\n\
Context: Routine account review";

pub const MOCK_SUMMARY: &str = "Client Interaction Summary
Date of Meeting: [Information not available in document]
Participants: Account manager, client representatives
Client Name: Mock Client
Meeting Type: Meeting

1. Objectives of the Meeting :
Review the current contract and discuss renewal.

2. Key Discussion Points :
- Contract renewal terms
- Service scope

3. Decisions Made :
Proceed with the renewal review.

4. Action Items :
RM: Send a revised proposal.
Client: Review the proposal.

Key Takeaways :
- Renewal is on track pending the revised proposal.";

/// A request the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub stage: Option<Stage>,
    pub messages: Vec<ChatMessage>,
}

pub struct MockClient {
    defaults: HashMap<Stage, Result<String, TransportError>>,
    queued: Mutex<HashMap<Stage, VecDeque<Result<String, TransportError>>>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockClient {
    /// A mock that answers every stage with a canned, template-conformant reply.
    pub fn success() -> Self {
        let defaults = HashMap::from([
            (Stage::Analysis, Ok(MOCK_ANALYSIS.to_string())),
            (Stage::Generation, Ok(MOCK_SUMMARY.to_string())),
            (Stage::Review, Ok(MOCK_SUMMARY.to_string())),
        ]);

        Self {
            defaults,
            queued: Mutex::new(HashMap::new()),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A mock whose `stage` always fails with `error`.
    pub fn failing_at(stage: Stage, error: TransportError) -> Self {
        Self::success().with_reply(stage, Err(error))
    }

    /// Set the reply `stage` returns whenever nothing is queued for it.
    pub fn with_reply(mut self, stage: Stage, reply: Result<String, TransportError>) -> Self {
        self.defaults.insert(stage, reply);
        self
    }

    /// Queue a one-shot reply for `stage`, returned before the default.
    pub fn with_queued(mut self, stage: Stage, reply: Result<String, TransportError>) -> Self {
        self.queued
            .get_mut()
            .entry(stage)
            .or_default()
            .push_back(reply);
        self
    }

    /// Wait this long before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self, stage: Stage) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| call.stage == Some(stage))
            .count()
    }
}

#[async_trait]
impl LanguageModelClient for MockClient {
    fn describe(&self) -> String {
        "mock".to_string()
    }

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, TransportError> {
        let stage = messages
            .iter()
            .rev()
            .find(|message| message.role == Role::User)
            .and_then(|message| stage_for_prompt(&message.content));

        self.calls.lock().await.push(MockCall {
            stage,
            messages: messages.to_vec(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let stage = stage.ok_or_else(|| {
            TransportError::InvalidResponse("Mock client received an unrecognised prompt".to_string())
        })?;

        if let Some(reply) = self
            .queued
            .lock()
            .await
            .get_mut(&stage)
            .and_then(VecDeque::pop_front)
        {
            return reply;
        }

        self.defaults
            .get(&stage)
            .cloned()
            .unwrap_or_else(|| Err(TransportError::NotAvailable(format!("No mock reply for {stage}"))))
    }
}
