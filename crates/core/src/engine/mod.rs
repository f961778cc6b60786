//! Summary pipeline execution engine.
//!
//! The `PipelineOrchestrator` drives the three dependent stages
//! (Analysis -> Generation -> Review) for one document, tracking per-stage
//! status and the interaction log, and returns a [`ProcessingResult`].

pub mod error;
pub mod prompts;
pub mod stage;
pub mod template;

pub use error::{PipelineError, PipelineResult, StageFailure};
pub use prompts::StagePrompt;
pub use stage::StageDescriptor;

use crate::llm::base::{ChatMessage, LanguageModelClient};
use crate::state::publish;
use crate::state::tracker::AgentStatusTracker;
use sk_protocol::agent_models::StageProfile;
use sk_protocol::config_models::TemplatePolicy;
use sk_protocol::ipc::Event;
use sk_protocol::result_models::ProcessingResult;
use sk_protocol::stage_models::{Stage, StageStatus};
use stage::builtin_profile;
use template::ContentError;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// How stage output is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub template_policy: TemplatePolicy,
    /// Extra attempts a summary stage gets under [`TemplatePolicy::Enforce`].
    pub content_retries: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            template_policy: TemplatePolicy::Flag,
            content_retries: 1,
        }
    }
}

/// Runs the summary pipeline for one document.
///
/// Each orchestrator owns a private [`AgentStatusTracker`]; concurrent runs
/// use separate orchestrators and share nothing but the client.
pub struct PipelineOrchestrator {
    client: Arc<dyn LanguageModelClient>,
    profiles: [StageProfile; 3],
    options: PipelineOptions,
    tracker: AgentStatusTracker,
    events_tx: Option<Sender<Event>>,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl PipelineOrchestrator {
    /// Create an orchestrator with built-in stage personas and default
    /// options.
    pub fn new(client: Arc<dyn LanguageModelClient>) -> Self {
        Self {
            client,
            profiles: Stage::ALL.map(builtin_profile),
            options: PipelineOptions::default(),
            tracker: AgentStatusTracker::new(Uuid::new_v4()),
            events_tx: None,
            cancel_rx: None,
        }
    }

    pub fn with_profiles(mut self, profiles: [StageProfile; 3]) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_run_id(mut self, run_id: Uuid) -> Self {
        self.tracker = AgentStatusTracker::new(run_id);
        if let Some(events_tx) = &self.events_tx {
            self.tracker = self.tracker.with_events(events_tx.clone());
        }
        self
    }

    /// Stream stage and log events to `events_tx`.
    pub fn with_events(mut self, events_tx: Sender<Event>) -> Self {
        self.tracker = self.tracker.with_events(events_tx.clone());
        self.events_tx = Some(events_tx);
        self
    }

    /// Abort the run once `cancel_rx` observes `true`.
    pub fn with_cancellation(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.tracker.run_id()
    }

    /// The tracker of the current (or last) run.
    pub fn tracker(&self) -> &AgentStatusTracker {
        &self.tracker
    }

    /// Execute the pipeline on `document_text`.
    ///
    /// Stages run strictly in order. The first failing stage is marked as
    /// error, later stages stay waiting, and the error names the stage.
    ///
    /// # Arguments
    ///
    /// * `document_text` - Extracted text of the uploaded document
    /// * `format_template` - Optional extra formatting preferences
    ///
    /// # Errors
    ///
    /// Returns a `PipelineError` if a client call fails, if output violates
    /// the template under [`TemplatePolicy::Enforce`], or if the run is
    /// cancelled.
    pub async fn run(
        &mut self,
        document_text: &str,
        format_template: Option<&str>,
    ) -> PipelineResult<ProcessingResult> {
        // Status and log never carry over between runs
        let run_id = self.run_id();
        let mut tracker = AgentStatusTracker::new(run_id);
        if let Some(events_tx) = &self.events_tx {
            tracker = tracker.with_events(events_tx.clone());
        }
        self.tracker = tracker;

        info!(
            run_id = %run_id,
            client = %self.client.describe(),
            document_len = document_text.len(),
            "Starting summary pipeline"
        );

        let analysis = self
            .execute_stage(StagePrompt::Analysis {
                document: document_text,
            })
            .await?;

        let initial_summary = self
            .execute_stage(StagePrompt::Generation {
                document: document_text,
                analysis: &analysis,
                format_template,
            })
            .await?;

        let final_summary = self
            .execute_stage(StagePrompt::Review {
                document: document_text,
                initial_summary: &initial_summary,
                format_template,
            })
            .await?;

        let template_issues = match self.options.template_policy {
            TemplatePolicy::Ignore => Vec::new(),
            TemplatePolicy::Flag | TemplatePolicy::Enforce => {
                template::check_conformance(&final_summary).issues()
            }
        };

        self.emit(Event::RunCompleted { run_id });
        info!(
            run_id = %run_id,
            log_entries = self.tracker.log().len(),
            template_issues = template_issues.len(),
            "Summary pipeline completed"
        );

        Ok(ProcessingResult {
            analysis,
            initial_summary,
            final_summary,
            interaction_log: self.tracker.log().snapshot(),
            template_issues,
        })
    }

    async fn execute_stage(&mut self, prompt: StagePrompt<'_>) -> PipelineResult<String> {
        let stage = prompt.stage();
        let descriptor = StageDescriptor::for_stage(stage);

        if self.is_cancelled() {
            return Err(self.fail(stage, StageFailure::Cancelled).await);
        }

        self.tracker
            .set_status(stage, StageStatus::Active, descriptor.active_task)
            .await;

        let messages = self.build_messages(&prompt);
        debug!(
            run_id = %self.run_id(),
            stage = %stage,
            prompt_len = messages.iter().map(|m| m.content.len()).sum::<usize>(),
            "Calling language model"
        );

        let mut content_attempts = 0;
        loop {
            let output = match self.call_client(&messages).await {
                Ok(output) => output,
                Err(failure) => return Err(self.fail(stage, failure).await),
            };

            if descriptor.produces_summary && self.options.template_policy != TemplatePolicy::Ignore {
                let report = template::check_conformance(&output);
                if !report.is_conformant() {
                    let issues = report.issues().join("; ");
                    match self.options.template_policy {
                        TemplatePolicy::Enforce if content_attempts < self.options.content_retries => {
                            content_attempts += 1;
                            warn!(run_id = %self.run_id(), stage = %stage, issues = %issues, "Regenerating non-conformant output");
                            let message = format!(
                                "Output did not follow the template ({issues}), regenerating (attempt {})",
                                content_attempts + 1
                            );
                            self.tracker
                                .record_message(stage, StageStatus::Active, descriptor.active_task, &message)
                                .await;
                            continue;
                        }
                        TemplatePolicy::Enforce => {
                            let failure = StageFailure::Content(ContentError { issues: report.issues() });
                            return Err(self.fail(stage, failure).await);
                        }
                        TemplatePolicy::Flag | TemplatePolicy::Ignore => {
                            warn!(run_id = %self.run_id(), stage = %stage, issues = %issues, "Output does not follow the template");
                            let message = format!("Template check flagged: {issues}");
                            self.tracker
                                .record_message(stage, StageStatus::Active, descriptor.active_task, &message)
                                .await;
                        }
                    }
                }
            }

            self.tracker
                .record_message(
                    stage,
                    StageStatus::Complete,
                    descriptor.complete_task,
                    descriptor.complete_message,
                )
                .await;
            info!(run_id = %self.run_id(), stage = %stage, output_len = output.len(), "Stage complete");

            return Ok(output);
        }
    }

    fn build_messages(&self, prompt: &StagePrompt<'_>) -> Vec<ChatMessage> {
        let profile = &self.profiles[prompt.stage().index()];
        let mut messages = Vec::with_capacity(2);
        if !profile.system_prompt.trim().is_empty() {
            messages.push(ChatMessage::system(profile.system_prompt.clone()));
        }
        messages.push(ChatMessage::user(prompt.render()));
        messages
    }

    async fn call_client(&self, messages: &[ChatMessage]) -> Result<String, StageFailure> {
        let request = self.client.generate(messages);

        match self.cancel_rx.clone() {
            Some(mut cancel_rx) => tokio::select! {
                biased;
                _ = wait_for_cancel(&mut cancel_rx) => Err(StageFailure::Cancelled),
                result = request => result.map_err(StageFailure::from),
            },
            None => request.await.map_err(StageFailure::from),
        }
    }

    async fn fail(&mut self, stage: Stage, cause: StageFailure) -> PipelineError {
        let run_id = self.run_id();
        let profile_name = self.profiles[stage.index()].name.clone();
        let message = format!("{profile_name} failed: {cause}");

        self.tracker
            .record_message(stage, StageStatus::Error, "Stage failed", &message)
            .await;

        if matches!(cause, StageFailure::Cancelled) {
            warn!(run_id = %run_id, stage = %stage, "Summary pipeline cancelled");
            self.emit(Event::RunCancelled { run_id, stage });
        } else {
            error!(run_id = %run_id, stage = %stage, error = %cause, "Summary pipeline failed");
            self.emit(Event::RunFailed {
                run_id,
                stage,
                error: cause.to_string(),
            });
        }

        PipelineError { stage, cause }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_rx
            .as_ref()
            .is_some_and(|cancel_rx| *cancel_rx.borrow())
    }

    fn emit(&self, event: Event) {
        if let Some(events_tx) = &self.events_tx {
            publish(events_tx, event);
        }
    }
}

/// Resolves once cancellation is requested. Never resolves if the sender is
/// dropped without cancelling.
async fn wait_for_cancel(cancel_rx: &mut watch::Receiver<bool>) {
    if cancel_rx.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::adapters::MockClient;
    use crate::llm::base::TransportError;
    use std::time::Duration;
    use tokio::sync::mpsc;

    const DOC: &str = "Meeting with Acme Corp on 2024-01-01, discussed renewal terms.";

    #[tokio::test]
    async fn test_run_success_calls_each_stage_once() {
        let client = Arc::new(MockClient::success());
        let mut orchestrator = PipelineOrchestrator::new(client.clone());

        let result = orchestrator.run(DOC, None).await.unwrap();

        assert_eq!(result.analysis, crate::llm::adapters::mock_client::MOCK_ANALYSIS);
        assert_eq!(result.final_summary, crate::llm::adapters::mock_client::MOCK_SUMMARY);
        assert!(result.template_issues.is_empty());
        assert_eq!(result.interaction_log.len(), 3);

        for stage in Stage::ALL {
            assert_eq!(client.call_count(stage).await, 1);
            assert_eq!(orchestrator.tracker().status(stage).status, StageStatus::Complete);
        }
    }

    #[tokio::test]
    async fn test_system_prompt_precedes_user_prompt() {
        let client = Arc::new(MockClient::success());
        let mut orchestrator = PipelineOrchestrator::new(client.clone());

        orchestrator.run(DOC, None).await.unwrap();

        let calls = client.calls().await;
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].messages[0].role, crate::llm::base::Role::System);
        assert!(calls[0].messages[0].content.starts_with("You are a Document Analyzer agent"));
        // Generation sees the analysis output
        assert!(calls[1].messages[1]
            .content
            .contains(crate::llm::adapters::mock_client::MOCK_ANALYSIS));
    }

    #[tokio::test]
    async fn test_empty_system_prompt_is_omitted() {
        let client = Arc::new(MockClient::success());
        let mut profiles = Stage::ALL.map(builtin_profile);
        profiles[0].system_prompt = String::new();
        let mut orchestrator = PipelineOrchestrator::new(client.clone()).with_profiles(profiles);

        orchestrator.run(DOC, None).await.unwrap();

        let calls = client.calls().await;
        assert_eq!(calls[0].messages.len(), 1);
        assert_eq!(calls[1].messages.len(), 2);
    }

    #[tokio::test]
    async fn test_analysis_failure_aborts_everything() {
        let client = Arc::new(MockClient::failing_at(
            Stage::Analysis,
            TransportError::Auth("invalid key".into()),
        ));
        let mut orchestrator = PipelineOrchestrator::new(client.clone());

        let err = orchestrator.run(DOC, None).await.unwrap_err();

        assert_eq!(err.stage, Stage::Analysis);
        assert_eq!(err.cause, StageFailure::Transport(TransportError::Auth("invalid key".into())));
        assert_eq!(orchestrator.tracker().status(Stage::Analysis).status, StageStatus::Error);
        assert_eq!(orchestrator.tracker().status(Stage::Generation).status, StageStatus::Waiting);
        assert_eq!(client.call_count(Stage::Generation).await, 0);
        assert!(!orchestrator.tracker().has_active_stage());
    }

    #[tokio::test]
    async fn test_flag_policy_records_template_issues() {
        let client = Arc::new(
            MockClient::success().with_reply(Stage::Review, Ok("Just a paragraph of prose.".to_string())),
        );
        let mut orchestrator = PipelineOrchestrator::new(client);

        let result = orchestrator.run(DOC, None).await.unwrap();

        assert_eq!(result.final_summary, "Just a paragraph of prose.");
        assert!(result
            .template_issues
            .contains(&"missing section 'Client Name'".to_string()));
        // Flag message plus three completion messages
        assert_eq!(result.interaction_log.len(), 4);
        assert!(result.interaction_log[2].message.starts_with("Template check flagged"));
    }

    #[tokio::test]
    async fn test_ignore_policy_skips_checks() {
        let client = Arc::new(
            MockClient::success().with_reply(Stage::Review, Ok("Just prose.".to_string())),
        );
        let mut orchestrator = PipelineOrchestrator::new(client).with_options(PipelineOptions {
            template_policy: TemplatePolicy::Ignore,
            content_retries: 0,
        });

        let result = orchestrator.run(DOC, None).await.unwrap();

        assert!(result.template_issues.is_empty());
        assert_eq!(result.interaction_log.len(), 3);
    }

    #[tokio::test]
    async fn test_enforce_policy_regenerates_then_succeeds() {
        let client = Arc::new(
            MockClient::success().with_queued(Stage::Generation, Ok("**Bad** summary".to_string())),
        );
        let mut orchestrator = PipelineOrchestrator::new(client.clone()).with_options(PipelineOptions {
            template_policy: TemplatePolicy::Enforce,
            content_retries: 1,
        });

        let result = orchestrator.run(DOC, None).await.unwrap();

        assert_eq!(client.call_count(Stage::Generation).await, 2);
        assert_eq!(result.initial_summary, crate::llm::adapters::mock_client::MOCK_SUMMARY);
    }

    #[tokio::test]
    async fn test_enforce_policy_fails_with_content_error() {
        let client = Arc::new(
            MockClient::success().with_reply(Stage::Generation, Ok("No structure at all".to_string())),
        );
        let mut orchestrator = PipelineOrchestrator::new(client.clone()).with_options(PipelineOptions {
            template_policy: TemplatePolicy::Enforce,
            content_retries: 1,
        });

        let err = orchestrator.run(DOC, None).await.unwrap_err();

        assert_eq!(err.stage, Stage::Generation);
        assert!(matches!(err.cause, StageFailure::Content(_)));
        assert_eq!(client.call_count(Stage::Generation).await, 2);
        assert_eq!(client.call_count(Stage::Review).await, 0);
        assert_eq!(orchestrator.tracker().status(Stage::Review).status, StageStatus::Waiting);
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let client = Arc::new(MockClient::success());
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let mut orchestrator = PipelineOrchestrator::new(client.clone()).with_cancellation(cancel_rx);

        cancel_tx.send(true).unwrap();
        let err = orchestrator.run(DOC, None).await.unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(err.stage, Stage::Analysis);
        assert!(client.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_cancel_sender_does_not_cancel() {
        let client = Arc::new(MockClient::success());
        let (cancel_tx, cancel_rx) = watch::channel(false);
        drop(cancel_tx);
        let mut orchestrator = PipelineOrchestrator::new(client).with_cancellation(cancel_rx);

        assert!(orchestrator.run(DOC, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_emits_lifecycle_events() {
        let client = Arc::new(MockClient::success());
        let (tx, mut rx) = mpsc::channel(100);
        let run_id = Uuid::new_v4();
        let mut orchestrator = PipelineOrchestrator::new(client)
            .with_events(tx)
            .with_run_id(run_id);

        orchestrator.run(DOC, None).await.unwrap();
        drop(orchestrator);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        assert!(events.iter().all(|event| event.run_id() == Some(run_id)));
        assert_eq!(events.last(), Some(&Event::RunCompleted { run_id }));
        let logged = events
            .iter()
            .filter(|event| matches!(event, Event::InteractionLogged { .. }))
            .count();
        assert_eq!(logged, 3);
    }

    #[tokio::test]
    async fn test_undrained_event_channel_does_not_stall_run() {
        let client = Arc::new(MockClient::success().with_delay(Duration::from_secs(30)));
        let (tx, _rx) = mpsc::channel(1);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let mut orchestrator = PipelineOrchestrator::new(client)
            .with_events(tx)
            .with_cancellation(cancel_rx);

        let run = tokio::spawn(async move { orchestrator.run(DOC, None).await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel_tx.send_replace(true);

        let err = tokio::time::timeout(Duration::from_secs(1), run)
            .await
            .expect("run should stop promptly")
            .unwrap()
            .unwrap_err();
        assert!(err.is_cancelled());

        let (tx, _rx) = mpsc::channel(1);
        let mut orchestrator =
            PipelineOrchestrator::new(Arc::new(MockClient::success())).with_events(tx);
        let result = tokio::time::timeout(Duration::from_secs(1), orchestrator.run(DOC, None)).await;
        assert!(matches!(result, Ok(Ok(_))));
    }

    #[tokio::test]
    async fn test_second_run_starts_fresh() {
        let client = Arc::new(MockClient::success());
        let mut orchestrator = PipelineOrchestrator::new(client);

        orchestrator.run(DOC, None).await.unwrap();
        let second = orchestrator.run(DOC, None).await.unwrap();

        assert_eq!(second.interaction_log.len(), 3);
    }
}
