//! Per-session context for running the summary pipeline.
//!
//! A `Session` is created when a user session starts and torn down at
//! logout. It owns the session's history, the selected-history pointer and
//! the registry of in-flight runs. Runs execute as background tasks; the host
//! follows them through the events channel and collects results with
//! [`Session::wait_for_run`].

use crate::config::models::AppConfig;
use crate::engine::stage::builtin_profile;
use crate::engine::{
    PipelineError, PipelineOptions, PipelineOrchestrator, PipelineResult, StageFailure,
};
use crate::extract::{ExtractionError, ExtractorRegistry};
use crate::history::{item_from_result, HistoryStore};
use crate::llm::base::LanguageModelClient;
use crate::state::publish;
use sk_protocol::agent_models::StageProfile;
use sk_protocol::document_models::DocumentKind;
use sk_protocol::ipc::Event;
use sk_protocol::result_models::{HistoryItem, ProcessingResult};
use sk_protocol::stage_models::Stage;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Run {0} not found")]
    RunNotFound(Uuid),

    #[error("Run task aborted: {0}")]
    RunAborted(String),
}

/// Registry entry of a run. It stays registered until its result is
/// claimed, so a run being waited on can still be cancelled.
struct RunHandle {
    cancel_tx: watch::Sender<bool>,
    /// Taken by the caller of [`Session::wait_for_run`].
    task: Option<JoinHandle<PipelineResult<ProcessingResult>>>,
}

impl RunHandle {
    /// The orchestrator holds the only receivers, so the channel closes
    /// exactly when the run task has ended.
    fn is_running(&self) -> bool {
        !self.cancel_tx.is_closed()
    }
}

pub struct Session {
    id: Uuid,
    client: Arc<dyn LanguageModelClient>,
    profiles: [StageProfile; 3],
    options: PipelineOptions,
    extractors: ExtractorRegistry,

    /// Shared by every run of this session; inserts are serialized.
    history: Arc<Mutex<HistoryStore>>,

    /// In-flight runs and finished runs not yet claimed.
    runs: Arc<Mutex<HashMap<Uuid, RunHandle>>>,

    selected: Mutex<Option<Uuid>>,

    events_tx: mpsc::Sender<Event>,
}

impl Session {
    /// Create a session with built-in personas, default options and a
    /// plain-text extractor.
    ///
    /// # Arguments
    ///
    /// * `client` - The language model client shared by all runs
    /// * `events_tx` - Channel receiving progress events of every run
    pub fn new(client: Arc<dyn LanguageModelClient>, events_tx: mpsc::Sender<Event>) -> Self {
        Self {
            id: Uuid::new_v4(),
            client,
            profiles: Stage::ALL.map(builtin_profile),
            options: PipelineOptions::default(),
            extractors: ExtractorRegistry::default(),
            history: Arc::new(Mutex::new(HistoryStore::new())),
            runs: Arc::new(Mutex::new(HashMap::new())),
            selected: Mutex::new(None),
            events_tx,
        }
    }

    /// Create a session using the profiles, options and history capacity
    /// from `config`.
    pub fn from_config(
        config: &AppConfig,
        client: Arc<dyn LanguageModelClient>,
        events_tx: mpsc::Sender<Event>,
    ) -> Self {
        let mut session = Self::new(client, events_tx)
            .with_profiles(config.stage_profiles())
            .with_options(config.pipeline_options());
        session.history = Arc::new(Mutex::new(HistoryStore::with_capacity(
            config.global.history.capacity,
        )));
        session
    }

    pub fn with_profiles(mut self, profiles: [StageProfile; 3]) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Start a run in the background and return its id immediately.
    ///
    /// On success the result is added to the front of the session history.
    /// Failed and cancelled runs leave the history untouched, including runs
    /// cancelled after their last stage returned.
    pub async fn start_run(
        &self,
        filename: impl Into<String>,
        document_text: String,
        format_template: Option<String>,
    ) -> Uuid {
        let filename = filename.into();
        let run_id = Uuid::new_v4();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let cancelled = cancel_rx.clone();

        let mut orchestrator = PipelineOrchestrator::new(Arc::clone(&self.client))
            .with_profiles(self.profiles.clone())
            .with_options(self.options)
            .with_events(self.events_tx.clone())
            .with_run_id(run_id)
            .with_cancellation(cancel_rx);

        publish(
            &self.events_tx,
            Event::RunStarted {
                run_id,
                filename: filename.clone(),
            },
        );
        info!(session_id = %self.id, run_id = %run_id, filename = %filename, "Run started");

        let history = Arc::clone(&self.history);
        let events_tx = self.events_tx.clone();

        let task = tokio::spawn(async move {
            let result = orchestrator
                .run(&document_text, format_template.as_deref())
                .await?;

            let item = item_from_result(filename, result.clone());
            let item_id = item.id;
            let client_name = item.client_name.clone();
            let len = {
                let mut history = history.lock().await;
                if *cancelled.borrow() {
                    None
                } else {
                    history.insert_front(item);
                    Some(history.len())
                }
            };

            let Some(len) = len else {
                info!(run_id = %run_id, "Run cancelled after review, result discarded");
                publish(
                    &events_tx,
                    Event::RunCancelled {
                        run_id,
                        stage: Stage::Review,
                    },
                );
                return Err(PipelineError {
                    stage: Stage::Review,
                    cause: StageFailure::Cancelled,
                });
            };

            publish(
                &events_tx,
                Event::HistoryUpdated {
                    item_id,
                    client_name,
                    len,
                },
            );

            Ok(result)
        });

        self.runs
            .lock()
            .await
            .insert(
                run_id,
                RunHandle {
                    cancel_tx,
                    task: Some(task),
                },
            );

        run_id
    }

    /// Wait for a run started with [`Session::start_run`] and claim its
    /// result. A run can be claimed once.
    ///
    /// The run stays cancellable while it is being waited on.
    pub async fn wait_for_run(&self, run_id: Uuid) -> Result<ProcessingResult, SessionError> {
        let task = self
            .runs
            .lock()
            .await
            .get_mut(&run_id)
            .and_then(|handle| handle.task.take())
            .ok_or(SessionError::RunNotFound(run_id))?;

        let joined = task.await;
        self.runs.lock().await.remove(&run_id);

        match joined {
            Ok(result) => Ok(result?),
            Err(e) => Err(SessionError::RunAborted(e.to_string())),
        }
    }

    /// Request cancellation of a run. The in-flight stage call is abandoned
    /// and the run ends with a cancelled `PipelineError`.
    pub async fn cancel_run(&self, run_id: Uuid) -> Result<(), SessionError> {
        let runs = self.runs.lock().await;
        let handle = runs.get(&run_id).ok_or(SessionError::RunNotFound(run_id))?;
        handle.cancel_tx.send_replace(true);
        info!(session_id = %self.id, run_id = %run_id, "Cancellation requested");
        Ok(())
    }

    /// Extract text from an uploaded document and run the pipeline on it.
    ///
    /// Extraction failures are returned before any stage runs.
    pub async fn process_upload(
        &self,
        filename: impl Into<String>,
        bytes: &[u8],
        kind: DocumentKind,
        format_template: Option<String>,
    ) -> Result<ProcessingResult, SessionError> {
        let filename = filename.into();
        let document_text = self.extractors.extract(bytes, kind).inspect_err(|e| {
            warn!(session_id = %self.id, filename = %filename, error = %e, "Extraction failed");
        })?;

        let run_id = self.start_run(filename, document_text, format_template).await;
        self.wait_for_run(run_id).await
    }

    /// Number of runs whose task has not finished yet.
    pub async fn active_runs(&self) -> usize {
        self.runs
            .lock()
            .await
            .values()
            .filter(|handle| handle.is_running())
            .count()
    }

    /// All history items, most recent first.
    pub async fn history(&self) -> Vec<HistoryItem> {
        self.history.lock().await.all()
    }

    /// The `n` most recent history items.
    pub async fn recent_history(&self, n: usize) -> Vec<HistoryItem> {
        self.history.lock().await.recent(n)
    }

    pub async fn history_item(&self, id: Uuid) -> Option<HistoryItem> {
        self.history.lock().await.by_id(id).cloned()
    }

    /// Point the session at a past result. Returns `None` and keeps the
    /// current selection when `id` is not in the history.
    pub async fn select_history(&self, id: Uuid) -> Option<HistoryItem> {
        let item = self.history_item(id).await?;
        *self.selected.lock().await = Some(id);
        Some(item)
    }

    /// The selected history item, if it is still in the history.
    pub async fn selected_history(&self) -> Option<HistoryItem> {
        let selected = *self.selected.lock().await;
        match selected {
            Some(id) => self.history_item(id).await,
            None => None,
        }
    }

    pub async fn clear_selection(&self) {
        *self.selected.lock().await = None;
    }

    /// Logout: cancel every run, including runs being waited on, wait for
    /// the tasks to stop, then drop the history and the selection.
    pub async fn teardown(&self) {
        let handles: Vec<(Uuid, RunHandle)> = self.runs.lock().await.drain().collect();

        for (_, handle) in &handles {
            handle.cancel_tx.send_replace(true);
        }
        for (run_id, handle) in handles {
            match handle.task {
                Some(task) => {
                    if let Err(e) = task.await {
                        warn!(session_id = %self.id, run_id = %run_id, error = %e, "Run task aborted during teardown");
                    }
                }
                // Claimed by a waiter; the channel closes when the task ends
                None => handle.cancel_tx.closed().await,
            }
        }

        self.history.lock().await.clear();
        self.clear_selection().await;
        info!(session_id = %self.id, "Session torn down");
    }
}
