//! Per-stage status state machine for one run.
//!
//! The tracker owns the run's [`InteractionLog`] and forwards every change
//! to the host as an [`Event`] when an events channel is attached.

use crate::state::log::InteractionLog;
use crate::state::publish;
use sk_protocol::ipc::Event;
use sk_protocol::log_models::InteractionLogEntry;
use sk_protocol::stage_models::{AgentStatus, Stage, StageStatus};
use tokio::sync::mpsc::Sender;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AgentStatusTracker {
    run_id: Uuid,
    statuses: [AgentStatus; 3],
    log: InteractionLog,
    events_tx: Option<Sender<Event>>,
}

impl AgentStatusTracker {
    /// A tracker with every stage waiting and an empty log.
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            statuses: Stage::ALL.map(AgentStatus::waiting),
            log: InteractionLog::new(),
            events_tx: None,
        }
    }

    pub fn with_events(mut self, events_tx: Sender<Event>) -> Self {
        self.events_tx = Some(events_tx);
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Sets status and task without logging.
    ///
    /// Returns `false` and leaves the stage untouched when the transition
    /// would move the stage backwards or out of a terminal status.
    pub async fn set_status(&mut self, stage: Stage, status: StageStatus, task: &str) -> bool {
        if !self.apply(stage, status, task) {
            return false;
        }
        self.emit(Event::StageStatusUpdate {
            run_id: self.run_id,
            stage,
            status,
            task: task.to_string(),
        });
        true
    }

    /// Sets status and task and, for a non-empty message, records it on the
    /// stage and in the interaction log.
    pub async fn record_message(
        &mut self,
        stage: Stage,
        status: StageStatus,
        task: &str,
        message: &str,
    ) -> bool {
        if !self.set_status(stage, status, task).await {
            return false;
        }
        if message.is_empty() {
            return true;
        }

        self.statuses[stage.index()].messages.push(message.to_string());
        let entry = InteractionLogEntry::new(stage, message, task);
        self.log.append(entry.clone());
        self.emit(Event::InteractionLogged {
            run_id: self.run_id,
            entry,
        });
        true
    }

    pub fn status(&self, stage: Stage) -> &AgentStatus {
        &self.statuses[stage.index()]
    }

    /// All stage statuses in execution order.
    pub fn snapshot(&self) -> Vec<AgentStatus> {
        self.statuses.to_vec()
    }

    pub fn log(&self) -> &InteractionLog {
        &self.log
    }

    /// Whether any stage is still active.
    pub fn has_active_stage(&self) -> bool {
        self.statuses
            .iter()
            .any(|status| status.status == StageStatus::Active)
    }

    fn apply(&mut self, stage: Stage, next: StageStatus, task: &str) -> bool {
        let current = &mut self.statuses[stage.index()];
        if !current.status.can_transition_to(next) {
            warn!(
                run_id = %self.run_id,
                stage = %stage,
                from = %current.status,
                to = %next,
                "Rejected stage status regression"
            );
            return false;
        }
        current.status = next;
        current.current_task = task.to_string();
        true
    }

    fn emit(&self, event: Event) {
        if let Some(events_tx) = &self.events_tx {
            publish(events_tx, event);
        }
    }
}
