//! Events streamed from the core to its host.
//!
//! A run reports progress over an async channel so the host (CLI, web
//! handler, UI) can render stage status live while the pipeline works in a
//! background task.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::log_models::InteractionLogEntry;
use crate::stage_models::{Stage, StageStatus};

/// Events sent from the core to the host.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "stageStatusUpdate",
///   "payload": {
///     "run_id": "uuid-here",
///     "stage": "generation",
///     "status": "active",
///     "task": "Generating structured summary"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A run has started.
    RunStarted {
        #[ts(type = "string")]
        run_id: Uuid,
        filename: String,
    },

    /// A stage's status or task changed.
    StageStatusUpdate {
        #[ts(type = "string")]
        run_id: Uuid,
        stage: Stage,
        status: StageStatus,
        task: String,
    },

    /// A message was appended to the run's interaction log.
    InteractionLogged {
        #[ts(type = "string")]
        run_id: Uuid,
        entry: InteractionLogEntry,
    },

    /// All stages completed.
    RunCompleted {
        #[ts(type = "string")]
        run_id: Uuid,
    },

    /// A stage failed and the run was aborted.
    RunFailed {
        #[ts(type = "string")]
        run_id: Uuid,
        stage: Stage,
        error: String,
    },

    /// The run was cancelled while `stage` was in flight.
    RunCancelled {
        #[ts(type = "string")]
        run_id: Uuid,
        stage: Stage,
    },

    /// A history item was added to the session's history.
    HistoryUpdated {
        #[ts(type = "string")]
        item_id: Uuid,
        client_name: String,
        len: usize,
    },
}

impl Event {
    /// The run this event belongs to, if any.
    pub fn run_id(&self) -> Option<Uuid> {
        match self {
            Event::RunStarted { run_id, .. }
            | Event::StageStatusUpdate { run_id, .. }
            | Event::InteractionLogged { run_id, .. }
            | Event::RunCompleted { run_id }
            | Event::RunFailed { run_id, .. }
            | Event::RunCancelled { run_id, .. } => Some(*run_id),
            Event::HistoryUpdated { .. } => None,
        }
    }
}
