//! Processing result and history models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::log_models::InteractionLogEntry;

/// Output of one successful pipeline run.
///
/// Produced exactly once per run; the caller owns it afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct ProcessingResult {
    /// Output of the Analysis stage.
    pub analysis: String,

    /// Output of the Generation stage.
    pub initial_summary: String,

    /// Output of the Review stage.
    pub final_summary: String,

    /// Snapshot of the run's interaction log, in insertion order.
    pub interaction_log: Vec<InteractionLogEntry>,

    /// Template problems found in the final summary.
    ///
    /// Empty when the summary conforms or when template checking is off.
    #[serde(default)]
    pub template_issues: Vec<String>,
}

/// A completed run kept in the session's history.
///
/// Created after a successful run and never mutated afterward.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct HistoryItem {
    /// Unique identifier of this history entry.
    #[ts(type = "string")]
    pub id: Uuid,

    /// When the run finished.
    pub timestamp: DateTime<Utc>,

    /// Name of the uploaded document.
    pub filename: String,

    /// Client name taken from the final summary.
    pub client_name: String,

    /// The final summary text.
    pub summary: String,

    /// The complete result of the run.
    pub full_result: ProcessingResult,
}
