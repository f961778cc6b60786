//! Interaction log entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::stage_models::Stage;

/// One immutable record in a run's interaction log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct InteractionLogEntry {
    /// When the message was recorded.
    pub timestamp: DateTime<Utc>,

    /// Stage that recorded the message.
    pub agent: Stage,

    /// The recorded message.
    pub message: String,

    /// The stage's task at the time of recording.
    pub task: String,
}

impl InteractionLogEntry {
    pub fn new(agent: Stage, message: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            agent,
            message: message.into(),
            task: task.into(),
        }
    }

    /// Wall-clock time of the entry as `HH:MM:SS`.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}
