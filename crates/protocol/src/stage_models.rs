//! Pipeline stage and per-stage status models.
//!
//! A run always walks the same three stages in order. Each stage exposes an
//! [`AgentStatus`] that observers can poll or receive through events.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// One dependency-ordered step of the summary pipeline.
///
/// Serialized in lowercase (`"analysis"`), displayed capitalized
/// (`"Analysis"`).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Extracts participants, topics, decisions and context from the document.
    Analysis,

    /// Writes the first structured summary from the analysis.
    Generation,

    /// Validates the summary against the template and polishes it.
    Review,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 3] = [Stage::Analysis, Stage::Generation, Stage::Review];

    /// Position of this stage in [`Stage::ALL`].
    pub fn index(self) -> usize {
        match self {
            Stage::Analysis => 0,
            Stage::Generation => 1,
            Stage::Review => 2,
        }
    }

    /// Human-readable stage identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Analysis => "Analysis",
            Stage::Generation => "Generation",
            Stage::Review => "Review",
        }
    }

    /// Name of the agent persona that runs this stage.
    pub fn agent_name(self) -> &'static str {
        match self {
            Stage::Analysis => "DocumentAnalyzer",
            Stage::Generation => "SummaryGenerator",
            Stage::Review => "QualityReviewer",
        }
    }

    /// Parse a stage from its identifier or its agent name, case-insensitively.
    pub fn parse(value: &str) -> Option<Stage> {
        let value = value.trim();
        Stage::ALL.into_iter().find(|stage| {
            stage.as_str().eq_ignore_ascii_case(value)
                || stage.agent_name().eq_ignore_ascii_case(value)
        })
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of one stage within one run.
///
/// Progresses forward only: Waiting -> Active -> Complete | Error.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    /// The stage has not started yet.
    #[default]
    Waiting,

    /// The stage is calling the language model.
    Active,

    /// The stage produced its output.
    Complete,

    /// The stage failed or was cancelled.
    Error,
}

impl StageStatus {
    /// Whether no further transition is allowed within the run.
    pub fn is_terminal(self) -> bool {
        matches!(self, StageStatus::Complete | StageStatus::Error)
    }

    /// Whether moving from `self` to `next` keeps the status monotonic.
    ///
    /// Re-entering the current non-terminal status is allowed so the task
    /// text can be updated while a stage is active. A stage may fail before
    /// it becomes active, but only an active stage can complete.
    pub fn can_transition_to(self, next: StageStatus) -> bool {
        match (self, next) {
            (StageStatus::Waiting, StageStatus::Complete) => false,
            (StageStatus::Waiting, _) => true,
            (StageStatus::Active, StageStatus::Waiting) => false,
            (StageStatus::Active, _) => true,
            (StageStatus::Complete, _) | (StageStatus::Error, _) => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StageStatus::Waiting => "waiting",
            StageStatus::Active => "active",
            StageStatus::Complete => "complete",
            StageStatus::Error => "error",
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable state of one stage within a run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct AgentStatus {
    /// The stage this status belongs to.
    pub stage: Stage,

    /// Display name of the agent persona running the stage.
    pub agent: String,

    /// Current lifecycle status.
    pub status: StageStatus,

    /// Human-readable description of what the stage is doing.
    pub current_task: String,

    /// Messages recorded for this stage, oldest first. Append-only.
    pub messages: Vec<String>,
}

impl AgentStatus {
    /// A fresh, waiting status for `stage`.
    pub fn waiting(stage: Stage) -> Self {
        Self {
            stage,
            agent: stage.agent_name().to_string(),
            status: StageStatus::Waiting,
            current_task: String::new(),
            messages: Vec::new(),
        }
    }
}
