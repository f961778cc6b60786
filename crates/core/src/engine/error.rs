//! Error types for pipeline runs.

use crate::engine::template::ContentError;
use crate::llm::base::TransportError;
use sk_protocol::stage_models::Stage;
use thiserror::Error;

/// Why a stage did not produce output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageFailure {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Run was cancelled")]
    Cancelled,
}

/// A run aborted at `stage`. No partial result is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{stage} stage failed: {cause}")]
pub struct PipelineError {
    pub stage: Stage,
    pub cause: StageFailure,
}

impl PipelineError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.cause, StageFailure::Cancelled)
    }
}

/// Type alias for Result with PipelineError.
pub type PipelineResult<T> = Result<T, PipelineError>;
