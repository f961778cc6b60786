//! Stage profile models for `.summary-kit/agents/*.md`.
//!
//! Each pipeline stage is run by an agent persona. A persona is defined as a
//! Markdown file with YAML front matter; the body is the system prompt sent
//! ahead of every request the stage makes.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::stage_models::Stage;

/// An agent persona bound to one pipeline stage.
///
/// # Example
///
/// ```markdown
/// ---
/// stage: analysis
/// name: DocumentAnalyzer
/// description: Analyzes client interaction documents
/// ---
///
/// You are an expert document analyzer specializing in client interactions.
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct StageProfile {
    /// Stage this persona runs.
    pub stage: Stage,

    /// Display name of the persona.
    pub name: String,

    /// Human-readable description of the persona's role.
    #[serde(default)]
    pub description: String,

    /// The body of the .md file, not part of the front matter.
    #[serde(skip)]
    pub system_prompt: String,
}
