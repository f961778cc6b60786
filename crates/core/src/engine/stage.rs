//! Per-stage descriptors and built-in agent personas.

use sk_protocol::agent_models::StageProfile;
use sk_protocol::stage_models::Stage;

/// Static description of how a stage reports its progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDescriptor {
    pub stage: Stage,
    /// Task shown while the stage is active.
    pub active_task: &'static str,
    /// Task shown once the stage completed.
    pub complete_task: &'static str,
    /// Log message recorded on completion.
    pub complete_message: &'static str,
    /// Whether the stage output must follow the summary template.
    pub produces_summary: bool,
}

impl StageDescriptor {
    pub fn for_stage(stage: Stage) -> Self {
        match stage {
            Stage::Analysis => Self {
                stage,
                active_task: "Analyzing document structure",
                complete_task: "Document analysis complete",
                complete_message: "Analyzed document and identified key components",
                produces_summary: false,
            },
            Stage::Generation => Self {
                stage,
                active_task: "Generating structured summary",
                complete_task: "Summary generation complete",
                complete_message: "Generated structured summary with required format",
                produces_summary: true,
            },
            Stage::Review => Self {
                stage,
                active_task: "Reviewing summary quality",
                complete_task: "Quality review complete",
                complete_message: "Completed final review and provided polished summary",
                produces_summary: true,
            },
        }
    }
}

const ANALYZER_PROMPT: &str = "You are a Document Analyzer agent. Your role is to:
1. Analyze the structure and content of client interaction documents
2. Identify key sections, participants, and topics discussed
3. Extract relevant information for summary generation
4. Pass findings to the Summary Generator agent

Be thorough and systematic in your analysis.";

const GENERATOR_PROMPT: &str = "You are an AI assistant designed to create concise and informative summaries of client interactions for Relationship Managers (RMs). Your task is to analyze the content of a client meeting or call and generate a structured summary.

You MUST use the Client Interaction Summary format (WITHOUT any ** markdown formatting) with these headings in order: Date of Meeting, Participants, Client Name, Meeting Type, 1. Objectives of the Meeting, 2. Key Discussion Points, 3. Decisions Made, 4. Action Items, Key Takeaways.

Keep the language professional and objective. If information for any section is not available in the document, note \"[Information not available in document]\".";

const REVIEWER_PROMPT: &str = "You are a Quality Reviewer agent. Your role is to:
1. Review summaries generated by the Summary Generator
2. Check for completeness, accuracy, and professional tone
3. Ensure all key points and action items are captured
4. Suggest improvements or approve the final summary
5. Provide the final polished summary

Be critical but constructive in your review.";

/// The persona used for `stage` when no profile file overrides it.
pub fn builtin_profile(stage: Stage) -> StageProfile {
    let (description, system_prompt) = match stage {
        Stage::Analysis => ("Analyzes client interaction documents", ANALYZER_PROMPT),
        Stage::Generation => ("Writes structured client interaction summaries", GENERATOR_PROMPT),
        Stage::Review => ("Reviews and polishes summaries", REVIEWER_PROMPT),
    };

    StageProfile {
        stage,
        name: stage.agent_name().to_string(),
        description: description.to_string(),
        system_prompt: system_prompt.to_string(),
    }
}
