//! Pure prompt builders, one per stage.
//!
//! Each [`StagePrompt`] variant carries exactly the prior outputs its stage
//! depends on, so a stage cannot be prompted before its inputs exist.

use crate::engine::template::{NOT_AVAILABLE, SUMMARY_TEMPLATE};
use sk_protocol::stage_models::Stage;

const ANALYSIS_OPENING: &str = "Analyze this client interaction document and identify:";
const GENERATION_OPENING: &str =
    "You are an AI assistant designed to create client interaction summaries for Relationship Managers (RMs).";
const REVIEW_OPENING: &str = "You are a Quality Reviewer for client interaction summaries.";

/// Heading-only form of the template used by the review checklist.
const REVIEW_STRUCTURE: &str = "Client Interaction Summary
Date of Meeting: [Insert Date]
Participants: [List Participants]
Client Name: [Insert Client Name]
Meeting Type: [Call/Meeting/Other]
1. Objectives of the Meeting
2. Key Discussion Points
3. Decisions Made
4. Action Items
Key Takeaways";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePrompt<'a> {
    Analysis {
        document: &'a str,
    },
    Generation {
        document: &'a str,
        analysis: &'a str,
        format_template: Option<&'a str>,
    },
    Review {
        document: &'a str,
        initial_summary: &'a str,
        format_template: Option<&'a str>,
    },
}

impl StagePrompt<'_> {
    pub fn stage(&self) -> Stage {
        match self {
            StagePrompt::Analysis { .. } => Stage::Analysis,
            StagePrompt::Generation { .. } => Stage::Generation,
            StagePrompt::Review { .. } => Stage::Review,
        }
    }

    /// Builds the user prompt text.
    pub fn render(&self) -> String {
        match *self {
            StagePrompt::Analysis { document } => analysis_prompt(document),
            StagePrompt::Generation {
                document,
                analysis,
                format_template,
            } => generation_prompt(document, analysis, format_template),
            StagePrompt::Review {
                document,
                initial_summary,
                format_template,
            } => review_prompt(document, initial_summary, format_template),
        }
    }
}

/// Recognises which stage a rendered prompt belongs to.
pub fn stage_for_prompt(prompt: &str) -> Option<Stage> {
    let prompt = prompt.trim_start();
    if prompt.starts_with(ANALYSIS_OPENING) {
        Some(Stage::Analysis)
    } else if prompt.starts_with(GENERATION_OPENING) {
        Some(Stage::Generation)
    } else if prompt.starts_with(REVIEW_OPENING) {
        Some(Stage::Review)
    } else {
        None
    }
}

fn analysis_prompt(document: &str) -> String {
    format!(
        "{ANALYSIS_OPENING}
1. Participants involved
2. Main topics discussed
3. Key decisions made
4. Action items mentioned
5. Important dates or deadlines
6. Overall meeting context

Document content:
{document}"
    )
}

fn generation_prompt(document: &str, analysis: &str, format_template: Option<&str>) -> String {
    let mut prompt = format!(
        "{GENERATION_OPENING}

Based on the document analysis provided below, generate a summary using this EXACT format (NO ** markdown formatting):

{SUMMARY_TEMPLATE}

Document Analysis Results:
{analysis}

Original Document Content:
{document}

Instructions:
- Use the exact format structure shown above with the same headings but NO ** markdown formatting
- Extract relevant information and place it under the appropriate sections
- If information for any section is not available, note \"{NOT_AVAILABLE}\"
- Keep language professional and objective
- Be concise while capturing all essential information
- If any part is unclear or missing context, note this in the relevant section
- Output clean, plain text without any ** formatting"
    );

    push_format_preferences(&mut prompt, format_template);
    prompt.push_str("\n\nGenerate the summary now following this exact format.");
    prompt
}

fn review_prompt(document: &str, initial_summary: &str, format_template: Option<&str>) -> String {
    let mut prompt = format!(
        "{REVIEW_OPENING} Review this summary to ensure it follows the exact required format and meets RM standards.

Summary to review:
{initial_summary}

Original document:
{document}

Required Format Check:
The summary MUST follow this exact structure (WITHOUT ** markdown formatting):

{REVIEW_STRUCTURE}

Verify that the summary:
1. Uses the exact format structure with proper headings but NO ** markdown formatting
2. Has all required sections present
3. Contains relevant information under each section
4. Notes \"{NOT_AVAILABLE}\" for missing information
5. Maintains professional and objective language
6. Is concise while capturing essential information
7. Notes any unclear parts or missing context in relevant sections
8. Does NOT contain any ** formatting - output should be clean plain text"
    );

    push_format_preferences(&mut prompt, format_template);
    prompt.push_str(
        "\n\nProvide the final, polished summary that strictly follows the required format WITHOUT any ** markdown formatting.",
    );
    prompt
}

fn push_format_preferences(prompt: &mut String, format_template: Option<&str>) {
    if let Some(preferences) = format_template
        .map(str::trim)
        .filter(|preferences| !preferences.is_empty())
    {
        prompt.push_str(
            "\n\nAdditional formatting preferences (apply them without changing the required headings):\n",
        );
        prompt.push_str(preferences);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "Meeting with Acme Corp on 2024-01-01, discussed renewal terms.";

    #[test]
    fn test_analysis_prompt_embeds_document() {
        let prompt = StagePrompt::Analysis { document: DOC }.render();

        assert!(prompt.contains("5. Important dates or deadlines"));
        assert!(prompt.ends_with(DOC));
        assert_eq!(stage_for_prompt(&prompt), Some(Stage::Analysis));
    }

    #[test]
    fn test_generation_prompt_embeds_template_and_analysis() {
        let prompt = StagePrompt::Generation {
            document: DOC,
            analysis: "Participants: Jane, John",
            format_template: None,
        }
        .render();

        assert!(prompt.contains(SUMMARY_TEMPLATE));
        assert!(prompt.contains("Document Analysis Results:\nParticipants: Jane, John"));
        assert!(prompt.contains(DOC));
        assert!(!prompt.contains("Additional formatting preferences"));
        assert_eq!(stage_for_prompt(&prompt), Some(Stage::Generation));
    }

    #[test]
    fn test_review_prompt_embeds_initial_summary() {
        let prompt = StagePrompt::Review {
            document: DOC,
            initial_summary: "Client Interaction Summary\nClient Name: Acme Corp",
            format_template: Some("Use British spelling."),
        }
        .render();

        assert!(prompt.contains("Summary to review:\nClient Interaction Summary\nClient Name: Acme Corp"));
        assert!(prompt.contains("8. Does NOT contain any ** formatting"));
        assert!(prompt.contains("Additional formatting preferences"));
        assert!(prompt.contains("Use British spelling."));
        assert_eq!(stage_for_prompt(&prompt), Some(Stage::Review));
    }

    #[test]
    fn test_blank_format_template_is_ignored() {
        let with_blank = StagePrompt::Generation {
            document: DOC,
            analysis: "a",
            format_template: Some("   "),
        };
        let without = StagePrompt::Generation {
            document: DOC,
            analysis: "a",
            format_template: None,
        };

        assert_eq!(with_blank.render(), without.render());
        assert_eq!(with_blank.stage(), Stage::Generation);
    }

    #[test]
    fn test_unrecognised_prompt() {
        assert_eq!(stage_for_prompt("Tell me a joke"), None);
    }
}
