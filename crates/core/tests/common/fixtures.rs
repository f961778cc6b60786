//! Test fixtures for documents, summaries and configuration.

#![allow(dead_code)]

use sk_core::engine::template::SUMMARY_TEMPLATE;
use tempfile::TempDir;

pub const ACME_DOCUMENT: &str = "Meeting with Acme Corp on 2024-01-01, discussed renewal terms.";

/// A template-conformant summary for `client`.
pub fn summary_for(client: &str) -> String {
    format!(
        "Client Interaction Summary
Date of Meeting: 2024-01-01
Participants: Jane Doe (RM), John Smith ({client})
Client Name: [{client}]
Meeting Type: Meeting

1. Objectives of the Meeting :
Discuss renewal terms.

2. Key Discussion Points :
- Renewal pricing
- Service levels

3. Decisions Made :
Renewal to proceed subject to revised pricing.

4. Action Items :
RM: Send revised proposal by Friday.
Client: Confirm budget.

Key Takeaways :
- Renewal is on track."
    )
}

/// The bare template with every field left blank; conformant by construction.
pub fn blank_template() -> &'static str {
    SUMMARY_TEMPLATE
}

/// Create a temporary project with a `.summary-kit/` using the mock provider
/// and enforcing the template.
pub fn create_test_project() -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let sk_dir = temp_dir.path().join(".summary-kit");
    std::fs::create_dir_all(sk_dir.join("agents"))?;

    std::fs::write(
        sk_dir.join("config.toml"),
        r#"
[llm]
provider = "mock"

[retry]
max_attempts = 2
initial_backoff_ms = 1

[pipeline]
template_policy = "enforce"
content_retries = 1

[history]
capacity = 5
"#,
    )?;

    std::fs::write(
        sk_dir.join("agents/review.md"),
        "---\nstage: review\nname: StrictReviewer\ndescription: Reviewer for tests\n---\n\nYou are a strict reviewer.\n",
    )?;

    Ok(temp_dir)
}
