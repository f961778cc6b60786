//! The required summary layout and conformance checks against it.

use thiserror::Error;

/// Returned when no client name can be read from a summary.
pub const UNKNOWN_CLIENT: &str = "Unknown Client";

/// Marker of the line carrying the client name.
pub const CLIENT_NAME_MARKER: &str = "Client Name:";

/// Placeholder the model is told to use for missing information.
pub const NOT_AVAILABLE: &str = "[Information not available in document]";

/// Section headings every summary must contain, in this order.
pub const REQUIRED_HEADINGS: [&str; 10] = [
    "Client Interaction Summary",
    "Date of Meeting:",
    "Participants:",
    "Client Name:",
    "Meeting Type:",
    "1. Objectives of the Meeting",
    "2. Key Discussion Points",
    "3. Decisions Made",
    "4. Action Items",
    "Key Takeaways",
];

/// The summary layout with per-section guidance, as shown to the model.
pub const SUMMARY_TEMPLATE: &str = "Client Interaction Summary
Date of Meeting: [Insert Date]
Participants: [List Participants]
Client Name: [Insert Client Name]
Meeting Type: [Call/Meeting/Other]

1. Objectives of the Meeting :
[Clearly state the purpose and goals of the meeting]

2. Key Discussion Points :
[List the main topics, issues, and subjects discussed during the interaction]

3. Decisions Made :
[Document any decisions, agreements, or resolutions reached during the meeting]

4. Action Items :
[List specific action items with responsible for RM and Client separately and timelines where mentioned]

Key Takeaways :
[Summarize the most important topics in bullet points, outcomes, or next steps from the meeting]";

/// Summary text does not follow the required layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Summary does not follow the required template: {}", .issues.join("; "))]
pub struct ContentError {
    pub issues: Vec<String>,
}

/// Outcome of checking a summary against [`REQUIRED_HEADINGS`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateReport {
    /// Headings that never appear.
    pub missing: Vec<&'static str>,
    /// Headings that appear, but before a heading that should precede them.
    pub out_of_order: Vec<&'static str>,
    /// Whether the text uses `**` emphasis.
    pub emphasis_markup: bool,
}

impl TemplateReport {
    pub fn is_conformant(&self) -> bool {
        self.missing.is_empty() && self.out_of_order.is_empty() && !self.emphasis_markup
    }

    /// Human-readable problems, empty when conformant.
    pub fn issues(&self) -> Vec<String> {
        let mut issues: Vec<String> = self
            .missing
            .iter()
            .map(|heading| format!("missing section '{}'", heading.trim_end_matches(':')))
            .collect();
        issues.extend(
            self.out_of_order
                .iter()
                .map(|heading| format!("section '{}' is out of order", heading.trim_end_matches(':'))),
        );
        if self.emphasis_markup {
            issues.push("contains ** emphasis markup".to_string());
        }
        issues
    }

    pub fn into_result(self) -> Result<(), ContentError> {
        if self.is_conformant() {
            Ok(())
        } else {
            Err(ContentError {
                issues: self.issues(),
            })
        }
    }
}

/// Checks that `summary` contains every required heading, in order, without
/// emphasis markup.
///
/// Headings are matched at the start of a line, ignoring case, surrounding
/// whitespace and leading `#`/`*` decoration.
pub fn check_conformance(summary: &str) -> TemplateReport {
    let lines: Vec<String> = summary.lines().map(normalize_line).collect();
    let mut report = TemplateReport {
        emphasis_markup: summary.contains("**"),
        ..TemplateReport::default()
    };

    let mut cursor = 0;
    for heading in REQUIRED_HEADINGS {
        let needle = heading.to_lowercase();
        let position = |range: &[String]| range.iter().position(|line| line.starts_with(&needle));

        if let Some(offset) = position(&lines[cursor..]) {
            cursor += offset + 1;
        } else if position(&lines[..cursor]).is_some() {
            report.out_of_order.push(heading);
        } else {
            report.missing.push(heading);
        }
    }

    report
}

/// Reads the client name from the first line containing `Client Name:`.
///
/// The text after the marker is trimmed and stripped of `[` and `]`. Returns
/// [`UNKNOWN_CLIENT`] when no such line exists or the value is empty.
///
/// ```
/// use sk_core::engine::template::extract_client_name;
///
/// assert_eq!(extract_client_name("Client Name: [Acme Corp]"), "Acme Corp");
/// assert_eq!(extract_client_name("no client here"), "Unknown Client");
/// ```
pub fn extract_client_name(summary: &str) -> String {
    summary
        .lines()
        .find(|line| line.contains(CLIENT_NAME_MARKER))
        .and_then(|line| line.rsplit(CLIENT_NAME_MARKER).next())
        .map(|value| value.trim().replace(['[', ']'], "").trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn normalize_line(line: &str) -> String {
    line.trim()
        .trim_start_matches(['#', '*'])
        .trim_start()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFORMANT: &str = "Client Interaction Summary
Date of Meeting: 2024-01-01
Participants: Jane Doe (RM), John Smith (Acme Corp)
Client Name: [Acme Corp]
Meeting Type: Meeting

1. Objectives of the Meeting :
Discuss renewal terms.

2. Key Discussion Points :
- Renewal pricing

3. Decisions Made :
[Information not available in document]

4. Action Items :
RM: Send revised terms.

Key Takeaways :
- Renewal on track.";

    #[test]
    fn test_extract_client_name() {
        assert_eq!(extract_client_name(CONFORMANT), "Acme Corp");
        assert_eq!(extract_client_name("Client Name:   Globex  "), "Globex");
        assert_eq!(extract_client_name("Participants: x\nNo client line"), UNKNOWN_CLIENT);
        assert_eq!(extract_client_name("Client Name: []"), UNKNOWN_CLIENT);
        assert_eq!(extract_client_name(""), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_extract_client_name_uses_first_matching_line() {
        let text = "Client Name: First Co\nClient Name: Second Co";
        assert_eq!(extract_client_name(text), "First Co");
    }

    #[test]
    fn test_conformant_summary() {
        let report = check_conformance(CONFORMANT);
        assert!(report.is_conformant(), "{:?}", report.issues());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_template_itself_is_conformant() {
        assert!(check_conformance(SUMMARY_TEMPLATE).is_conformant());
    }

    #[test]
    fn test_missing_sections() {
        let text = CONFORMANT.replace("3. Decisions Made :", "Decisions:");
        let report = check_conformance(&text);

        assert_eq!(report.missing, vec!["3. Decisions Made"]);
        assert!(report.out_of_order.is_empty());

        let err = report.into_result().unwrap_err();
        assert_eq!(err.issues, vec!["missing section '3. Decisions Made'".to_string()]);
    }

    #[test]
    fn test_out_of_order_sections() {
        let text = "Client Interaction Summary
Date of Meeting: x
Participants: x
Client Name: x
Meeting Type: x
2. Key Discussion Points :
1. Objectives of the Meeting :
3. Decisions Made :
4. Action Items :
Key Takeaways :";
        let report = check_conformance(text);

        assert!(report.missing.is_empty());
        assert_eq!(report.out_of_order, vec!["2. Key Discussion Points"]);
    }

    #[test]
    fn test_emphasis_markup_is_flagged() {
        let text = CONFORMANT.replace("Key Takeaways :", "**Key Takeaways :**");
        let report = check_conformance(&text);

        assert!(report.missing.is_empty(), "decorated headings still match");
        assert!(report.emphasis_markup);
        assert!(!report.is_conformant());
    }
}
