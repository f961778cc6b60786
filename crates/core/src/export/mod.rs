//! Rendering final summaries for download.
//!
//! Rendering is a pure function of the summary text. Lines that look like
//! section headings are rendered as headings; everything else passes through.

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

use crate::engine::template::REQUIRED_HEADINGS;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to export: summary is empty")]
    EmptySummary,

    #[error("Failed to write export to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Markdown,
    PlainText,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::PlainText => "txt",
        }
    }

    /// Pick the format from a path's extension, if it names one.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "txt" | "text" | "plain" => Ok(ExportFormat::PlainText),
            other => Err(format!("Unknown export format '{other}' (expected md or txt)")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Structural role of one summary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Title(&'a str),
    Heading(&'a str),
    Field { label: &'a str, value: &'a str },
    Bullet(&'a str),
    Body(&'a str),
}

const FIELD_LABELS: [&str; 4] = ["Date of Meeting", "Participants", "Client Name", "Meeting Type"];

pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    let bare = strip_emphasis(trimmed);

    if bare.eq_ignore_ascii_case(REQUIRED_HEADINGS[0]) {
        return LineKind::Title(bare);
    }

    if let Some((label, value)) = bare.split_once(':') {
        let label = label.trim();
        if FIELD_LABELS.iter().any(|known| known.eq_ignore_ascii_case(label)) {
            return LineKind::Field {
                label,
                value: value.trim(),
            };
        }
    }

    if is_numbered_heading(bare) || (bare.ends_with(':') && bare.len() <= 60) || bare != trimmed {
        return LineKind::Heading(bare.trim_end_matches(':').trim_end());
    }

    if let Some(item) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("• "))
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return LineKind::Bullet(item.trim());
    }

    LineKind::Body(trimmed)
}

/// `**Heading**` -> `Heading`.
fn strip_emphasis(line: &str) -> &str {
    line.strip_prefix("**")
        .and_then(|inner| inner.strip_suffix("**"))
        .map(str::trim)
        .unwrap_or(line)
}

/// `1. Objectives of the Meeting :` and similar.
fn is_numbered_heading(line: &str) -> bool {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0
        && digits <= 2
        && line[digits..].starts_with(". ")
        && line.trim_end().ends_with(':')
}

pub fn render(summary: &str, format: ExportFormat) -> Result<String, RenderError> {
    if summary.trim().is_empty() {
        return Err(RenderError::EmptySummary);
    }

    let mut out = String::with_capacity(summary.len() + 64);
    for line in summary.lines() {
        match (format, classify_line(line)) {
            (_, LineKind::Blank) => out.push('\n'),
            (ExportFormat::Markdown, LineKind::Title(title)) => {
                out.push_str(&format!("# {title}\n"));
            }
            (ExportFormat::Markdown, LineKind::Heading(heading)) => {
                out.push_str(&format!("\n## {heading}\n"));
            }
            (ExportFormat::Markdown, LineKind::Field { label, value }) => {
                out.push_str(&format!("**{label}:** {value}  \n"));
            }
            (ExportFormat::PlainText, LineKind::Title(title)) => {
                out.push_str(&format!("{}\n{}\n", title.to_uppercase(), "=".repeat(title.len())));
            }
            (ExportFormat::PlainText, LineKind::Heading(heading)) => {
                out.push_str(&format!("\n{heading}\n{}\n", "-".repeat(heading.chars().count())));
            }
            (ExportFormat::PlainText, LineKind::Field { label, value }) => {
                out.push_str(&format!("{label}: {value}\n"));
            }
            (_, LineKind::Bullet(item)) => out.push_str(&format!("- {item}\n")),
            (_, LineKind::Body(text)) => out.push_str(&format!("{text}\n")),
        }
    }

    Ok(out)
}

/// `summary_YYYYmmdd_HHMMSS.<ext>` for the given time.
pub fn export_filename(at: DateTime<Utc>, format: ExportFormat) -> String {
    format!("summary_{}.{}", at.format("%Y%m%d_%H%M%S"), format.extension())
}

/// Render `summary` and write it to `path`.
pub fn write_export(path: &Path, summary: &str, format: ExportFormat) -> Result<(), RenderError> {
    let rendered = render(summary, format)?;
    std::fs::write(path, rendered).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), format = %format, "Exported summary");
    Ok(())
}
