//! Error types for document text extraction.

use sk_protocol::document_models::DocumentKind;
use thiserror::Error;

/// A document could not be turned into text. Raised before any stage runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("No extractor available for .{0} documents")]
    Unsupported(DocumentKind),

    #[error("Document is not valid text: {0}")]
    InvalidEncoding(String),

    #[error("Document is unreadable: {0}")]
    Corrupt(String),

    #[error("Document contains no text")]
    Empty,
}
