//! Turning uploaded document bytes into plain text.
//!
//! Extraction runs once, before the pipeline starts; its failure prevents the
//! run. Byte-level PDF/DOCX parsing lives outside this crate: hosts register
//! their own [`DocumentTextExtractor`] for those kinds.

pub mod error;
mod plain_text;

pub use error::ExtractionError;
pub use plain_text::PlainTextExtractor;

use sk_protocol::document_models::DocumentKind;
use std::sync::Arc;
use tracing::debug;

pub trait DocumentTextExtractor: Send + Sync {
    fn supports(&self, kind: DocumentKind) -> bool;

    fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError>;
}

/// Dispatches extraction to the first registered extractor supporting the
/// document kind.
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn DocumentTextExtractor>>,
}

impl Default for ExtractorRegistry {
    /// A registry handling plain text only.
    fn default() -> Self {
        Self {
            extractors: vec![Arc::new(PlainTextExtractor)],
        }
    }
}

impl ExtractorRegistry {
    /// A registry with no extractors.
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Register `extractor`. Later registrations take precedence.
    pub fn register(mut self, extractor: Arc<dyn DocumentTextExtractor>) -> Self {
        self.extractors.insert(0, extractor);
        self
    }

    pub fn supports(&self, kind: DocumentKind) -> bool {
        self.extractors.iter().any(|extractor| extractor.supports(kind))
    }

    /// Extract text, refusing documents whose text is blank.
    pub fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
        let extractor = self
            .extractors
            .iter()
            .find(|extractor| extractor.supports(kind))
            .ok_or(ExtractionError::Unsupported(kind))?;

        let text = extractor.extract(bytes, kind)?;
        if text.trim().is_empty() {
            return Err(ExtractionError::Empty);
        }

        debug!(kind = %kind, bytes = bytes.len(), chars = text.chars().count(), "Extracted document text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePdfExtractor;

    impl DocumentTextExtractor for FakePdfExtractor {
        fn supports(&self, kind: DocumentKind) -> bool {
            kind == DocumentKind::Pdf
        }

        fn extract(&self, bytes: &[u8], _kind: DocumentKind) -> Result<String, ExtractionError> {
            if bytes.starts_with(b"%PDF") {
                Ok("Extracted from PDF".to_string())
            } else {
                Err(ExtractionError::Corrupt("missing PDF header".to_string()))
            }
        }
    }

    #[test]
    fn test_default_registry_reads_plain_text() {
        let registry = ExtractorRegistry::default();

        assert_eq!(
            registry.extract(b"Meeting notes", DocumentKind::PlainText).unwrap(),
            "Meeting notes"
        );
        assert!(!registry.supports(DocumentKind::Docx));
        assert_eq!(
            registry.extract(b"PK\x03\x04", DocumentKind::Docx),
            Err(ExtractionError::Unsupported(DocumentKind::Docx))
        );
    }

    #[test]
    fn test_blank_text_is_refused() {
        let registry = ExtractorRegistry::default();
        assert_eq!(
            registry.extract(b"  \n\t ", DocumentKind::PlainText),
            Err(ExtractionError::Empty)
        );
    }

    #[test]
    fn test_registered_extractor_is_used() {
        let registry = ExtractorRegistry::default().register(Arc::new(FakePdfExtractor));

        assert_eq!(
            registry.extract(b"%PDF-1.7 ...", DocumentKind::Pdf).unwrap(),
            "Extracted from PDF"
        );
        assert!(matches!(
            registry.extract(b"garbage", DocumentKind::Pdf),
            Err(ExtractionError::Corrupt(_))
        ));
        assert!(ExtractorRegistry::empty().extract(b"x", DocumentKind::PlainText).is_err());
    }
}
