use crate::extract::error::ExtractionError;
use crate::extract::DocumentTextExtractor;
use sk_protocol::document_models::DocumentKind;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Reads `.txt` uploads as UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl DocumentTextExtractor for PlainTextExtractor {
    fn supports(&self, kind: DocumentKind) -> bool {
        kind == DocumentKind::PlainText
    }

    fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
        if !self.supports(kind) {
            return Err(ExtractionError::Unsupported(kind));
        }

        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ExtractionError::InvalidEncoding(e.to_string()))?;

        Ok(text.replace("\r\n", "\n"))
    }
}
