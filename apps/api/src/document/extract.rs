//! Byte decoding for uploaded résumé documents.
//!
//! Decoding stops at `bytes -> text`; everything downstream works on
//! plain text only.

use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

/// Supported upload formats, inferred from the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// `None` for unsupported extensions (including `.docx`, which needs
    /// an external converter).
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if lower.ends_with(".txt") {
            Some(DocumentKind::Text)
        } else {
            None
        }
    }
}

/// Decodes raw upload bytes into text. Empty output is an input-shape
/// error, not a silent empty document.
pub fn extract_text(kind: DocumentKind, content: &Bytes) -> Result<String, AppError> {
    let text = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(content)
            .map_err(|e| AppError::Validation(format!("Error extracting PDF: {e}")))?,
        DocumentKind::Text => String::from_utf8_lossy(content).into_owned(),
    };

    info!("Extracted text length: {} chars", text.chars().count());

    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from the uploaded file".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_filename_is_case_insensitive() {
        assert_eq!(
            DocumentKind::from_filename("Resume.PDF"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::from_filename("resume.txt"),
            Some(DocumentKind::Text)
        );
    }

    #[test]
    fn test_unsupported_extensions_are_rejected() {
        assert_eq!(DocumentKind::from_filename("resume.docx"), None);
        assert_eq!(DocumentKind::from_filename("resume.exe"), None);
        assert_eq!(DocumentKind::from_filename("resume"), None);
    }

    #[test]
    fn test_plain_text_decodes_lossily() {
        let content = Bytes::from_static(b"Jane Doe\nEngineer");
        let text = extract_text(DocumentKind::Text, &content).unwrap();
        assert_eq!(text, "Jane Doe\nEngineer");
    }

    #[test]
    fn test_empty_document_is_an_input_shape_error() {
        let content = Bytes::from_static(b"   \n  ");
        let err = extract_text(DocumentKind::Text, &content).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
