//! Document Extractor — turns an uploaded resume (PDF or DOCX) into plain text.
//!
//! The format comes from the caller-supplied file name, never from the bytes.

use std::panic;

use thiserror::Error;
use tracing::info;

mod docx;

#[cfg(test)]
pub(crate) use docx::tests::build_docx;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported document type for '{0}': expected a .pdf or .docx file")]
    UnsupportedFormat(String),

    #[error("Error reading PDF: {0}")]
    Pdf(String),

    #[error("Error reading DOCX: {0}")]
    Docx(String),
}

/// The two accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Resolves the format from the file name suffix (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractError> {
        let lower = file_name.trim().to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            Ok(DocumentKind::Pdf)
        } else if lower.ends_with(".docx") {
            Ok(DocumentKind::Docx)
        } else {
            Err(ExtractError::UnsupportedFormat(file_name.to_string()))
        }
    }
}

/// Extracts the plain text of a document. No partial text is ever returned on failure.
///
/// This is CPU-bound; async callers should run it on the blocking pool.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let kind = DocumentKind::from_file_name(file_name)?;
    let text = match kind {
        DocumentKind::Pdf => extract_pdf_text(bytes)?,
        DocumentKind::Docx => docx::extract_paragraphs(bytes)?.join("\n"),
    };

    info!(
        "Extracted {} characters from {:?} document '{}'",
        text.chars().count(),
        kind,
        file_name
    );
    Ok(text)
}

/// Page texts come back from pdf-extract already concatenated in page order.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
        Err(_) => Err(ExtractError::Pdf("PDF parser aborted on malformed input".to_string())),
    }
}
