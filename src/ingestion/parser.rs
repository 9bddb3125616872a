//! Source document text extraction

use std::path::Path;

use crate::error::{Error, Result};

/// Sentinel indexed in place of documents whose text cannot be extracted
/// (e.g. scanned PDFs). Keeps the session usable instead of failing it.
pub const EMPTY_EXTRACTION_SENTINEL: &str = "Document content could not be extracted";

/// Extract plain text from a source document.
///
/// Supports PDF (via pdf-extract) and plain text/markdown. Extraction that
/// yields only whitespace is replaced by [`EMPTY_EXTRACTION_SENTINEL`].
pub fn extract_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::Indexing(format!(
            "Source not found: {}",
            path.display()
        )));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let text = match ext.as_str() {
        "pdf" => pdf_extract::extract_text(path)
            .map_err(|e| Error::Indexing(format!("PDF extraction failed: {}", e)))?,
        "txt" | "md" | "markdown" | "text" => std::fs::read_to_string(path)?,
        other => {
            return Err(Error::Indexing(format!(
                "Unsupported file type: .{}",
                other
            )))
        }
    };

    if text.trim().is_empty() {
        tracing::warn!("Text extraction returned empty content for {}", path.display());
        return Ok(EMPTY_EXTRACTION_SENTINEL.to_string());
    }

    Ok(text)
}
