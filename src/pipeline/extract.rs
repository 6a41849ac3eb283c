//! PDF text extraction.
//!
//! `pdf-extract` is synchronous and can spend a while on large statements,
//! so the parse runs on the blocking pool. A panic inside the parser is
//! caught by the join handle and reported as an extraction failure.

use crate::error::RelayError;
use std::path::Path;
use tracing::debug;

/// Magic bytes every PDF starts with.
const PDF_MAGIC: &[u8] = b"%PDF";

/// Returns true if the buffer starts with the PDF header.
pub fn is_pdf(head: &[u8]) -> bool {
    head.starts_with(PDF_MAGIC)
}

/// Extract plain text from the PDF stored at `path`.
pub async fn extract_text(path: &Path) -> Result<String, RelayError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| RelayError::ExtractionFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    if !is_pdf(&bytes) {
        let head: Vec<u8> = bytes.iter().take(PDF_MAGIC.len()).copied().collect();
        return Err(RelayError::ExtractionFailed {
            path: path.to_path_buf(),
            detail: format!("not a PDF (first bytes: {head:?})"),
        });
    }

    let owned = path.to_path_buf();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| RelayError::ExtractionFailed {
            path: owned.clone(),
            detail: format!("extractor aborted: {e}"),
        })?
        .map_err(|e| RelayError::ExtractionFailed {
            path: owned,
            detail: e.to_string(),
        })?;

    debug!("Extracted {} chars from {}", text.len(), path.display());
    Ok(text)
}
