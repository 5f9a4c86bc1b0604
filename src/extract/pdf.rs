//! Pitch deck text extraction

use crate::error::AnalysisError;
use crate::models::{Document, MediaKind};
use crate::Result;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

/// Concatenate the text of every page, in page order, with no separator.
///
/// A PDF without a text layer yields an empty string.
pub fn extract_text(document: &Document) -> Result<String> {
    if document.kind != MediaKind::Pdf {
        return Err(AnalysisError::UnsupportedFormat(format!(
            "expected a PDF pitch deck, got {} ({})",
            document.kind, document.filename
        )));
    }

    // pdf-extract panics on some malformed inputs
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&document.bytes)
    }))
    .map_err(|_| {
        AnalysisError::ExtractionError(format!(
            "PDF parser aborted on {}",
            document.filename
        ))
    })?
    .map_err(|e| {
        AnalysisError::ExtractionError(format!(
            "failed to parse {} as PDF: {}",
            document.filename, e
        ))
    })?;

    debug!(
        filename = %document.filename,
        page_count = pages.len(),
        "Extracted pitch deck pages"
    );

    let text: String = pages.concat();

    if text.trim().is_empty() {
        return Ok(String::new());
    }

    Ok(text)
}
