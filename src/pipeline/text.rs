//! Per-page text extraction.
//!
//! [`TextSource`] is the seam between the mapping logic in
//! [`crate::extract`] and the PDF library: the batch driver only needs "the
//! text of every page, in order". [`PdfiumTextSource`] is the production
//! implementation; tests substitute canned texts.

use crate::error::SlideError;
use crate::pipeline::render::{bind_pdfium, ensure_pdf_exists, open_document};
use std::path::Path;
use tracing::debug;

/// Produces the text of every page of a PDF, in document order.
///
/// `None` marks a page without an extractable text layer. Implementations
/// are called from tokio's blocking pool and may block.
pub trait TextSource: Send + Sync {
    fn page_texts(&self, pdf_path: &Path) -> Result<Vec<Option<String>>, SlideError>;
}

/// Reads each page's text layer through pdfium.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfiumTextSource;

impl TextSource for PdfiumTextSource {
    fn page_texts(&self, pdf_path: &Path) -> Result<Vec<Option<String>>, SlideError> {
        ensure_pdf_exists(pdf_path)?;
        let pdfium = bind_pdfium()?;
        let document = open_document(&pdfium, pdf_path)?;

        let mut texts = Vec::new();
        for (idx, page) in document.pages().iter().enumerate() {
            let text = page
                .text()
                .map_err(|e| SlideError::TextExtractionFailed {
                    page: idx + 1,
                    detail: format!("{:?}", e),
                })?
                .all();
            debug!("Page {}: {} chars of text", idx + 1, text.chars().count());
            texts.push(non_empty(text));
        }

        Ok(texts)
    }
}

/// Normalise line endings; an all-whitespace page counts as having no text.
fn non_empty(text: String) -> Option<String> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
