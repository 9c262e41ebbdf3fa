//! PDF text extraction with page attribution.
//!
//! Turns an uploaded PDF into plain text plus a page-offset table.
//! Page texts are joined with a single newline; each page that
//! yields non-empty text gets a span over the concatenated text, so
//! spans are disjoint and increase with page number. Offsets are
//! measured in characters, matching the chunker's offset arithmetic.

use lopdf::Document;

use crate::core::error::{DocQaError, Result};
use crate::core::types::PageSpan;

/// Result of extracting a document
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Concatenated text of all non-empty pages
    pub text: String,

    /// Total page count of the source document
    pub pages: u32,

    /// Character span of each non-empty page within `text`
    pub page_spans: Vec<PageSpan>,
}

/// Extract text and a page-offset table from PDF bytes
pub fn extract_pdf_text(bytes: &[u8]) -> Result<ExtractedDocument> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| DocQaError::ExtractionFailed(format!("failed to parse PDF: {e}")))?;

    let pages = doc.get_pages();
    let page_count = pages.len() as u32;

    let mut parts: Vec<String> = Vec::new();
    let mut page_spans = Vec::new();
    let mut current_char = 0usize;

    for &page_num in pages.keys() {
        // A page that fails to decode contributes no text, like a
        // scanned image page
        let page_text = doc.extract_text(&[page_num]).unwrap_or_default();
        let page_text = page_text.trim_end();
        if page_text.is_empty() {
            continue;
        }

        let len = page_text.chars().count();
        page_spans.push(PageSpan {
            start_char: current_char,
            end_char: current_char + len,
            page_num,
        });
        parts.push(page_text.to_string());
        current_char += len + 1; // newline separator
    }

    Ok(ExtractedDocument {
        text: parts.join("\n"),
        pages: page_count,
        page_spans,
    })
}
