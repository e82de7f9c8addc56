// file: src/extractor/pdf.rs
// description: page-ordered plain text extraction from PDF byte streams
// reference: https://docs.rs/lopdf

use crate::error::{RankerError, Result};
use crate::models::DocumentFormat;
use lopdf::Document;
use tracing::debug;

pub fn extract_pdf(bytes: &[u8]) -> Result<String> {
    let document =
        Document::load_mem(bytes).map_err(|e| RankerError::parse(DocumentFormat::Pdf, e))?;

    // get_pages is keyed by page number, so iteration follows document order
    let pages = document.get_pages();
    debug!("Extracting text from {} PDF pages", pages.len());

    let mut text = String::new();
    for page_number in pages.keys() {
        let page_text = document.extract_text(&[*page_number]).map_err(|e| {
            RankerError::parse(DocumentFormat::Pdf, format!("page {}: {}", page_number, e))
        })?;
        text.push_str(&page_text);
    }

    Ok(text)
}
