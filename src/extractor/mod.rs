// file: src/extractor/mod.rs
// description: document text extraction dispatched by format
// reference: internal module structure

pub mod docx;
pub mod pdf;

pub use docx::extract_docx;
pub use pdf::extract_pdf;

use crate::error::{RankerError, Result};
use crate::models::DocumentFormat;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Turns PDF and DOCX byte streams into plain text. Parse failures are
/// returned to the caller untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract<R: Read>(&self, mut reader: R, format: DocumentFormat) -> Result<String> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.extract_bytes(&bytes, format)
    }

    pub fn extract_bytes(&self, bytes: &[u8], format: DocumentFormat) -> Result<String> {
        match format {
            DocumentFormat::Pdf => extract_pdf(bytes),
            DocumentFormat::Docx => extract_docx(bytes),
        }
    }

    /// Extract a file on disk, inferring the format from its suffix.
    pub fn extract_path(&self, path: &Path) -> Result<String> {
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| RankerError::UnsupportedFormat(path.display().to_string()))?;

        let bytes = fs::read(path).map_err(|source| RankerError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

        self.extract_bytes(&bytes, format)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_extract_from_reader_dispatches_by_format() {
        let extractor = TextExtractor::new();

        let docx = fixtures::docx_bytes(&["Python developer"]);
        let text = extractor
            .extract(Cursor::new(docx), DocumentFormat::Docx)
            .unwrap();
        assert_eq!(text, "Python developer");

        let pdf = fixtures::pdf_bytes(&["Kubernetes operator"]);
        let text = extractor
            .extract(Cursor::new(pdf), DocumentFormat::Pdf)
            .unwrap();
        assert!(text.contains("Kubernetes operator"));
    }

    #[test]
    fn test_declared_format_mismatch_is_parse_error() {
        let extractor = TextExtractor::new();
        let docx = fixtures::docx_bytes(&["text"]);
        let result = extractor.extract_bytes(&docx, DocumentFormat::Pdf);
        assert!(matches!(result, Err(RankerError::Parse { .. })));
    }

    #[test]
    fn test_extract_path_rejects_unknown_suffix() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        std::fs::write(&path, "plain").unwrap();

        let result = TextExtractor::new().extract_path(&path);
        assert!(matches!(result, Err(RankerError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_extract_path_reads_docx() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cv.docx");
        std::fs::write(&path, fixtures::docx_bytes(&["Line one", "Line two"])).unwrap();

        let text = TextExtractor::new().extract_path(&path).unwrap();
        assert_eq!(text, "Line one\nLine two");
    }
}
