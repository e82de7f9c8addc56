// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use crate::models::DocumentFormat;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankerError>;

#[derive(Error, Debug)]
pub enum RankerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse {format} document: {message}")]
    Parse {
        format: DocumentFormat,
        message: String,
    },

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RankerError {
    pub(crate) fn parse(format: DocumentFormat, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            format,
            message: err.to_string(),
        }
    }

    /// True for errors that abort a whole ranking call rather than a single document.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::Parse { .. } | Self::UnsupportedFormat(_) | Self::Validation(_)
        )
    }
}

impl From<serde_json::Error> for RankerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_format() {
        let err = RankerError::parse(DocumentFormat::Pdf, "missing trailer");
        assert_eq!(
            err.to_string(),
            "Failed to parse PDF document: missing trailer"
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_model_unavailable_is_fatal() {
        let err = RankerError::ModelUnavailable("connection refused".to_string());
        assert!(err.is_fatal());
        assert!(err.to_string().contains("connection refused"));
    }
}
