//! Error types for the PDF redaction library.
//!
//! Every failure of a redaction request funnels into [`RedactorError`]. Validation
//! errors (missing input, bad pattern, bad parameters) are raised before any
//! document is touched; runtime errors (open, processing, save) abort the whole
//! request with nothing persisted.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for redaction operations.
pub type RedactorResult<T> = Result<T, RedactorError>;

/// Error type for all redaction operations.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// Input path does not resolve to a regular file
    #[error("Input file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// A regex term failed to compile
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Document could not be opened or parsed as a PDF
    #[error("Failed to open '{}' as PDF: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    /// Redacted document could not be written to the output path
    #[error("Failed to save redacted PDF to '{}': {reason}", .path.display())]
    Save { path: PathBuf, reason: String },

    /// Malformed fill color specification
    #[error("Invalid color '{value}': {reason}")]
    InvalidColor { value: String, reason: String },

    /// Backend fault while reading, searching or annotating a page
    #[error("PDF processing error{}: {message}", page_suffix(.page))]
    PdfProcessing {
        message: String,
        page: Option<usize>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid request parameters
    #[error("Invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },

    /// The user aborted interactive parameter collection
    #[error("Operation cancelled")]
    Cancelled,

    /// Error occurred while reading or writing files
    #[error("IO error for path '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn page_suffix(page: &Option<usize>) -> String {
    page.map(|p| format!(" on page {}", p)).unwrap_or_default()
}

impl RedactorError {
    /// Builds a processing error for a 0-based page index.
    pub(crate) fn on_page(
        page: usize,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::PdfProcessing {
            message: message.into(),
            page: Some(page + 1),
            source: Some(Box::new(source)),
        }
    }

    /// Returns true for errors detected before any document work starts.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::InvalidPattern { .. }
                | Self::InvalidColor { .. }
                | Self::InvalidInput { .. }
        )
    }
}
