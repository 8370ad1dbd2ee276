//! PDF text redaction library.
//!
//! Removes user-specified text from PDF documents: every occurrence of a
//! literal term or regular-expression match is covered by a redaction mark and
//! the marks are applied so the underlying text is physically removed. The
//! result is a sanitized copy; the input file is never modified.
//!
//! # Architecture
//!
//! - [`domain`]: request parameters, fill colors and term matching
//! - [`redaction`]: the backend seam, the MuPDF backend and the pipeline
//! - [`report`]: progress and summary output, JSON outcome
//! - [`prompt`]: interactive parameter collection
//! - [`error`]: error handling
//!
//! # Quick Start
//!
//! ```no_run
//! use pdf_redact::{RedactionRequest, RedactionService};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = RedactionService::with_mupdf();
//! let request = RedactionRequest::new("/docs/report.pdf", ["Alice", "Bob"])?;
//!
//! let result = service.redact(&request)?;
//! println!(
//!     "{} redaction(s) written to {}",
//!     result.total_redactions(),
//!     result.output_path.display()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Regex Terms
//!
//! ```no_run
//! use pdf_redact::{FillColor, RedactionRequest, RedactionService};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = RedactionRequest::new("statement.pdf", [r"\d{3}-\d{2}-\d{4}"])?
//!     .with_regex(true)
//!     .with_case_sensitive(false)
//!     .with_fill_color(FillColor::WHITE)
//!     .with_output("statement_clean.pdf");
//!
//! RedactionService::with_mupdf().redact_with_progress(&request, |progress| {
//!     if progress.marks > 0 {
//!         println!("Page {}: {} redaction(s)", progress.page + 1, progress.marks);
//!     }
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! # Term Matching
//!
//! ```
//! use pdf_redact::{MatchMode, TermMatcher};
//!
//! let matcher = TermMatcher::compile(r"\d{3}-\d{4}", MatchMode::Regex, true).unwrap();
//! let needles = matcher.needles("call 555-1234 or 555-9876");
//! assert_eq!(needles, vec!["555-1234", "555-9876"]);
//! ```

pub mod domain;
pub mod error;
pub mod prompt;
pub mod redaction;
pub mod report;

pub use domain::{default_output_path, FillColor, MatchMode, RedactionRequest, TermMatcher};
pub use error::{RedactorError, RedactorResult};
pub use redaction::{
    MupdfBackend, PageMatch, PageProgress, PdfBackend, RedactableDocument, RedactionResult,
    RedactionService, RedactionStats, Rect,
};
pub use report::{Reporter, Styling};
