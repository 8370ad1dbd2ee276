//! Request model and matching logic.
//!
//! Everything here is pure: no document access. The pipeline combines these
//! types with a [`PdfBackend`](crate::redaction::PdfBackend).

pub mod color;
pub mod request;
pub mod term;

pub use color::FillColor;
pub use request::{default_output_path, RedactionRequest};
pub use term::{MatchMode, TermMatcher};
