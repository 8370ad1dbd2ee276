//! PDF backend abstraction.
//!
//! The redaction pipeline never touches PDF internals. Everything it needs
//! (opening, page text, substring geometry, marking, flattening, saving) goes
//! through [`PdfBackend`] and the [`RedactableDocument`] handle it returns,
//! allowing for different engines and for in-memory test doubles.

use crate::domain::FillColor;
use crate::error::RedactorResult;
use serde::Serialize;
use std::path::Path;

/// Axis-aligned region on a page, in the backend's page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest rectangle containing all given points.
    pub fn bounding<I: IntoIterator<Item = (f32, f32)>>(points: I) -> Option<Self> {
        points.into_iter().fold(None, |acc, (x, y)| {
            Some(match acc {
                None => Self::new(x, y, x, y),
                Some(r) => Self::new(r.x0.min(x), r.y0.min(y), r.x1.max(x), r.y1.max(y)),
            })
        })
    }

    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }
}

/// A located occurrence of a term on a page.
///
/// Created while matching a page and consumed by the marking step right after;
/// never kept once the page is flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMatch<'a> {
    /// Original term (literal or pattern) that produced the match
    pub term: &'a str,

    /// 0-based page index
    pub page: usize,

    /// Region to redact
    pub rect: Rect,
}

/// Opens documents for redaction.
pub trait PdfBackend: Send + Sync {
    /// Opens a document. Failing here means nothing was modified.
    fn open(&self, path: &Path) -> RedactorResult<Box<dyn RedactableDocument>>;

    /// Returns a human-readable name for this backend.
    fn name(&self) -> &str;
}

/// An open document exclusively owned by one redaction request.
///
/// Pages are addressed by 0-based index in physical order. Dropping the handle
/// releases it; unsaved changes are discarded.
pub trait RedactableDocument {
    fn page_count(&self) -> usize;

    /// Extracts the plain text of a page.
    fn page_text(&mut self, page: usize) -> RedactorResult<String>;

    /// Returns one rectangle per on-page occurrence of `needle`.
    ///
    /// Case is folded when `case_sensitive` is false.
    fn search(&mut self, page: usize, needle: &str, case_sensitive: bool)
        -> RedactorResult<Vec<Rect>>;

    /// Marks a region of a page for redaction.
    fn mark(&mut self, page: usize, rect: Rect, color: FillColor) -> RedactorResult<()>;

    /// Applies (flattens) every pending mark on a page, removing the text beneath.
    fn apply(&mut self, page: usize) -> RedactorResult<()>;

    /// Writes the document to `path`.
    fn save(&mut self, path: &Path) -> RedactorResult<()>;

    /// Reports whether a search since the last call returned a truncated hit
    /// list, clearing the flag.
    fn take_hit_limit_reached(&mut self) -> bool {
        false
    }
}
