//! Redaction statistics and the result record of a request.

use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

/// Per-term redaction counts plus a running total.
///
/// Every term of the request is present from the start, in request order, and
/// counts only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RedactionStats {
    counts: IndexMap<String, usize>,
    total_redactions: usize,
}

impl RedactionStats {
    /// Creates stats with every term mapped to zero.
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Self {
        Self {
            counts: terms.iter().map(|t| (t.as_ref().to_string(), 0)).collect(),
            total_redactions: 0,
        }
    }

    /// Counts one redacted instance for `term`.
    ///
    /// Terms unknown to the request are ignored so the key set never changes.
    pub fn record(&mut self, term: &str) {
        if let Some(count) = self.counts.get_mut(term) {
            *count += 1;
            self.total_redactions += 1;
        }
    }

    /// Count for a term, `None` if the term is not part of the request.
    pub fn get(&self, term: &str) -> Option<usize> {
        self.counts.get(term).copied()
    }

    pub fn total(&self) -> usize {
        self.total_redactions
    }

    /// Iterates `(term, count)` in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(t, c)| (t.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Outcome of a successful redaction request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RedactionResult {
    /// Per-term and total counts
    pub stats: RedactionStats,

    /// Where the redacted copy was written
    pub output_path: PathBuf,

    /// Pages processed
    pub pages_processed: usize,

    /// Pages with at least one applied redaction
    pub pages_modified: usize,
}

impl RedactionResult {
    pub fn total_redactions(&self) -> usize {
        self.stats.total()
    }

    /// Returns true if any redactions were applied.
    pub fn has_redactions(&self) -> bool {
        self.stats.total() > 0
    }
}

/// Per-page progress observation emitted while a request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    /// 0-based page index
    pub page: usize,

    /// Total pages in the document
    pub page_count: usize,

    /// Marks applied on this page
    pub marks: usize,
}
