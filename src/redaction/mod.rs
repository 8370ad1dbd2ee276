//! Redaction pipeline.
//!
//! [`RedactionService`] drives one request end to end: open the document,
//! compile the terms, then page by page locate every match, mark it, flatten
//! the page's marks and finally save the copy. The document handle is owned by
//! the call and released on every exit path; any error aborts the request
//! without saving.

pub mod backend;
pub mod mupdf_backend;
pub mod stats;

pub use backend::{PageMatch, PdfBackend, RedactableDocument, Rect};
pub use mupdf_backend::MupdfBackend;
pub use stats::{PageProgress, RedactionResult, RedactionStats};

use crate::domain::{RedactionRequest, TermMatcher};
use crate::error::{RedactorError, RedactorResult};
use std::path::Path;
use tracing::{debug, info, info_span, warn};

/// Upper bound on match-and-apply passes over a single page.
const MAX_SWEEPS: usize = 32;

/// Redaction service coordinating a backend.
pub struct RedactionService {
    backend: Box<dyn PdfBackend>,
}

impl RedactionService {
    /// Creates a new redaction service over the given backend.
    pub fn new(backend: Box<dyn PdfBackend>) -> Self {
        Self { backend }
    }

    /// Creates a service backed by MuPDF.
    pub fn with_mupdf() -> Self {
        Self::new(Box::new(MupdfBackend::default()))
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Redacts every term of `request` and saves the sanitized copy.
    pub fn redact(&self, request: &RedactionRequest) -> RedactorResult<RedactionResult> {
        self.redact_with_progress(request, |_| {})
    }

    /// Like [`redact`](Self::redact), reporting each processed page to `on_page`.
    pub fn redact_with_progress<F>(
        &self,
        request: &RedactionRequest,
        mut on_page: F,
    ) -> RedactorResult<RedactionResult>
    where
        F: FnMut(&PageProgress),
    {
        let input = request.input();
        let output = request.output_path();

        let span = info_span!("redact", input = %input.display());
        let _enter = span.enter();

        validate_paths(input, &output)?;

        debug!(backend = self.backend.name(), "opening document");
        let mut document = self.backend.open(input)?;

        debug!(terms = request.terms().len(), mode = ?request.mode(), "compiling terms");
        let matchers =
            TermMatcher::compile_all(request.terms(), request.mode(), request.case_sensitive())?;

        let mut stats = RedactionStats::new(request.terms());
        let page_count = document.page_count();
        let mut pages_modified = 0;

        for page in 0..page_count {
            let mut marks = 0;

            // A truncated search leaves occurrences behind; sweep again once applied
            for sweep in 1..=MAX_SWEEPS {
                let matches =
                    locate_matches(document.as_mut(), &matchers, page, request.case_sensitive())?;
                if matches.is_empty() {
                    break;
                }

                for found in &matches {
                    document.mark(found.page, found.rect, request.fill_color())?;
                    stats.record(found.term);
                }
                document.apply(page)?;
                marks += matches.len();

                if !document.take_hit_limit_reached() {
                    break;
                }
                if sweep == MAX_SWEEPS {
                    warn!(page = page + 1, "search hit limit still reached after {} sweeps", sweep);
                }
            }

            if marks > 0 {
                pages_modified += 1;
                info!(page = page + 1, marks, "redactions applied");
            }

            on_page(&PageProgress {
                page,
                page_count,
                marks,
            });
        }

        debug!(output = %output.display(), "saving document");
        document.save(&output)?;
        drop(document);

        info!(
            total = stats.total(),
            pages_modified,
            output = %output.display(),
            "redaction complete"
        );

        Ok(RedactionResult {
            stats,
            output_path: output,
            pages_processed: page_count,
            pages_modified,
        })
    }

    /// Extracts per-page text through the backend, for debugging and verification.
    pub fn extract_text(&self, input: &Path) -> RedactorResult<Vec<String>> {
        if !input.is_file() {
            return Err(RedactorError::FileNotFound {
                path: input.to_path_buf(),
            });
        }

        let mut document = self.backend.open(input)?;
        (0..document.page_count())
            .map(|page| document.page_text(page))
            .collect()
    }
}

/// Fails fast on a missing input or an output that would overwrite it.
fn validate_paths(input: &Path, output: &Path) -> RedactorResult<()> {
    if !input.is_file() {
        return Err(RedactorError::FileNotFound {
            path: input.to_path_buf(),
        });
    }

    let same_file = match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    };
    if same_file {
        return Err(RedactorError::InvalidInput {
            parameter: "output".to_string(),
            reason: "Output path must differ from the input file".to_string(),
        });
    }

    Ok(())
}

/// Runs every matcher against one page and locates the matches on it.
fn locate_matches<'m>(
    document: &mut dyn RedactableDocument,
    matchers: &'m [TermMatcher],
    page: usize,
    case_sensitive: bool,
) -> RedactorResult<Vec<PageMatch<'m>>> {
    let page_text = if matchers.iter().any(TermMatcher::needs_page_text) {
        document.page_text(page)?
    } else {
        String::new()
    };

    let mut matches = Vec::new();
    for matcher in matchers {
        for needle in matcher.needles(&page_text) {
            let rects = document.search(page, needle, case_sensitive)?;
            debug!(page = page + 1, needle, hits = rects.len(), "searched page");
            matches.extend(rects.into_iter().map(|rect| PageMatch {
                term: matcher.term(),
                page,
                rect,
            }));
        }
    }

    Ok(matches)
}
