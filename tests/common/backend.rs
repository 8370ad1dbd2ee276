//! Scripted in-memory backend.
//!
//! Documents are plain page texts. Search is a non-overlapping substring scan
//! and every rectangle spans the byte range of one occurrence on the page, so
//! applying a page blanks exactly the marked text. All operations are recorded
//! in a shared [`Journal`] that outlives the document handle.

use pdf_redact::{FillColor, PdfBackend, RedactableDocument, RedactorError, RedactorResult, Rect};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Everything a scripted document saw, in order.
#[derive(Debug, Default, Clone)]
pub struct Journal {
    pub opened: usize,
    pub closed: usize,
    pub text_reads: Vec<usize>,
    pub searches: Vec<(usize, String, bool)>,
    pub marks: Vec<(usize, Rect, FillColor)>,
    pub applied: Vec<usize>,
    pub saved_to: Option<PathBuf>,
    pub saved_pages: Vec<String>,
}

impl Journal {
    pub fn marks_on(&self, page: usize) -> usize {
        self.marks.iter().filter(|(p, _, _)| *p == page).count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    pages: Vec<String>,
    fail_open: bool,
    fail_save: bool,
    fail_apply_on: Option<usize>,
    hit_limit: Option<usize>,
    journal: Arc<Mutex<Journal>>,
}

impl ScriptedBackend {
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn failing_save(mut self) -> Self {
        self.fail_save = true;
        self
    }

    pub fn failing_apply_on(mut self, page: usize) -> Self {
        self.fail_apply_on = Some(page);
        self
    }

    /// Truncates every search to `limit` hits, like a bounded engine search.
    pub fn with_hit_limit(mut self, limit: usize) -> Self {
        self.hit_limit = Some(limit);
        self
    }

    pub fn journal(&self) -> MutexGuard<'_, Journal> {
        self.journal.lock().expect("journal lock poisoned")
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }
}

impl PdfBackend for ScriptedBackend {
    fn open(&self, path: &Path) -> RedactorResult<Box<dyn RedactableDocument>> {
        if self.fail_open {
            return Err(RedactorError::Open {
                path: path.to_path_buf(),
                reason: "not a PDF".to_string(),
            });
        }

        self.journal().opened += 1;
        Ok(Box::new(ScriptedDocument {
            pages: self.pages.clone(),
            pending: Vec::new(),
            fail_save: self.fail_save,
            fail_apply_on: self.fail_apply_on,
            hit_limit: self.hit_limit,
            hit_limit_reached: false,
            journal: Arc::clone(&self.journal),
        }))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct ScriptedDocument {
    pages: Vec<String>,
    pending: Vec<(usize, Rect)>,
    fail_save: bool,
    fail_apply_on: Option<usize>,
    hit_limit: Option<usize>,
    hit_limit_reached: bool,
    journal: Arc<Mutex<Journal>>,
}

impl ScriptedDocument {
    fn journal(&self) -> MutexGuard<'_, Journal> {
        self.journal.lock().expect("journal lock poisoned")
    }

    fn page(&self, page: usize) -> RedactorResult<&str> {
        self.pages
            .get(page)
            .map(String::as_str)
            .ok_or_else(|| RedactorError::PdfProcessing {
                message: "page out of range".to_string(),
                page: Some(page + 1),
                source: None,
            })
    }
}

/// Byte offsets of non-overlapping occurrences of `needle`, ASCII case folded on request.
fn occurrences(haystack: &str, needle: &str, case_sensitive: bool) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }

    let (haystack, needle) = if case_sensitive {
        (haystack.to_string(), needle.to_string())
    } else {
        (haystack.to_ascii_lowercase(), needle.to_ascii_lowercase())
    };

    haystack.match_indices(&needle).map(|(at, _)| at).collect()
}

impl RedactableDocument for ScriptedDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&mut self, page: usize) -> RedactorResult<String> {
        let text = self.page(page)?.to_string();
        self.journal().text_reads.push(page);
        Ok(text)
    }

    fn search(
        &mut self,
        page: usize,
        needle: &str,
        case_sensitive: bool,
    ) -> RedactorResult<Vec<Rect>> {
        let text = self.page(page)?;
        let mut rects: Vec<Rect> = occurrences(text, needle, case_sensitive)
            .into_iter()
            .map(|at| Rect::new(at as f32, 0.0, (at + needle.len()) as f32, 1.0))
            .collect();

        if let Some(limit) = self.hit_limit {
            if rects.len() >= limit {
                rects.truncate(limit);
                self.hit_limit_reached = true;
            }
        }

        self.journal()
            .searches
            .push((page, needle.to_string(), case_sensitive));
        Ok(rects)
    }

    fn mark(&mut self, page: usize, rect: Rect, color: FillColor) -> RedactorResult<()> {
        self.page(page)?;
        self.pending.push((page, rect));
        self.journal().marks.push((page, rect, color));
        Ok(())
    }

    fn apply(&mut self, page: usize) -> RedactorResult<()> {
        if self.fail_apply_on == Some(page) {
            return Err(RedactorError::PdfProcessing {
                message: "Failed to apply redactions".to_string(),
                page: Some(page + 1),
                source: None,
            });
        }

        let (ready, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(p, _)| *p == page);
        self.pending = rest;

        let text = &mut self.pages[page];
        for (_, rect) in ready {
            let (start, end) = (rect.x0 as usize, rect.x1 as usize);
            if text.is_char_boundary(start) && text.is_char_boundary(end) {
                text.replace_range(start..end, &"#".repeat(end - start));
            }
        }

        self.journal().applied.push(page);
        Ok(())
    }

    fn save(&mut self, path: &Path) -> RedactorResult<()> {
        if self.fail_save {
            return Err(RedactorError::Save {
                path: path.to_path_buf(),
                reason: "disk full".to_string(),
            });
        }

        std::fs::write(path, self.pages.join("\n\x0c")).map_err(|e| RedactorError::Save {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut journal = self.journal();
        journal.saved_to = Some(path.to_path_buf());
        journal.saved_pages = self.pages.clone();
        Ok(())
    }

    fn take_hit_limit_reached(&mut self) -> bool {
        std::mem::take(&mut self.hit_limit_reached)
    }
}

impl Drop for ScriptedDocument {
    fn drop(&mut self) {
        if let Ok(mut journal) = self.journal.lock() {
            journal.closed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occurrences_do_not_overlap() {
        assert_eq!(occurrences("aaaa", "aa", true), vec![0, 2]);
        assert_eq!(occurrences("Alice ALICE", "alice", false), vec![0, 6]);
        assert!(occurrences("Alice ALICE", "alice", true).is_empty());
    }
}
