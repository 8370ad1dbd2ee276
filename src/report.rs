//! Human-readable and JSON reporting.
//!
//! Terminal styling is an explicit [`Styling`] value decided once at startup
//! and passed to every [`Reporter`].

use crate::error::{RedactorError, RedactorResult};
use crate::redaction::{PageProgress, RedactionResult};
use serde_json::{json, Value};
use std::io::{self, IsTerminal, Write};

const GREEN: &str = "32";
const RED: &str = "31";
const YELLOW: &str = "33";
const BOLD: &str = "1";

/// Whether output may carry ANSI styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Styling {
    enabled: bool,
}

impl Styling {
    /// Styling on when stdout is a terminal and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            enabled: io::stdout().is_terminal() && !no_color,
        }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn colored() -> Self {
        Self { enabled: true }
    }

    pub(crate) fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }
}

/// Writes progress, summaries and status lines.
pub struct Reporter<W: Write> {
    out: W,
    style: Styling,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, style: Styling) -> Self {
        Self { out, style }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn header(&mut self, title: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "\n{}",
            self.style.paint(BOLD, &format!("=== {} ===", title))
        )
    }

    /// Reports a page with applied redactions; pages without any stay silent.
    pub fn page_progress(&mut self, progress: &PageProgress) -> io::Result<()> {
        if progress.marks == 0 {
            return Ok(());
        }
        writeln!(
            self.out,
            "Page {}: {} redaction(s) applied",
            progress.page + 1,
            progress.marks
        )
    }

    pub fn summary(&mut self, result: &RedactionResult) -> io::Result<()> {
        self.header("Redaction Summary")?;
        writeln!(self.out, "Total redactions: {}", result.total_redactions())?;
        for (term, count) in result.stats.iter() {
            writeln!(self.out, "  '{}': {} instance(s)", term, count)?;
        }
        writeln!(
            self.out,
            "Pages modified: {} of {}",
            result.pages_modified, result.pages_processed
        )?;
        writeln!(self.out, "\nSaved to: {}", result.output_path.display())
    }

    pub fn success(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", self.style.paint(GREEN, &format!("✓ {}", message)))
    }

    pub fn failure(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", self.style.paint(RED, &format!("✗ {}", message)))
    }

    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "{}",
            self.style.paint(YELLOW, &format!("Warning: {}", message))
        )
    }
}

/// Renders the outcome of a request for `--json`.
pub fn json_outcome(outcome: &RedactorResult<RedactionResult>) -> Value {
    match outcome {
        Ok(result) => json!({
            "success": true,
            "total_redactions": result.total_redactions(),
            "stats": result
                .stats
                .iter()
                .map(|(term, count)| (term.to_string(), Value::from(count)))
                .collect::<serde_json::Map<String, Value>>(),
            "output_path": result.output_path,
            "pages_processed": result.pages_processed,
            "pages_modified": result.pages_modified,
        }),
        Err(err) => json!({
            "success": false,
            "error": err.to_string(),
            "kind": error_kind(err),
        }),
    }
}

fn error_kind(err: &RedactorError) -> &'static str {
    match err {
        RedactorError::FileNotFound { .. } => "file_not_found",
        RedactorError::InvalidPattern { .. } => "invalid_pattern",
        RedactorError::Open { .. } => "open",
        RedactorError::Save { .. } => "save",
        RedactorError::InvalidColor { .. } => "invalid_color",
        RedactorError::PdfProcessing { .. } => "pdf_processing",
        RedactorError::InvalidInput { .. } => "invalid_input",
        RedactorError::Cancelled => "cancelled",
        RedactorError::Io { .. } => "io",
    }
}
