//! Redaction request parameters.

use super::color::FillColor;
use super::term::MatchMode;
use crate::error::{RedactorError, RedactorResult};
use indexmap::IndexSet;
use std::path::{Path, PathBuf};

/// A fully populated redaction request.
///
/// Built once by the command surface (flags or interactive prompts) and handed
/// to [`RedactionService`](crate::RedactionService). Terms are kept in request
/// order with duplicates collapsed.
#[derive(Debug, Clone)]
pub struct RedactionRequest {
    input: PathBuf,
    terms: Vec<String>,
    case_sensitive: bool,
    fill_color: FillColor,
    output: Option<PathBuf>,
    mode: MatchMode,
}

impl RedactionRequest {
    /// Creates a literal, case-sensitive, black-fill request.
    pub fn new<I, S>(input: impl Into<PathBuf>, terms: I) -> RedactorResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: IndexSet<String> = terms.into_iter().map(Into::into).collect();

        if terms.is_empty() {
            return Err(RedactorError::InvalidInput {
                parameter: "terms".to_string(),
                reason: "At least one term to redact is required".to_string(),
            });
        }

        if terms.iter().any(|t| t.trim().is_empty()) {
            return Err(RedactorError::InvalidInput {
                parameter: "terms".to_string(),
                reason: "Terms must not be blank".to_string(),
            });
        }

        Ok(Self {
            input: input.into(),
            terms: terms.into_iter().collect(),
            case_sensitive: true,
            fill_color: FillColor::BLACK,
            output: None,
            mode: MatchMode::Literal,
        })
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_fill_color(mut self, fill_color: FillColor) -> Self {
        self.fill_color = fill_color;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Switches term interpretation to regular expressions.
    pub fn with_regex(mut self, use_regex: bool) -> Self {
        self.mode = if use_regex {
            MatchMode::Regex
        } else {
            MatchMode::Literal
        };
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn fill_color(&self) -> FillColor {
        self.fill_color
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Returns the explicit output path or the default next to the input.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }
}

/// Derives `<dir>/<stem>_redacted.pdf` from an input path.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let file_name = format!("{}_redacted.pdf", stem);

    match input.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}
