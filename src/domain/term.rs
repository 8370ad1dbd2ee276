//! Term matching.
//!
//! A [`TermMatcher`] turns one request term into the substrings that must be
//! located on a page. Literal terms are searched as-is on the page. Regex terms
//! run against the page's extracted text, and each distinct matched substring is
//! handed back for an on-page search, since text offsets do not map to page
//! coordinates.

use crate::error::{RedactorError, RedactorResult};
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// How the terms of a request are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Terms are literal strings
    #[default]
    Literal,

    /// Terms are regular expressions
    Regex,
}

/// A compiled request term.
#[derive(Debug, Clone)]
pub enum TermMatcher {
    Literal { term: String },
    Pattern {
        term: String,
        regex: Regex,
        case_sensitive: bool,
    },
}

impl TermMatcher {
    /// Compiles a single term.
    ///
    /// In regex mode the pattern is compiled case-insensitively unless
    /// `case_sensitive` is set. Literal terms are never compiled; case folding
    /// for them happens in the backend search.
    pub fn compile(term: &str, mode: MatchMode, case_sensitive: bool) -> RedactorResult<Self> {
        match mode {
            MatchMode::Literal => Ok(Self::Literal {
                term: term.to_string(),
            }),
            MatchMode::Regex => {
                let regex = RegexBuilder::new(term)
                    .case_insensitive(!case_sensitive)
                    .build()
                    .map_err(|e| RedactorError::InvalidPattern {
                        pattern: term.to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(Self::Pattern {
                    term: term.to_string(),
                    regex,
                    case_sensitive,
                })
            }
        }
    }

    /// Compiles every term, failing on the first invalid one.
    pub fn compile_all<S: AsRef<str>>(
        terms: &[S],
        mode: MatchMode,
        case_sensitive: bool,
    ) -> RedactorResult<Vec<Self>> {
        terms
            .iter()
            .map(|t| Self::compile(t.as_ref(), mode, case_sensitive))
            .collect()
    }

    /// The original term as supplied in the request.
    pub fn term(&self) -> &str {
        match self {
            Self::Literal { term } | Self::Pattern { term, .. } => term,
        }
    }

    /// Whether [`needles`](Self::needles) needs the page's extracted text.
    pub fn needs_page_text(&self) -> bool {
        matches!(self, Self::Pattern { .. })
    }

    /// Returns the substrings to search for on a page.
    ///
    /// Regex matches are non-overlapping and scanned left to right. Blank matches
    /// are dropped, and a substring matched several times is returned once
    /// because a single page search already yields all of its boxes. Without
    /// case sensitivity the search folds case, so spellings differing only in
    /// case collapse to the first one seen.
    pub fn needles<'a>(&'a self, page_text: &'a str) -> Vec<&'a str> {
        match self {
            Self::Literal { term } => vec![term.as_str()],
            Self::Pattern {
                regex,
                case_sensitive,
                ..
            } => {
                let mut distinct: IndexMap<String, &str> = IndexMap::new();
                for found in regex.find_iter(page_text) {
                    let needle = found.as_str();
                    if needle.trim().is_empty() {
                        continue;
                    }
                    let key = if *case_sensitive {
                        needle.to_string()
                    } else {
                        needle.to_lowercase()
                    };
                    distinct.entry(key).or_insert(needle);
                }
                distinct.into_values().collect()
            }
        }
    }
}
