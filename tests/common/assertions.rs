//! Custom assertions for PDF redaction testing.
//!
//! Provides domain-specific assertions that make tests more readable
//! and provide better error messages.

use pdf_redact::RedactionService;
use std::path::Path;

/// Extracts per-page text, panicking with context on failure.
pub fn page_texts(pdf_path: &Path) -> Vec<String> {
    RedactionService::with_mupdf()
        .extract_text(pdf_path)
        .unwrap_or_else(|e| panic!("Failed to extract text from '{}': {}", pdf_path.display(), e))
}

/// Asserts that a term no longer appears anywhere in a PDF.
///
/// # Panics
/// Panics if the term is still found in the PDF text.
pub fn assert_redacted(pdf_path: &Path, term: &str) {
    let text = page_texts(pdf_path).concat();
    assert!(
        !text.contains(term),
        "'{}' should be redacted but was found in output PDF at '{}'",
        term,
        pdf_path.display()
    );
}

/// Asserts that a term is still present in a PDF.
///
/// # Panics
/// Panics if the term is not found in the PDF.
pub fn assert_preserved(pdf_path: &Path, term: &str) {
    let text = page_texts(pdf_path).concat();
    assert!(
        text.contains(term),
        "'{}' should be preserved but was not found in PDF at '{}'",
        term,
        pdf_path.display()
    );
}

/// Asserts that a PDF exists, is non-empty and parses.
///
/// # Panics
/// Panics if the PDF is missing, empty or corrupted.
pub fn assert_valid_pdf(pdf_path: &Path) {
    let metadata = std::fs::metadata(pdf_path)
        .unwrap_or_else(|_| panic!("PDF should exist at '{}'", pdf_path.display()));
    assert!(
        metadata.len() > 0,
        "PDF should not be empty at '{}'",
        pdf_path.display()
    );
    assert!(
        lopdf::Document::load(pdf_path).is_ok(),
        "PDF should be loadable at '{}'",
        pdf_path.display()
    );
}

/// Decoded content streams of a 1-based page, concatenated.
pub fn page_content(pdf_path: &Path, page: u32) -> String {
    let doc = lopdf::Document::load(pdf_path)
        .unwrap_or_else(|e| panic!("Failed to load '{}': {}", pdf_path.display(), e));
    let page_id = *doc
        .get_pages()
        .get(&page)
        .unwrap_or_else(|| panic!("No page {} in '{}'", page, pdf_path.display()));
    let content = doc
        .get_page_content(page_id)
        .unwrap_or_else(|e| panic!("Failed to read page {} content: {}", page, e));
    String::from_utf8_lossy(&content).into_owned()
}
