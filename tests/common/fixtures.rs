//! Test fixtures and PDF builders.
//!
//! Provides a builder for real multi-page PDFs with known text, plus an
//! input-file helper for tests running against the scripted backend.

use anyhow::Result;
use printpdf::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Builder for creating test PDFs with custom content.
///
/// Each page holds its lines top to bottom in 12pt Helvetica.
///
/// # Example
///
/// ```no_run
/// # use std::path::Path;
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// let pdf = TestPdfBuilder::new()
///     .with_page(&["Alice met Alice at noon"])
///     .with_page(&["Alice and Bob"])
///     .build(Path::new("/tmp/test.pdf"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TestPdfBuilder {
    title: String,
    pages: Vec<Vec<String>>,
    page_width: Mm,
    page_height: Mm,
}

impl TestPdfBuilder {
    pub fn new() -> Self {
        Self {
            title: "Test Document".to_string(),
            pages: Vec::new(),
            page_width: Mm(210.0),  // A4 width
            page_height: Mm(297.0), // A4 height
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Appends a page with the given lines.
    pub fn with_page(mut self, lines: &[&str]) -> Self {
        self.pages
            .push(lines.iter().map(|line| line.to_string()).collect());
        self
    }

    /// Writes the PDF to `path` and returns the path.
    pub fn build(self, path: &Path) -> Result<PathBuf> {
        let (doc, first_page, first_layer) =
            PdfDocument::new(&self.title, self.page_width, self.page_height, "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        let pages = if self.pages.is_empty() {
            vec![Vec::new()]
        } else {
            self.pages
        };

        for (index, lines) in pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(self.page_width, self.page_height, "Layer 1")
            };
            let layer = doc.get_page(page).get_layer(layer);

            for (row, line) in lines.iter().enumerate() {
                let y = self.page_height.0 - 30.0 - 10.0 * row as f32;
                layer.use_text(line.as_str(), 12.0, Mm(20.0), Mm(y), &font);
            }
        }

        doc.save(&mut BufWriter::new(File::create(path)?))?;
        Ok(path.to_path_buf())
    }
}

impl Default for TestPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a placeholder input file; the scripted backend never reads it.
pub fn placeholder_input(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.4\n%%EOF\n").expect("Failed to write placeholder input");
    path
}
