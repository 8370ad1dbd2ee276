//! MuPDF backend.
//!
//! Redacts by creating PDF `Redact` annotations over search hits and applying
//! them with MuPDF's page redaction, which physically removes the covered text.
//! MuPDF paints nothing in place of the removed text, so each applied mark is
//! then filled with its color in a content stream appended to the page.
//! Page text for regex matching is extracted with lopdf.

use super::backend::{PdfBackend, RedactableDocument, Rect};
use crate::domain::FillColor;
use crate::error::{RedactorError, RedactorResult};
use regex::RegexBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use mupdf::pdf::{PdfAnnotationType, PdfDocument, PdfObject, PdfPage};
use mupdf::{Matrix, Page, Rect as MuRect};

/// Backend that opens documents with MuPDF.
#[derive(Debug, Clone)]
pub struct MupdfBackend {
    /// Maximum search hits per needle and page
    max_hits: u32,
}

impl MupdfBackend {
    /// Creates a backend with default settings.
    pub fn new() -> Self {
        Self { max_hits: 500 }
    }

    /// Sets the maximum number of search hits per needle and page.
    pub fn with_max_hits(mut self, max_hits: u32) -> Self {
        self.max_hits = max_hits;
        self
    }
}

impl Default for MupdfBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBackend for MupdfBackend {
    fn open(&self, path: &Path) -> RedactorResult<Box<dyn RedactableDocument>> {
        let path_str = utf8_path(path, "input")?;

        let pdf = PdfDocument::open(path_str).map_err(|e| RedactorError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let page_count = pdf.page_count().map_err(|e| RedactorError::Open {
            path: path.to_path_buf(),
            reason: format!("Failed to get page count: {}", e),
        })?;

        debug!(pages = page_count, "opened document with MuPDF");

        Ok(Box::new(MupdfDocument {
            pdf,
            path: path.to_path_buf(),
            page_count: page_count.max(0) as usize,
            max_hits: self.max_hits,
            loaded: None,
            text_source: None,
            text_cache: None,
            pending_fills: Vec::new(),
            hit_limit_reached: false,
        }))
    }

    fn name(&self) -> &str {
        "MuPDF"
    }
}

/// A page loaded for searching and annotation.
struct LoadedPage {
    index: usize,
    page: Page,
    pdf_page: PdfPage,
}

/// Open MuPDF document. Only the most recently addressed page stays loaded.
struct MupdfDocument {
    pdf: PdfDocument,
    path: PathBuf,
    page_count: usize,
    max_hits: u32,
    loaded: Option<LoadedPage>,
    text_source: Option<lopdf::Document>,
    text_cache: Option<(usize, String)>,
    /// Marked regions awaiting a fill, in MuPDF page coordinates
    pending_fills: Vec<(usize, Rect, FillColor)>,
    hit_limit_reached: bool,
}

impl MupdfDocument {
    fn page(&mut self, index: usize) -> RedactorResult<&mut LoadedPage> {
        let loaded = match self.loaded.take() {
            Some(current) if current.index == index => current,
            _ => self.load_page(index)?,
        };
        Ok(self.loaded.insert(loaded))
    }

    fn load_page(&self, index: usize) -> RedactorResult<LoadedPage> {
        let page = self
            .pdf
            .load_page(index as i32)
            .map_err(|e| RedactorError::on_page(index, "Failed to load page", e))?;

        let pdf_page = PdfPage::try_from(page.clone()).map_err(|e| {
            RedactorError::on_page(index, "Page does not support PDF annotations", e)
        })?;

        Ok(LoadedPage {
            index,
            page,
            pdf_page,
        })
    }

    /// Keeps only hits whose underlying text matches `needle` exactly.
    ///
    /// MuPDF search always folds case. Hits come back in reading order, so they
    /// are paired with the case-insensitive occurrences in the page text. When
    /// the counts disagree every hit is kept.
    fn retain_exact_case(&mut self, page: usize, needle: &str, rects: Vec<Rect>) -> Vec<Rect> {
        if !has_case(needle) || rects.is_empty() {
            return rects;
        }

        let text = match self.page_text(page) {
            Ok(text) => text,
            Err(e) => {
                warn!(page = page + 1, error = %e, "no page text for case-sensitive filtering; keeping all hits");
                return rects;
            }
        };

        match exact_case_mask(&text, needle) {
            Some(mask) if mask.len() == rects.len() => rects
                .into_iter()
                .zip(mask)
                .filter_map(|(rect, exact)| exact.then_some(rect))
                .collect(),
            _ => {
                warn!(
                    page = page + 1,
                    needle,
                    hits = rects.len(),
                    "search hits do not line up with page text; keeping all hits"
                );
                rects
            }
        }
    }
}

impl RedactableDocument for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&mut self, page: usize) -> RedactorResult<String> {
        if let Some((index, text)) = &self.text_cache {
            if *index == page {
                return Ok(text.clone());
            }
        }

        if self.text_source.is_none() {
            let source =
                lopdf::Document::load(&self.path).map_err(|e| RedactorError::PdfProcessing {
                    message: format!("Failed to load document for text extraction: {}", e),
                    page: None,
                    source: None,
                })?;
            self.text_source = Some(source);
        }

        let text = match &self.text_source {
            Some(source) => source.extract_text(&[page as u32 + 1]).map_err(|e| {
                RedactorError::PdfProcessing {
                    message: format!("Text extraction failed: {}", e),
                    page: Some(page + 1),
                    source: None,
                }
            })?,
            None => String::new(),
        };

        self.text_cache = Some((page, text.clone()));
        Ok(text)
    }

    fn search(
        &mut self,
        page: usize,
        needle: &str,
        case_sensitive: bool,
    ) -> RedactorResult<Vec<Rect>> {
        let max_hits = self.max_hits;
        let loaded = self.page(page)?;

        let hits = loaded
            .page
            .search(needle, max_hits)
            .map_err(|e| RedactorError::on_page(page, format!("Search failed for '{}'", needle), e))?;

        let rects: Vec<Rect> = hits
            .into_iter()
            .filter_map(|quad| {
                Rect::bounding([
                    (quad.ul.x, quad.ul.y),
                    (quad.ur.x, quad.ur.y),
                    (quad.ll.x, quad.ll.y),
                    (quad.lr.x, quad.lr.y),
                ])
            })
            .filter(|rect| !rect.is_empty())
            .collect();

        if rects.len() as u32 >= max_hits {
            self.hit_limit_reached = true;
            warn!(
                page = page + 1,
                needle,
                max_hits,
                "search hit limit reached; page will be searched again after applying"
            );
        }

        if case_sensitive {
            Ok(self.retain_exact_case(page, needle, rects))
        } else {
            Ok(rects)
        }
    }

    fn mark(&mut self, page: usize, rect: Rect, color: FillColor) -> RedactorResult<()> {
        let loaded = self.page(page)?;

        let annot = loaded
            .pdf_page
            .create_annotation(PdfAnnotationType::Redact)
            .map_err(|e| RedactorError::on_page(page, "Failed to create redaction annotation", e))?;

        let mu_rect = MuRect {
            x0: rect.x0,
            y0: rect.y0,
            x1: rect.x1,
            y1: rect.y1,
        };

        unsafe {
            ffi::set_annotation_rect(&annot, mu_rect);
        }

        self.pending_fills.push((page, rect, color));
        Ok(())
    }

    fn apply(&mut self, page: usize) -> RedactorResult<()> {
        self.page(page)?;

        let (fills, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending_fills)
            .into_iter()
            .partition(|(p, _, _)| *p == page);
        self.pending_fills = rest;

        let loaded = self
            .loaded
            .as_mut()
            .ok_or_else(|| RedactorError::PdfProcessing {
                message: "Page is not loaded".to_string(),
                page: Some(page + 1),
                source: None,
            })?;

        loaded
            .pdf_page
            .redact()
            .map_err(|e| RedactorError::on_page(page, "Failed to apply redactions", e))?;

        let fills: Vec<(Rect, FillColor)> =
            fills.into_iter().map(|(_, rect, color)| (rect, color)).collect();
        paint_fills(&mut self.pdf, &mut loaded.pdf_page, &fills)
            .map_err(|e| RedactorError::on_page(page, "Failed to paint redaction fill", e))?;

        // Content changed; cached text is stale
        if matches!(&self.text_cache, Some((index, _)) if *index == page) {
            self.text_cache = None;
        }

        Ok(())
    }

    fn save(&mut self, path: &Path) -> RedactorResult<()> {
        let path_str = utf8_path(path, "output")?;

        // Release the page before serializing
        self.loaded = None;
        self.pending_fills.clear();

        self.pdf.save(path_str).map_err(|e| RedactorError::Save {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn take_hit_limit_reached(&mut self) -> bool {
        std::mem::take(&mut self.hit_limit_reached)
    }
}

/// Fills each region with its color on top of the page content.
///
/// The existing content streams are wrapped in `q`/`Q` so their graphics state
/// cannot leak into the fill, which is drawn in PDF user space.
fn paint_fills(
    pdf: &mut PdfDocument,
    pdf_page: &mut PdfPage,
    fills: &[(Rect, FillColor)],
) -> Result<(), mupdf::Error> {
    if fills.is_empty() {
        return Ok(());
    }

    let to_user = invert(&pdf_page.ctm()?);
    let mut content = String::from("Q\nq\n");
    for (rect, color) in fills {
        let Some(user) = transform_rect(rect, &to_user) else {
            continue;
        };
        let [r, g, b] = color.components();
        content.push_str(&format!(
            "{} {} {} rg\n{} {} {} {} re\nf\n",
            r,
            g,
            b,
            user.x0,
            user.y0,
            user.x1 - user.x0,
            user.y1 - user.y0
        ));
    }
    content.push_str("Q\n");

    let mut page_obj = pdf_page.object();
    let mut contents = pdf.new_array()?;
    contents.array_push(new_stream(pdf, "q\n")?)?;
    if let Some(existing) = page_obj.get_dict("Contents")? {
        if existing.is_array()? {
            for index in 0..existing.len()? {
                if let Some(part) = existing.get_array(index as i32)? {
                    contents.array_push(part)?;
                }
            }
        } else {
            contents.array_push(existing)?;
        }
    }
    contents.array_push(new_stream(pdf, &content)?)?;
    page_obj.dict_put("Contents", contents)
}

fn new_stream(pdf: &mut PdfDocument, content: &str) -> Result<PdfObject, mupdf::Error> {
    let dict = pdf.new_dict()?;
    let mut stream = pdf.add_object(&dict)?;
    stream.write_stream_string(content)?;
    Ok(stream)
}

fn invert(m: &Matrix) -> Matrix {
    let det = m.a * m.d - m.b * m.c;
    if det.abs() < f32::EPSILON {
        return Matrix::IDENTITY;
    }
    Matrix::new(
        m.d / det,
        -m.b / det,
        -m.c / det,
        m.a / det,
        (m.c * m.f - m.d * m.e) / det,
        (m.b * m.e - m.a * m.f) / det,
    )
}

fn transform_rect(rect: &Rect, m: &Matrix) -> Option<Rect> {
    let apply = |x: f32, y: f32| (x * m.a + y * m.c + m.e, x * m.b + y * m.d + m.f);
    Rect::bounding([
        apply(rect.x0, rect.y0),
        apply(rect.x1, rect.y0),
        apply(rect.x0, rect.y1),
        apply(rect.x1, rect.y1),
    ])
}

fn utf8_path<'a>(path: &'a Path, parameter: &str) -> RedactorResult<&'a str> {
    path.to_str().ok_or_else(|| RedactorError::InvalidInput {
        parameter: parameter.to_string(),
        reason: "Path contains invalid UTF-8".to_string(),
    })
}

/// Whether case folding can change the needle at all.
fn has_case(needle: &str) -> bool {
    needle.chars().any(|c| c.is_lowercase() || c.is_uppercase())
}

/// For each case-insensitive occurrence of `needle` in `text`, in order,
/// whether the occurrence matches `needle` exactly.
fn exact_case_mask(text: &str, needle: &str) -> Option<Vec<bool>> {
    let regex = RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
        .ok()?;

    Some(regex.find_iter(text).map(|m| m.as_str() == needle).collect())
}

/// FFI helpers for MuPDF annotation operations.
mod ffi {
    use mupdf::pdf::PdfAnnotation;
    use mupdf::Rect;

    #[repr(C)]
    struct PdfAnnotRaw {
        inner: *mut mupdf_sys::pdf_annot,
    }

    /// Runs `f` with a fresh base context and the raw annotation pointer.
    ///
    /// # Safety
    /// The annotation must be valid and the context properly initialized.
    unsafe fn with_raw_annotation<F>(annot: &PdfAnnotation, f: F)
    where
        F: FnOnce(*mut mupdf_sys::fz_context, *mut mupdf_sys::pdf_annot),
    {
        let annot_raw = std::mem::transmute::<&PdfAnnotation, &PdfAnnotRaw>(annot);
        let ctx = mupdf_sys::mupdf_new_base_context();

        if !ctx.is_null() {
            f(ctx, annot_raw.inner);
            mupdf_sys::mupdf_drop_base_context(ctx);
        }
    }

    /// Sets the rectangle for a PDF annotation via FFI.
    ///
    /// # Safety
    /// This function uses unsafe FFI calls to access MuPDF's C API.
    pub unsafe fn set_annotation_rect(annot: &PdfAnnotation, rect: Rect) {
        with_raw_annotation(annot, |ctx, raw| {
            let fz_rect = mupdf_sys::fz_rect {
                x0: rect.x0,
                y0: rect.y0,
                x1: rect.x1,
                y1: rect.y1,
            };
            mupdf_sys::pdf_set_annot_rect(ctx, raw, fz_rect);
        });
    }
}
