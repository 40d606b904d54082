//! Page estimation and print pricing.
//!
//! Prices are computed in whole VND. The per-file amount is rounded half-up
//! to the nearest thousand, and any nonzero amount costs at least one
//! thousand.

use std::io::{Cursor, Read as _};
use std::path::Path;

use crate::error::{PrintHubError, Result};
use crate::models::{ColorMode, PaperSize};

/// Smallest priced unit in VND.
pub const PRICE_UNIT: u64 = 1000;

/// Bytes per kilobyte for the size heuristics.
const KIB: usize = 1024;

/// Assumed PDF bytes per page when the page tree cannot be read.
const PDF_BYTES_PER_PAGE: usize = 75 * KIB;

/// Assumed word-processor bytes per page when the document cannot be read.
const WORD_BYTES_PER_PAGE: usize = 30 * KIB;

/// Layout weight that fills one page in the DOCX heuristic.
const DOCX_WEIGHT_PER_PAGE: usize = 45;

/// Layout weight of a heading.
const DOCX_HEADING_WEIGHT: usize = 2;

/// Layout weight of a table.
const DOCX_TABLE_WEIGHT: usize = 8;

/// Layout weight of an embedded image.
const DOCX_IMAGE_WEIGHT: usize = 15;

/// Returns the price of one monochrome sheet in VND.
#[inline]
#[must_use]
pub const fn price_per_sheet(size: PaperSize) -> u64 {
    match size {
        PaperSize::A4 => 350,
        PaperSize::A5 => 200,
        PaperSize::A3 => 700,
    }
}

/// Broad file category, which drives page estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Raster or vector image; always one page.
    Image,
    /// PDF document.
    Pdf,
    /// Office Open XML word document (`.docx`).
    Docx,
    /// Legacy binary word document (`.doc`).
    Doc,
    /// Anything else.
    Other,
}

impl FileKind {
    /// Detects the kind from a file name's extension.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp" | "svg" => Self::Image,
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "doc" => Self::Doc,
            _ => Self::Other,
        }
    }

    /// Returns `true` for images.
    #[inline]
    #[must_use]
    pub const fn is_image(self) -> bool {
        matches!(self, Self::Image)
    }
}

/// How a page count was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateMethod {
    /// Images count as one page.
    Image,
    /// Read from the PDF page tree.
    PdfPageTree,
    /// Derived from the document's structure.
    DocumentLayout,
    /// Derived from the file size.
    FileSize,
}

impl EstimateMethod {
    /// Short name of the method.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::PdfPageTree => "pdf",
            Self::DocumentLayout => "layout",
            Self::FileSize => "file size",
        }
    }
}

/// Estimated page count of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEstimate {
    /// Page count, at least 1.
    pub pages: u32,
    /// How the count was obtained.
    pub method: EstimateMethod,
}

/// Estimates the page count of a file's contents.
///
/// Parsing failures never surface: they fall back to the size heuristic.
#[must_use]
pub fn estimate_pages(kind: FileKind, bytes: &[u8]) -> PageEstimate {
    let parsed = match kind {
        FileKind::Image => {
            return PageEstimate {
                pages: 1,
                method: EstimateMethod::Image,
            };
        }
        FileKind::Pdf => Some(count_pdf_pages(bytes).map(|pages| (pages, EstimateMethod::PdfPageTree))),
        FileKind::Docx => Some(estimate_docx_pages(bytes).map(|pages| (pages, EstimateMethod::DocumentLayout))),
        FileKind::Doc | FileKind::Other => None,
    };
    match parsed {
        Some(Ok((pages, method))) => PageEstimate {
            pages: pages.max(1),
            method,
        },
        Some(Err(err)) => {
            tracing::debug!(error = %err, ?kind, "page count failed, using size heuristic");
            size_estimate(kind, bytes.len())
        }
        None => size_estimate(kind, bytes.len()),
    }
}

/// Size-based estimate: one page per 30 KiB for word documents, 75 KiB
/// otherwise.
fn size_estimate(kind: FileKind, len: usize) -> PageEstimate {
    let per_page = match kind {
        FileKind::Docx | FileKind::Doc => WORD_BYTES_PER_PAGE,
        FileKind::Image | FileKind::Pdf | FileKind::Other => PDF_BYTES_PER_PAGE,
    };
    PageEstimate {
        pages: saturating_u32(len.div_ceil(per_page)).max(1),
        method: EstimateMethod::FileSize,
    }
}

/// Converts a count to `u32`, saturating.
fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Reads the page count from a PDF's page tree.
fn count_pdf_pages(bytes: &[u8]) -> Result<u32> {
    let document =
        lopdf::Document::load_mem(bytes).map_err(|err| PrintHubError::Document(err.to_string()))?;
    Ok(saturating_u32(document.get_pages().len()))
}

/// Structural counts extracted from a DOCX body.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct DocxLayout {
    /// Paragraph elements.
    paragraphs: usize,
    /// Paragraphs styled as headings.
    headings: usize,
    /// Tables.
    tables: usize,
    /// Embedded drawings and pictures.
    images: usize,
    /// Explicit page breaks.
    page_breaks: usize,
}

impl DocxLayout {
    /// Counts layout elements in `word/document.xml`.
    fn scan(xml: &str) -> Self {
        Self {
            paragraphs: xml.matches("<w:p>").count() + xml.matches("<w:p ").count(),
            headings: xml.matches("w:val=\"Heading").count(),
            tables: xml.matches("<w:tbl>").count(),
            images: xml.matches("<w:drawing>").count() + xml.matches("<w:pict>").count(),
            page_breaks: xml.matches("w:type=\"page\"").count(),
        }
    }

    /// Estimated pages: layout weight per page, but never fewer than the
    /// explicit breaks imply.
    fn pages(self) -> usize {
        let weight = self.paragraphs
            + self.headings * DOCX_HEADING_WEIGHT
            + self.tables * DOCX_TABLE_WEIGHT
            + self.images * DOCX_IMAGE_WEIGHT;
        weight
            .div_ceil(DOCX_WEIGHT_PER_PAGE)
            .max(self.page_breaks + 1)
    }
}

/// Estimates DOCX pages from the document body's structure.
fn estimate_docx_pages(bytes: &[u8]) -> Result<u32> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|err| PrintHubError::Document(err.to_string()))?;
    let mut body = archive
        .by_name("word/document.xml")
        .map_err(|err| PrintHubError::Document(err.to_string()))?;
    let mut xml = String::new();
    let _read = body
        .read_to_string(&mut xml)
        .map_err(|err| PrintHubError::Document(err.to_string()))?;
    Ok(saturating_u32(DocxLayout::scan(&xml).pages()))
}

/// Sheets needed for one copy: one for images, otherwise duplex.
#[inline]
#[must_use]
pub const fn sheets(kind: FileKind, pages: u32) -> u32 {
    if kind.is_image() { 1 } else { pages.div_ceil(2) }
}

/// Rounds a raw VND amount half-up to thousands, with a floor of one
/// thousand for any nonzero amount.
#[inline]
#[must_use]
pub const fn round_to_unit(raw: u64) -> u64 {
    if raw == 0 {
        return 0;
    }
    let units = raw.saturating_add(PRICE_UNIT / 2).div_euclid(PRICE_UNIT);
    let units = if units == 0 { 1 } else { units };
    units.saturating_mul(PRICE_UNIT)
}

/// Price of one file in VND.
#[must_use]
pub const fn file_price(kind: FileKind, pages: u32, size: PaperSize, color: ColorMode, quantity: u32) -> u64 {
    let raw = price_per_sheet(size)
        .saturating_mul(color.multiplier())
        .saturating_mul(sheets(kind, pages) as u64)
        .saturating_mul(quantity as u64);
    round_to_unit(raw)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn docx_with_body(body: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn monochrome_a4_single_page_costs_one_unit() {
        let price = file_price(FileKind::Pdf, 1, PaperSize::A4, ColorMode::Monochrome, 1);
        assert_eq!(price, 1000);
    }

    #[test]
    fn color_doubles_and_quantity_multiplies() {
        // 350 * 2 * ceil(3/2) * 2 = 2800 -> 3000
        let price = file_price(FileKind::Docx, 3, PaperSize::A4, ColorMode::Color, 2);
        assert_eq!(price, 3000);
    }

    #[test]
    fn half_rounds_up() {
        // 700 * 1 * ceil(9/2) * 1 = 3500 -> 4000
        let price = file_price(FileKind::Pdf, 9, PaperSize::A3, ColorMode::Monochrome, 1);
        assert_eq!(price, 4000);
        assert_eq!(round_to_unit(3499), 3000);
    }

    #[test]
    fn images_use_one_sheet() {
        assert_eq!(sheets(FileKind::Image, 40), 1);
        let price = file_price(FileKind::Image, 1, PaperSize::A5, ColorMode::Color, 3);
        assert_eq!(price, 1000);
    }

    #[test]
    fn every_price_is_positive_multiple_of_unit() {
        for size in PaperSize::ALL {
            for color in [ColorMode::Color, ColorMode::Monochrome] {
                for pages in 1..12 {
                    let price = file_price(FileKind::Pdf, pages, size, color, 1);
                    assert!(price >= PRICE_UNIT);
                    assert_eq!(price % PRICE_UNIT, 0);
                }
            }
        }
    }

    #[test]
    fn kind_from_extension() {
        assert_eq!(FileKind::from_name("Report.PDF"), FileKind::Pdf);
        assert_eq!(FileKind::from_name("photo.jpeg"), FileKind::Image);
        assert_eq!(FileKind::from_name("cv.docx"), FileKind::Docx);
        assert_eq!(FileKind::from_name("old.doc"), FileKind::Doc);
        assert_eq!(FileKind::from_name("README"), FileKind::Other);
    }

    #[test]
    fn image_is_always_one_page() {
        let estimate = estimate_pages(FileKind::Image, &vec![0_u8; 10 * 1024 * 1024]);
        assert_eq!(estimate.pages, 1);
        assert_eq!(estimate.method, EstimateMethod::Image);
    }

    #[test]
    fn unreadable_pdf_falls_back_to_size() {
        let estimate = estimate_pages(FileKind::Pdf, &vec![b'x'; 200 * 1024]);
        assert_eq!(estimate.method, EstimateMethod::FileSize);
        assert_eq!(estimate.pages, 3);
    }

    #[test]
    fn unreadable_docx_falls_back_to_size() {
        let estimate = estimate_pages(FileKind::Docx, &vec![b'x'; 61 * 1024]);
        assert_eq!(estimate.method, EstimateMethod::FileSize);
        assert_eq!(estimate.pages, 3);
    }

    #[test]
    fn empty_file_counts_one_page() {
        assert_eq!(estimate_pages(FileKind::Other, &[]).pages, 1);
    }

    #[test]
    fn docx_layout_counts_page_breaks() {
        let body = concat!(
            "<w:document><w:body>",
            "<w:p><w:r><w:t>One</w:t></w:r></w:p>",
            "<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>",
            "<w:p><w:r><w:t>Two</w:t></w:r></w:p>",
            "<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>",
            "<w:p><w:r><w:t>Three</w:t></w:r></w:p>",
            "</w:body></w:document>"
        );
        let estimate = estimate_pages(FileKind::Docx, &docx_with_body(body));
        assert_eq!(estimate.method, EstimateMethod::DocumentLayout);
        assert_eq!(estimate.pages, 3);
    }

    #[test]
    fn docx_layout_weighs_content() {
        let mut body = String::from("<w:document><w:body>");
        for _ in 0..80 {
            body.push_str("<w:p><w:r><w:t>line</w:t></w:r></w:p>");
        }
        body.push_str("<w:tbl></w:tbl><w:p><w:r><w:drawing></w:drawing></w:r></w:p>");
        body.push_str("</w:body></w:document>");
        // 81 paragraphs + 8 (table) + 15 (image) = 104 -> ceil(104 / 45) = 3
        let estimate = estimate_pages(FileKind::Docx, &docx_with_body(&body));
        assert_eq!(estimate.pages, 3);
    }

    #[test]
    fn docx_layout_scan_headings() {
        let layout = DocxLayout::scan(r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr></w:p>"#);
        assert_eq!(layout.headings, 1);
        assert_eq!(layout.paragraphs, 1);
        assert_eq!(layout.pages(), 1);
    }
}
