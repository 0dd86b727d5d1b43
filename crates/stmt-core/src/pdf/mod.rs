//! Text-layer PDF input.
//!
//! Scanned statements go through OCR before they reach this crate. This
//! module covers statements that already carry a text layer and renders
//! them in the same page-delimited form the OCR pipeline produces.

mod extractor;

pub use extractor::{PdfPage, PdfTextReader};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF text sources.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF in one pass.
    fn extract_text(&self) -> Result<String>;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}

/// Delimiter line placed before each page, e.g. `===== Page 2 =====`.
pub fn page_marker(page: u32) -> String {
    format!("===== Page {} =====", page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::normalize::is_page_marker;

    #[test]
    fn test_page_marker_is_recognised_by_normalizer() {
        assert_eq!(page_marker(3), "===== Page 3 =====");
        assert!(is_page_marker(&page_marker(12)));
    }
}
