//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use std::path::Path;
use tracing::{debug, warn};

use super::{page_marker, PdfProcessor, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// Text of a single PDF page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text from this page.
    pub text: String,
}

/// Reads the text layer of a PDF statement.
pub struct PdfTextReader {
    document: Option<Document>,
    raw_data: Vec<u8>,
    config: PdfConfig,
}

impl PdfTextReader {
    /// Create a new reader with default settings.
    pub fn new() -> Self {
        Self::with_config(PdfConfig::default())
    }

    /// Create a reader with custom settings.
    pub fn with_config(config: PdfConfig) -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            config,
        }
    }

    /// Load a PDF file and return its page-delimited text.
    pub fn read_file(path: &Path, config: PdfConfig) -> crate::Result<String> {
        let data = std::fs::read(path)?;
        let mut reader = Self::with_config(config);
        reader.load(&data)?;
        Ok(reader.read_text()?)
    }

    /// Text of every page of the loaded document.
    pub fn pages(&self) -> Vec<PdfPage> {
        (1..=self.page_count())
            .map(|number| {
                let text = self.extract_page_text(number).unwrap_or_else(|e| {
                    warn!("Page {}: {}", number, e);
                    String::new()
                });
                PdfPage { number, text }
            })
            .collect()
    }

    /// Page-delimited text of the loaded document.
    ///
    /// Falls back to whole-document extraction when the per-page pass
    /// finds nothing, and fails with [`PdfError::NoText`] for documents
    /// without a usable text layer.
    pub fn read_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        let pages = self.pages();
        let mut text = join_pages(&pages, self.config.page_markers);

        if text_length(&text) < self.config.min_text_length {
            debug!("Per-page extraction found too little text, trying pdf-extract");
            text = self.extract_text()?;
        }

        let length = text_length(&text);
        if length < self.config.min_text_length {
            return Err(PdfError::NoText(length));
        }

        debug!("Read {} characters from {} pages", length, pages.len());
        Ok(text)
    }
}

impl Default for PdfTextReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfTextReader {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Statements are often "protected" with an empty user password.
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))?;

        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

/// Join page texts, optionally preceding each with its page marker.
pub(crate) fn join_pages(pages: &[PdfPage], markers: bool) -> String {
    let mut out = String::new();

    for page in pages {
        let text = page.text.trim();
        if text.is_empty() && !markers {
            continue;
        }
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        if markers {
            out.push_str(&page_marker(page.number));
            out.push('\n');
        }
        out.push_str(text);
    }

    out
}

/// Characters of real content, ignoring whitespace and page markers.
fn text_length(text: &str) -> usize {
    text.lines()
        .filter(|l| !crate::statement::normalize::is_page_marker(l))
        .flat_map(str::chars)
        .filter(|c| !c.is_whitespace())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(number: u32, text: &str) -> PdfPage {
        PdfPage {
            number,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_reader_new() {
        let reader = PdfTextReader::new();
        assert!(reader.document.is_none());
        assert_eq!(reader.page_count(), 0);
        assert!(matches!(reader.read_text(), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_load_rejects_non_pdf() {
        let mut reader = PdfTextReader::new();
        let err = reader.load(b"Total Dues 14,098.00").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_join_pages_with_markers() {
        let pages = [page(1, "HDFC Bank\n"), page(2, "  Total Dues 14,098.00 ")];
        assert_eq!(
            join_pages(&pages, true),
            "===== Page 1 =====\nHDFC Bank\n\n===== Page 2 =====\nTotal Dues 14,098.00"
        );
    }

    #[test]
    fn test_join_pages_without_markers_skips_blank_pages() {
        let pages = [page(1, "HDFC Bank"), page(2, "   "), page(3, "Total Dues")];
        assert_eq!(join_pages(&pages, false), "HDFC Bank\n\nTotal Dues");
    }

    #[test]
    fn test_text_length_ignores_markers() {
        assert_eq!(text_length("===== Page 1 =====\n\n===== Page 2 ====="), 0);
        assert_eq!(text_length("===== Page 1 =====\nab c"), 3);
    }

    #[test]
    fn test_read_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = PdfTextReader::read_file(&dir.path().join("nope.pdf"), PdfConfig::default());
        assert!(matches!(result, Err(crate::StmtError::Io(_))));
    }
}
