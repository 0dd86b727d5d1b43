//! Error types for the stmt-core library.
//!
//! The extraction engine itself is infallible: a field it cannot find is
//! reported as "Not Detected", never as an error. These types cover the
//! layers around it (reading PDFs, the history store, export).

use thiserror::Error;

/// Main error type for the stmt library.
#[derive(Error, Debug)]
pub enum StmtError {
    /// PDF text-layer error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// History store error.
    #[error("history error: {0}")]
    History(#[from] HistoryError),

    /// CSV export error.
    #[error("export error: {0}")]
    Export(#[from] csv::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading the text layer of a PDF.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The PDF has no usable text layer (a scanned document that needs OCR).
    #[error("PDF has no text layer ({0} characters found)")]
    NoText(usize),
}

/// Errors related to the local extraction history.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// A stored line could not be decoded.
    #[error("corrupt history entry on line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    /// No entry with the requested id.
    #[error("history entry {0} not found")]
    NotFound(u64),
}

/// Result type for the stmt library.
pub type Result<T> = std::result::Result<T, StmtError>;
