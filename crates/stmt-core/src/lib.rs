//! Core library for credit-card statement field extraction.
//!
//! This crate provides:
//! - OCR text normalization and rule-based field extraction (issuer,
//!   customer name, card suffix, dates, amounts)
//! - Text-layer PDF reading (feature `pdf`)
//! - A local extraction history and JSON/CSV export

pub mod error;
pub mod export;
pub mod history;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod statement;

pub use error::{HistoryError, PdfError, Result, StmtError};
pub use export::BatchRow;
pub use history::{HistoryEntry, HistoryStore};
pub use models::config::{ExtractionConfig, HistoryConfig, PdfConfig, StmtConfig};
pub use models::statement::{ExtractionResult, Field, NOT_DETECTED};
#[cfg(feature = "pdf")]
pub use pdf::{PdfProcessor, PdfTextReader};
pub use statement::{ParseReport, StatementExtractor, StatementParser};
