//! Credit-card statement field extraction.

pub mod normalize;
mod parser;
pub mod rules;

pub use parser::{ParseReport, StatementParser};

use crate::models::statement::ExtractionResult;

/// Trait for statement field extractors.
///
/// Extraction is total: any input, including empty or garbage text,
/// yields a complete record.
pub trait StatementExtractor {
    /// Extract every field from raw OCR text.
    fn extract(&self, text: &str) -> ExtractionResult;
}
