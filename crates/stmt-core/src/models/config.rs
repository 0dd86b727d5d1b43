//! Configuration structures for the statement parser.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::StmtError;
use crate::statement::rules::validate::{
    CREDIT_LIMIT_FLOOR, MAX_AMOUNT_DIGITS, MAX_YEAR, MIN_YEAR,
};

/// Main configuration for the stmt pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StmtConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF text-layer configuration.
    pub pdf: PdfConfig,

    /// Extraction history configuration.
    pub history: HistoryConfig,
}

/// Field extraction tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// How many leading lines the line-scoped name heuristics inspect.
    pub name_scan_lines: usize,

    /// Smallest credit limit accepted (smaller values are table artifacts).
    pub credit_limit_floor: u64,

    /// Longest integer part accepted for any amount.
    pub max_amount_digits: usize,

    /// Earliest plausible statement year.
    pub min_year: i32,

    /// Latest plausible statement year.
    pub max_year: i32,

    /// Remove thousands separators from rendered amounts.
    pub strip_amount_commas: bool,

    /// Currency symbol used when none is found in the text.
    pub default_currency: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            name_scan_lines: 15,
            credit_limit_floor: CREDIT_LIMIT_FLOOR,
            max_amount_digits: MAX_AMOUNT_DIGITS,
            min_year: MIN_YEAR,
            max_year: MAX_YEAR,
            strip_amount_commas: true,
            default_currency: "₹".to_string(),
        }
    }
}

/// PDF text-layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Separate pages with "===== Page N =====" markers.
    pub page_markers: bool,

    /// Minimum text length to consider the PDF text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            page_markers: true,
            min_text_length: 20,
        }
    }
}

/// Extraction history configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// History file; the CLI picks a per-user data path when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Number of entries returned by a listing.
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            limit: 20,
        }
    }
}

impl StmtConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Reject settings no statement could satisfy.
    pub fn validate(&self) -> crate::Result<()> {
        let extraction = &self.extraction;
        if extraction.min_year > extraction.max_year {
            return Err(StmtError::Config(format!(
                "extraction.min_year ({}) is after extraction.max_year ({})",
                extraction.min_year, extraction.max_year
            )));
        }
        if extraction.max_amount_digits == 0 {
            return Err(StmtError::Config(
                "extraction.max_amount_digits must be at least 1".to_string(),
            ));
        }
        if extraction.default_currency.trim().is_empty() {
            return Err(StmtError::Config(
                "extraction.default_currency must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: StmtConfig =
            serde_json::from_str(r#"{"extraction": {"credit_limit_floor": 5000}}"#).unwrap();

        assert_eq!(config.extraction.credit_limit_floor, 5000);
        assert_eq!(config.extraction.name_scan_lines, 15);
        assert_eq!(config.history.limit, 20);
        assert!(config.pdf.page_markers);
    }

    #[test]
    fn test_validate() {
        assert!(StmtConfig::default().validate().is_ok());

        let mut config = StmtConfig::default();
        config.extraction.min_year = 2031;
        assert!(matches!(config.validate(), Err(StmtError::Config(_))));

        let mut config = StmtConfig::default();
        config.extraction.max_amount_digits = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = StmtConfig::default();
        config.extraction.default_currency = "$".to_string();
        config.history.path = Some(dir.path().join("history.jsonl"));
        config.save(&path).unwrap();

        let loaded = StmtConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.default_currency, "$");
        assert_eq!(loaded.history.path, config.history.path);
    }
}
