//! Local extraction history.
//!
//! An append-only JSON-lines file with one [`HistoryEntry`] per line.
//! Stored records re-hydrate into the same [`ExtractionResult`] shape
//! they were saved from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{HistoryError, Result};
use crate::models::statement::ExtractionResult;

/// One saved extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Sequential id, starting at 1.
    pub id: u64,
    /// When the entry was saved.
    pub created_at: DateTime<Utc>,
    /// Name of the source file.
    pub file_name: String,
    /// Extracted record.
    pub result: ExtractionResult,
    /// Text the record was extracted from.
    pub raw_ocr_text: String,
}

/// JSON-lines history file.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Open (or prepare to create) the history file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All readable entries in file order. Corrupt lines are skipped.
    pub fn entries(&self) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&self.path)?);
        let mut entries = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    let err = HistoryError::Corrupt {
                        line: idx + 1,
                        reason: e.to_string(),
                    };
                    warn!("Skipping {}", err);
                }
            }
        }

        Ok(entries)
    }

    /// Save an extraction and return the stored entry.
    pub fn append(
        &self,
        file_name: &str,
        result: &ExtractionResult,
        raw_text: &str,
    ) -> Result<HistoryEntry> {
        let id = self.entries()?.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let entry = HistoryEntry {
            id,
            created_at: Utc::now(),
            file_name: file_name.to_string(),
            result: result.clone(),
            raw_ocr_text: raw_text.to_string(),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(&entry)?)?;

        debug!("Saved history entry {} for {}", id, file_name);
        Ok(entry)
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.entries()?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    /// Look up one entry by id.
    pub fn get(&self, id: u64) -> Result<HistoryEntry> {
        self.entries()?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| HistoryError::NotFound(id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StmtError;
    use crate::models::statement::Field;
    use pretty_assertions::assert_eq;

    fn store() -> (tempfile::TempDir, HistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("nested").join("history.jsonl")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_empty_store() {
        let (_dir, store) = store();
        assert!(store.entries().unwrap().is_empty());
        assert!(store.recent(5).unwrap().is_empty());
    }

    #[test]
    fn test_append_and_rehydrate() {
        let (_dir, store) = store();
        let result = ExtractionResult::new()
            .with_field(Field::CardIssuer, "HDFC Bank")
            .with_field(Field::TotalDue, "₹14098.00");

        let saved = store.append("march.pdf", &result, "HDFC Bank\nTotal Dues 14,098.00").unwrap();
        assert_eq!(saved.id, 1);

        let loaded = store.get(1).unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.result, result);
        assert_eq!(loaded.raw_ocr_text, "HDFC Bank\nTotal Dues 14,098.00");
    }

    #[test]
    fn test_recent_is_newest_first() {
        let (_dir, store) = store();
        let result = ExtractionResult::new();
        for name in ["a.pdf", "b.pdf", "c.pdf"] {
            store.append(name, &result, "").unwrap();
        }

        let names: Vec<String> = store
            .recent(2)
            .unwrap()
            .into_iter()
            .map(|e| e.file_name)
            .collect();
        assert_eq!(names, vec!["c.pdf", "b.pdf"]);
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let (_dir, store) = store();
        store.append("a.pdf", &ExtractionResult::new(), "").unwrap();
        let mut file = OpenOptions::new().append(true).open(store.path()).unwrap();
        writeln!(file, "{{not json").unwrap();
        store.append("b.pdf", &ExtractionResult::new(), "").unwrap();

        let entries = store.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].id, 2);
    }

    #[test]
    fn test_missing_entry() {
        let (_dir, store) = store();
        let err = store.get(42).unwrap_err();
        assert!(matches!(err, StmtError::History(HistoryError::NotFound(42))));
    }
}
