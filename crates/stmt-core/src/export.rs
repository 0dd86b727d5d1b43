//! JSON, CSV and plain-text rendering of extraction records.

use csv::{QuoteStyle, WriterBuilder};
use std::io;

use crate::error::{Result, StmtError};
use crate::models::statement::{ExtractionResult, Field};

/// Fields written to CSV, in column order.
pub const CSV_FIELDS: [Field; 8] = [
    Field::CustomerName,
    Field::CardIssuer,
    Field::CardLast4,
    Field::BillingCycle,
    Field::DueDate,
    Field::TotalDue,
    Field::CreditLimit,
    Field::AvailableCredit,
];

/// Outcome of one file in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub file_name: String,
    pub outcome: std::result::Result<ExtractionResult, String>,
}

impl BatchRow {
    pub fn ok(file_name: impl Into<String>, result: ExtractionResult) -> Self {
        Self {
            file_name: file_name.into(),
            outcome: Ok(result),
        }
    }

    pub fn failed(file_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            outcome: Err(error.into()),
        }
    }
}

/// Pretty-printed JSON with camelCase keys.
pub fn to_json(result: &ExtractionResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Header plus one row, every value quoted.
pub fn to_csv(result: &ExtractionResult) -> Result<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(vec![]);

    wtr.write_record(CSV_FIELDS.iter().map(|f| f.label()))?;
    wtr.write_record(CSV_FIELDS.iter().map(|f| result.get(*f)))?;

    finish(wtr)
}

/// Batch summary: a leading file name column and a trailing error column.
pub fn write_batch_csv<W: io::Write>(writer: W, rows: &[BatchRow]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    let mut header = vec!["File Name"];
    header.extend(CSV_FIELDS.iter().map(|f| f.label()));
    header.push("Error");
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.file_name.as_str()];
        match &row.outcome {
            Ok(result) => {
                record.extend(CSV_FIELDS.iter().map(|f| result.get(*f)));
                record.push("");
            }
            Err(error) => {
                record.extend(CSV_FIELDS.iter().map(|_| ""));
                record.push(error.as_str());
            }
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Batch summary rendered to a string.
pub fn batch_to_csv(rows: &[BatchRow]) -> Result<String> {
    let mut buf = Vec::new();
    write_batch_csv(&mut buf, rows)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// One "Label: value" line per field.
pub fn to_text(result: &ExtractionResult) -> String {
    let width = Field::ALL.iter().map(|f| f.label().len()).max().unwrap_or(0);
    Field::ALL
        .iter()
        .map(|f| format!("{:<width$}  {}", format!("{}:", f.label()), result.get(*f), width = width + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| StmtError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
