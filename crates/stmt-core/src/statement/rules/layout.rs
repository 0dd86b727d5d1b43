//! Label/value layout matching over line-preserved text.
//!
//! After OCR a statement summary arrives in one of a few shapes:
//!
//! ```text
//! Total Dues 14,098.00                      label and value on one line
//! Total Dues Minimum Due 14,098.00 700.00   grouped row
//! Payment Due Date  Total Dues  Minimum Due header row,
//! 11/01/2023        14,098.00   700.00      values on a line below
//! ```
//!
//! Values are matched to labels by position among the labels of the same
//! kind (dates or amounts), so a date column does not shift the index of
//! an amount column.

use std::collections::HashMap;

use super::patterns::{Column, COLUMN_LABELS, GAP_FILLER};
use super::{Candidate, Strategy};
use crate::statement::normalize::is_page_marker;

/// Lines below a header row searched for its values.
const MAX_LOOKAHEAD: usize = 3;

/// Characters allowed between a label and its value on one line.
const GAP_PUNCTUATION: &str = " \t:-=|().*";

/// A column label found on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub column: Column,
    /// Priority of the label variant within its column (0 = preferred).
    pub rank: usize,
    pub start: usize,
    pub end: usize,
}

/// A value token found on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueMatch {
    pub start: usize,
    pub end: usize,
    pub value: String,
}

/// Find every column label on a line.
///
/// Overlapping matches are resolved longest-first, so "Available Credit
/// Limit" is one header and not an "Available Credit" plus a "Credit
/// Limit". The result is sorted left to right.
pub fn find_headers(line: &str, issuer: Option<&str>) -> Vec<Header> {
    let mut found = Vec::new();
    let mut ranks: HashMap<Column, usize> = HashMap::new();

    for label in COLUMN_LABELS.iter() {
        let next_rank = ranks.entry(label.column).or_insert(0);
        let rank = *next_rank;
        *next_rank += 1;

        if label.issuer.is_some_and(|required| issuer != Some(required)) {
            continue;
        }

        found.extend(label.pattern.find_iter(line).map(|m| Header {
            column: label.column,
            rank,
            start: m.start(),
            end: m.end(),
        }));
    }

    found.sort_by(|a, b| {
        (b.end - b.start)
            .cmp(&(a.end - a.start))
            .then(a.start.cmp(&b.start))
            .then(a.rank.cmp(&b.rank))
    });

    let mut kept: Vec<Header> = Vec::new();
    for header in found {
        if kept
            .iter()
            .all(|k| header.end <= k.start || header.start >= k.end)
        {
            kept.push(header);
        }
    }

    kept.sort_by_key(|h| h.start);
    kept
}

/// Find the value of `column` in line-preserved text.
///
/// Label variants are tried in priority order; for each occurrence of a
/// label the grouped-row, same-line and below-the-header layouts are
/// tried in turn. A layout that structurally applies but yields a value
/// rejected by `accept` ends the search for that occurrence, so a
/// misaligned table never donates a neighbouring column's value.
pub fn find_column_value<F, A>(
    lines: &[String],
    column: Column,
    issuer: Option<&str>,
    find_values: F,
    accept: A,
) -> Option<Candidate<String>>
where
    F: Fn(&str) -> Vec<ValueMatch>,
    A: Fn(&str) -> bool,
{
    let headers: Vec<Vec<Header>> = lines.iter().map(|l| find_headers(l, issuer)).collect();
    let max_rank = headers
        .iter()
        .flatten()
        .filter(|h| h.column == column)
        .map(|h| h.rank)
        .max()?;

    for rank in 0..=max_rank {
        for (idx, row) in headers.iter().enumerate() {
            for header in row.iter().filter(|h| h.column == column && h.rank == rank) {
                let found = match_header(lines, &headers, idx, header, &find_values, &accept);
                if found.is_some() {
                    return found;
                }
            }
        }
    }

    None
}

fn match_header<F, A>(
    lines: &[String],
    headers: &[Vec<Header>],
    idx: usize,
    header: &Header,
    find_values: &F,
    accept: &A,
) -> Option<Candidate<String>>
where
    F: Fn(&str) -> Vec<ValueMatch>,
    A: Fn(&str) -> bool,
{
    let line = &lines[idx];
    let kind = header.column.kind();
    let siblings: Vec<&Header> = headers[idx]
        .iter()
        .filter(|h| h.column.kind() == kind)
        .collect();
    let position = siblings.iter().position(|h| h.start == header.start)?;
    let values = find_values(line);

    let pick = |value: &str, strategy: Strategy| {
        accept(value).then(|| Candidate::new(value.to_string(), strategy))
    };

    if siblings.len() >= 2 {
        let first = siblings[0].start;
        let last = siblings[siblings.len() - 1].end;
        let interleaved = values.iter().any(|v| v.start < last && v.end > first);
        let after: Vec<&ValueMatch> = values.iter().filter(|v| v.start >= last).collect();

        if !interleaved && after.len() >= siblings.len() {
            return pick(&after[position].value, Strategy::GroupedRow);
        }
    }

    if let Some(value) = values.iter().find(|v| v.start >= header.end) {
        if is_gap_filler(&line[header.end..value.start]) {
            return pick(&value.value, Strategy::LabelSameLine);
        }
    }

    let strategy = if headers[idx].len() >= 2 {
        Strategy::HeaderColumn
    } else {
        Strategy::NextLine
    };

    let below = lines
        .iter()
        .enumerate()
        .skip(idx + 1)
        .filter(|(_, l)| !is_page_marker(l))
        .take(MAX_LOOKAHEAD);

    for (j, next) in below {
        let row = find_values(next);
        if row.is_empty() {
            // Another label row of a different kind may sit between a
            // header and its values; a label of the same kind starts a
            // new table.
            if headers[j].iter().any(|h| h.column.kind() == kind) {
                return None;
            }
            continue;
        }

        if row.len() < siblings.len() {
            return None;
        }
        return pick(&row[position].value, strategy);
    }

    None
}

/// Whether the text between a label and a value is only separators and
/// filler words ("Rs.", "is", "on", ...).
fn is_gap_filler(gap: &str) -> bool {
    GAP_FILLER
        .replace_all(gap, "")
        .chars()
        .all(|c| GAP_PUNCTUATION.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(|l| l.trim().to_string()).collect()
    }

    // Bare numbers, enough to exercise the layouts.
    fn numbers(line: &str) -> Vec<ValueMatch> {
        let mut out = Vec::new();
        let mut start = None;
        for (i, c) in line.char_indices().chain(std::iter::once((line.len(), ' '))) {
            match (c.is_ascii_digit() || c == ',' || c == '.', start) {
                (true, None) if c.is_ascii_digit() => start = Some(i),
                (false, Some(s)) => {
                    out.push(ValueMatch {
                        start: s,
                        end: i,
                        value: line[s..i].to_string(),
                    });
                    start = None;
                }
                _ => {}
            }
        }
        out
    }

    fn any(_: &str) -> bool {
        true
    }

    fn find(text: &str, column: Column) -> Option<(String, Strategy)> {
        find_column_value(&lines(text), column, None, numbers, any)
            .map(|c| (c.value, c.strategy))
    }

    #[test]
    fn test_headers_prefer_longest_label() {
        let headers = find_headers("Credit Limit Available Credit Limit Minimum Amount Due", None);
        let columns: Vec<Column> = headers.iter().map(|h| h.column).collect();
        assert_eq!(
            columns,
            vec![Column::CreditLimit, Column::AvailableCredit, Column::MinimumDue]
        );
    }

    #[test]
    fn test_issuer_only_labels() {
        assert!(find_headers("Closing Balance", None).is_empty());
        let headers = find_headers("Closing Balance", Some("American Express"));
        assert_eq!(headers[0].column, Column::TotalDue);
    }

    #[test]
    fn test_same_line() {
        assert_eq!(
            find("Total Dues : Rs. 14,098.00", Column::TotalDue),
            Some(("14,098.00".to_string(), Strategy::LabelSameLine))
        );
    }

    #[test]
    fn test_grouped_row() {
        let text = "Total Dues Minimum Due 14,098.00 700.00";
        assert_eq!(
            find(text, Column::MinimumDue),
            Some(("700.00".to_string(), Strategy::GroupedRow))
        );
        assert_eq!(
            find(text, Column::TotalDue),
            Some(("14,098.00".to_string(), Strategy::GroupedRow))
        );
    }

    #[test]
    fn test_header_row_with_values_below() {
        let text = "Credit Limit\tAvailable Credit Limit\tCash Limit\n2,40,000.00\t1,80,500.00\t48,000.00";
        assert_eq!(
            find(text, Column::AvailableCredit),
            Some(("1,80,500.00".to_string(), Strategy::HeaderColumn))
        );
        assert_eq!(
            find(text, Column::CreditLimit),
            Some(("2,40,000.00".to_string(), Strategy::HeaderColumn))
        );
    }

    #[test]
    fn test_next_line_skips_page_marker() {
        let text = "Opening Balance\n===== Page 2 =====\n5,120.00";
        assert_eq!(
            find(text, Column::OpeningBalance),
            Some(("5,120.00".to_string(), Strategy::NextLine))
        );
    }

    #[test]
    fn test_short_value_row_is_not_guessed() {
        let text = "Total Dues\tMinimum Due\tCredit Limit\n14,098.00";
        assert_eq!(find(text, Column::CreditLimit), None);
    }

    #[test]
    fn test_rejected_value_is_not_replaced() {
        let found = find_column_value(
            &lines("Credit Limit 500\n2,40,000.00"),
            Column::CreditLimit,
            None,
            numbers,
            |v| v.len() > 3,
        );
        assert_eq!(found, None);
    }

    #[test]
    fn test_missing_label() {
        assert_eq!(find("Nothing to see 14,098.00", Column::TotalDue), None);
    }
}
