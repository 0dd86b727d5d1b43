//! Monetary amount extraction.

use tracing::debug;

use super::layout::{find_column_value, ValueMatch};
use super::patterns::{
    Column, ValueKind, AMOUNT_GROUPING, AMOUNT_TOKEN, DATE_TOKEN, TOTAL_DUE_TRAILING,
};
use super::validate::{plausible_amount, AmountLimits, CREDIT_LIMIT_FLOOR};
use super::{Candidate, FieldExtractor, StatementContext, Strategy};

/// Find every amount token on a line.
///
/// The value keeps its thousands separators; currency markers and a
/// trailing Dr/Cr are not part of it. Digits that belong to a date, a
/// card mask, a percentage or a time are skipped.
pub fn find_amounts(line: &str) -> Vec<ValueMatch> {
    let dates: Vec<(usize, usize)> = DATE_TOKEN
        .find_iter(line)
        .map(|m| (m.start(), m.end()))
        .collect();

    let mut found = Vec::new();
    for caps in AMOUNT_TOKEN.captures_iter(line) {
        let Some(num) = caps.name("num") else {
            continue;
        };
        let value = num.as_str().trim_end_matches(',');
        let start = num.start();
        let end = start + value.len();
        let tail = caps.name("drcr").map_or(end, |m| m.end());

        let mut back = line[..start].chars().rev();
        let before = back.next();
        let has_currency = caps.name("cur").is_some();
        if !has_currency && before.is_some_and(|c| c.is_alphabetic() || c == '/') {
            continue;
        }
        // Second half of "10:30" or "1.2.3".
        if before.is_some_and(|c| matches!(c, ':' | '.'))
            && back.next().is_some_and(|c| c.is_ascii_digit())
        {
            continue;
        }

        let mut after = line[tail..].chars();
        let glued = match after.next() {
            Some(c) if c.is_alphanumeric() || matches!(c, '/' | '%' | ':') => true,
            Some('.') => after.next().is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        };
        if glued {
            continue;
        }

        if dates.iter().any(|&(s, e)| start < e && end > s) {
            continue;
        }

        if !AMOUNT_GROUPING.is_match(value) {
            continue;
        }

        found.push(ValueMatch {
            start,
            end,
            value: value.to_string(),
        });
    }

    found
}

/// Labelled amount extractor for one statement column.
pub struct AmountExtractor {
    column: Column,
    limits: AmountLimits,
}

impl AmountExtractor {
    pub fn new(column: Column) -> Self {
        let floor = (column == Column::CreditLimit).then_some(CREDIT_LIMIT_FLOOR);
        Self {
            column,
            limits: AmountLimits {
                floor,
                ..AmountLimits::default()
            },
        }
    }

    /// Smallest credit limit accepted; ignored for other columns.
    pub fn with_credit_limit_floor(mut self, floor: u64) -> Self {
        if self.column == Column::CreditLimit {
            self.limits.floor = Some(floor);
        }
        self
    }

    /// Longest integer part accepted.
    pub fn with_max_digits(mut self, max_digits: usize) -> Self {
        self.limits.max_digits = max_digits;
        self
    }

    /// "Rs. 14,098.00 Total", value before its label.
    fn trailing_label(&self, ctx: &StatementContext) -> Option<Candidate<String>> {
        if self.column != Column::TotalDue {
            return None;
        }

        let text = ctx.line_text();
        TOTAL_DUE_TRAILING
            .captures_iter(&text)
            .map(|caps| caps[1].trim_end_matches(',').to_string())
            .find(|v| AMOUNT_GROUPING.is_match(v) && plausible_amount(v, self.limits))
            .map(|v| Candidate::new(v, Strategy::TrailingLabel))
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = String;

    fn extract(&self, ctx: &StatementContext) -> Option<Candidate<String>> {
        if self.column.kind() != ValueKind::Amount {
            return None;
        }

        let found = find_column_value(&ctx.lines, self.column, ctx.issuer, find_amounts, |v| {
            plausible_amount(v, self.limits)
        })
        .or_else(|| self.trailing_label(ctx));

        debug!("{:?}: {:?}", self.column, found);
        found
    }
}

/// Extract a labelled amount from raw OCR text, separators kept.
pub fn extract_amount(text: &str, column: Column) -> Option<String> {
    AmountExtractor::new(column)
        .extract(&StatementContext::new(text))
        .map(|c| c.value)
}
