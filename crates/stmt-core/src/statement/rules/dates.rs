//! Date extraction for statement, due and billing-cycle dates.

use tracing::debug;

use super::layout::{find_column_value, ValueMatch};
use super::patterns::{
    Column, ValueKind, BILLING_CYCLE_BARE, BILLING_CYCLE_LABELLED, DATE_TOKEN, DUE_DATE_TRAILING,
};
use super::validate::{plausible_date, YearRange};
use super::{Candidate, FieldExtractor, StatementContext, Strategy};

/// Find every date token on a line, rendered for output.
pub fn find_dates(line: &str) -> Vec<ValueMatch> {
    DATE_TOKEN
        .find_iter(line)
        .map(|m| ValueMatch {
            start: m.start(),
            end: m.end(),
            value: render_date(m.as_str()),
        })
        .collect()
}

/// Render a date as read: numeric dates get slashes, textual dates keep
/// their wording with whitespace collapsed. Day/month order is never
/// changed.
pub fn render_date(date: &str) -> String {
    if date.chars().any(|c| c.is_alphabetic()) {
        date.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        date.replace('-', "/")
    }
}

/// Labelled date extractor (statement date or payment due date).
pub struct DateExtractor {
    column: Column,
    years: YearRange,
}

impl DateExtractor {
    pub fn new(column: Column) -> Self {
        Self {
            column,
            years: YearRange::default(),
        }
    }

    /// Restrict accepted dates to a year range.
    pub fn with_years(mut self, years: YearRange) -> Self {
        self.years = years;
        self
    }

    /// "11/01/2023 Payment Due", value before its label.
    fn trailing_label(&self, ctx: &StatementContext) -> Option<Candidate<String>> {
        if self.column != Column::DueDate {
            return None;
        }

        let text = ctx.line_text();
        DUE_DATE_TRAILING
            .captures_iter(&text)
            .map(|caps| render_date(&caps[1]))
            .find(|date| plausible_date(date, self.years))
            .map(|date| Candidate::new(date, Strategy::TrailingLabel))
    }
}

impl FieldExtractor for DateExtractor {
    type Output = String;

    fn extract(&self, ctx: &StatementContext) -> Option<Candidate<String>> {
        if self.column.kind() != ValueKind::Date {
            return None;
        }

        let found = find_column_value(&ctx.lines, self.column, ctx.issuer, find_dates, |d| {
            plausible_date(d, self.years)
        })
        .or_else(|| self.trailing_label(ctx));

        debug!("{:?}: {:?}", self.column, found);
        found
    }
}

/// Billing-cycle extractor.
pub struct BillingCycleExtractor {
    years: YearRange,
}

impl BillingCycleExtractor {
    pub fn new() -> Self {
        Self {
            years: YearRange::default(),
        }
    }

    /// Restrict accepted dates to a year range.
    pub fn with_years(mut self, years: YearRange) -> Self {
        self.years = years;
        self
    }
}

impl Default for BillingCycleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BillingCycleExtractor {
    type Output = String;

    fn extract(&self, ctx: &StatementContext) -> Option<Candidate<String>> {
        let text = ctx.line_text();
        let rules = [
            (&*BILLING_CYCLE_LABELLED, Strategy::LabelledRange),
            (&*BILLING_CYCLE_BARE, Strategy::BareRange),
        ];

        for (pattern, strategy) in rules {
            for caps in pattern.captures_iter(&text) {
                let start = render_date(&caps[1]);
                let end = render_date(&caps[2]);

                if plausible_date(&start, self.years) && plausible_date(&end, self.years) {
                    debug!("Billing cycle via {:?}", strategy);
                    return Some(Candidate::new(format!("{} to {}", start, end), strategy));
                }
            }
        }

        debug!("Billing cycle not found");
        None
    }
}

/// Extract a labelled date from raw OCR text.
pub fn extract_date(text: &str, column: Column) -> Option<String> {
    DateExtractor::new(column)
        .extract(&StatementContext::new(text))
        .map(|c| c.value)
}

/// Extract the billing cycle from raw OCR text as "<start> to <end>".
pub fn extract_billing_cycle(text: &str) -> Option<String> {
    BillingCycleExtractor::new()
        .extract(&StatementContext::new(text))
        .map(|c| c.value)
}
