//! Statement parser running every field extractor over one document.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::statement::{ExtractionResult, Field};

use super::rules::validate::YearRange;
use super::rules::{
    detect_currency, AmountExtractor, BillingCycleExtractor, Candidate, CardExtractor, Column,
    DateExtractor, FieldExtractor, NameExtractor, StatementContext, Strategy,
};
use super::StatementExtractor;

/// Result of parsing one statement.
#[derive(Debug, Clone)]
pub struct ParseReport {
    /// Extracted record.
    pub result: ExtractionResult,
    /// Currency symbol applied to every amount.
    pub currency: String,
    /// Strategy that resolved each detected field.
    pub strategies: Vec<(Field, Strategy)>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Rule-based credit-card statement parser.
#[derive(Debug, Clone, Default)]
pub struct StatementParser {
    config: ExtractionConfig,
}

impl StatementParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom extraction settings.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    fn years(&self) -> YearRange {
        YearRange {
            min: self.config.min_year,
            max: self.config.max_year,
        }
    }

    fn date(&self, column: Column, ctx: &StatementContext) -> Option<Candidate<String>> {
        DateExtractor::new(column)
            .with_years(self.years())
            .extract(ctx)
    }

    fn amount(&self, column: Column, ctx: &StatementContext) -> Option<Candidate<String>> {
        AmountExtractor::new(column)
            .with_credit_limit_floor(self.config.credit_limit_floor)
            .with_max_digits(self.config.max_amount_digits)
            .extract(ctx)
    }

    /// Render an amount for display: currency prefix, separators
    /// optionally removed.
    fn format_amount(&self, currency: &str, raw: &str) -> String {
        if self.config.strip_amount_commas {
            format!("{}{}", currency, raw.replace(',', ""))
        } else {
            format!("{}{}", currency, raw)
        }
    }

    /// Parse raw OCR text into a record plus extraction details.
    pub fn parse(&self, text: &str) -> ParseReport {
        let start = Instant::now();
        info!("Parsing statement from {} characters of text", text.len());

        let ctx = StatementContext::new(text);
        let currency = detect_currency(&ctx.flat, &self.config.default_currency).to_string();

        let found = [
            (
                Field::CustomerName,
                NameExtractor::new()
                    .with_scan_lines(self.config.name_scan_lines)
                    .extract(&ctx),
            ),
            (Field::CardLast4, CardExtractor::new().extract(&ctx)),
            (
                Field::BillingCycle,
                BillingCycleExtractor::new()
                    .with_years(self.years())
                    .extract(&ctx),
            ),
            (Field::DueDate, self.date(Column::DueDate, &ctx)),
            (Field::StatementDate, self.date(Column::StatementDate, &ctx)),
            (Field::TotalDue, self.amount(Column::TotalDue, &ctx)),
            (Field::MinimumDue, self.amount(Column::MinimumDue, &ctx)),
            (Field::CreditLimit, self.amount(Column::CreditLimit, &ctx)),
            (Field::AvailableCredit, self.amount(Column::AvailableCredit, &ctx)),
            (Field::OpeningBalance, self.amount(Column::OpeningBalance, &ctx)),
        ];

        let mut result = ExtractionResult::new();
        let mut strategies = Vec::new();
        result.set(Field::CardIssuer, ctx.issuer.map(str::to_string));

        for (field, candidate) in found {
            let value = candidate.map(|c| {
                strategies.push((field, c.strategy));
                if field.is_monetary() {
                    self.format_amount(&currency, &c.value)
                } else {
                    c.value
                }
            });
            result.set(field, value);
        }

        let processing_time_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Extracted {} of {} fields in {} ms",
            result.detected_count(),
            Field::ALL.len(),
            processing_time_ms
        );

        ParseReport {
            result,
            currency,
            strategies,
            processing_time_ms,
        }
    }
}

impl StatementExtractor for StatementParser {
    fn extract(&self, text: &str) -> ExtractionResult {
        self.parse(text).result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::statement::NOT_DETECTED;
    use pretty_assertions::assert_eq;

    const SCENARIO_A: &str = "Name : MURALI KRISHNA VARIKUTI\nHDFC Bank\nCard No : 4893 77XX XXXX 2950\nPayment Due Date 11/01/2023\nTotal Dues 14,098.00";

    fn extract(text: &str) -> ExtractionResult {
        StatementParser::new().extract(text)
    }

    #[test]
    fn test_scenario_a() {
        let expected = ExtractionResult {
            card_issuer: "HDFC Bank".to_string(),
            customer_name: "MURALI KRISHNA VARIKUTI".to_string(),
            card_last4: "2950".to_string(),
            due_date: "11/01/2023".to_string(),
            total_due: "₹14098.00".to_string(),
            ..ExtractionResult::new()
        };
        assert_eq!(extract(SCENARIO_A), expected);
    }

    #[test]
    fn test_scenario_b_nothing_detected() {
        let result = extract("lorem ipsum dolor sit amet\nqwerty 12345 zxcv");
        assert_eq!(result, ExtractionResult::new());
        assert!(result.is_empty());
    }

    #[test]
    fn test_total_on_garbage_input() {
        let inputs = [
            String::new(),
            "\u{0}\u{1}\u{fffd}ÿþ ₹₹ ::: //// ----".to_string(),
            "===== Page 1 =====\n\n===== Page 2 =====".to_string(),
            "9".repeat(10_000),
            format!("{}\n", SCENARIO_A).repeat(300),
        ];

        for input in &inputs {
            let result = extract(input);
            for field in Field::ALL {
                assert!(!result.get(field).is_empty(), "{:?} empty", field);
            }
        }
    }

    #[test]
    fn test_megabyte_numeric_input_is_fast() {
        let text = "1 ".repeat(550_000);
        let start = std::time::Instant::now();
        let result = extract(&text);
        assert!(
            start.elapsed() < std::time::Duration::from_secs(30),
            "took {:?}",
            start.elapsed()
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_full_summary_table() {
        let text = "\
ICICI Bank Credit Card Statement
Customer Name: Asha Rao
Card Number: 4315XXXXXXXX6647
Statement Period: 01/04/2024 to 30/04/2024
Statement Date\tPayment Due Date
30/04/2024\t20/05/2024
Total Amount Due\tMinimum Amount Due\tOpening Balance
Rs. 25,310.40\tRs. 1,270.00\tRs. 8,000.00
Credit Limit\tAvailable Credit Limit\tAvailable Cash Limit
2,40,000.00\t2,14,689.60\t48,000.00";

        let report = StatementParser::new().parse(text);
        let expected = ExtractionResult {
            card_issuer: "ICICI Bank".to_string(),
            customer_name: "Asha Rao".to_string(),
            card_last4: "6647".to_string(),
            billing_cycle: "01/04/2024 to 30/04/2024".to_string(),
            due_date: "20/05/2024".to_string(),
            statement_date: "30/04/2024".to_string(),
            total_due: "₹25310.40".to_string(),
            minimum_due: "₹1270.00".to_string(),
            credit_limit: "₹240000.00".to_string(),
            available_credit: "₹214689.60".to_string(),
            opening_balance: "₹8000.00".to_string(),
        };
        assert_eq!(report.result, expected);
        assert_eq!(report.currency, "₹");
        assert!(report
            .strategies
            .contains(&(Field::MinimumDue, Strategy::HeaderColumn)));
    }

    #[test]
    fn test_relationship_number_is_not_card() {
        let result = extract("HDFC Bank\nRelationship Number 4045\nTotal Dues 100.00");
        assert_eq!(result.card_last4, NOT_DETECTED);
    }

    #[test]
    fn test_credit_limit_floor() {
        assert_eq!(extract("Credit Limit 500").credit_limit, NOT_DETECTED);
        assert_eq!(
            extract("Credit Limit 2,40,000.00").credit_limit,
            "₹240000.00"
        );
    }

    #[test]
    fn test_detected_currency_applies_to_all_amounts() {
        let result = extract("New Balance Total $1,200.50\nMinimum Payment Due $35.00");
        assert_eq!(result.total_due, "$1200.50");
        assert_eq!(result.minimum_due, "$35.00");
    }

    #[test]
    fn test_config_keeps_separators_and_default_currency() {
        let config = ExtractionConfig {
            strip_amount_commas: false,
            default_currency: "€".to_string(),
            ..ExtractionConfig::default()
        };
        let result = StatementParser::with_config(config).extract("Total Dues 14,098.00");
        assert_eq!(result.total_due, "€14,098.00");
    }

    #[test]
    fn test_page_markers_are_ordinary_text() {
        let text = "HDFC Bank\nPayment Due Date\n===== Page 2 =====\n11/01/2023";
        assert_eq!(extract(text).due_date, "11/01/2023");
    }
}
