//! Rule-based field extractors for credit-card statements.

pub mod amounts;
pub mod card;
pub mod currency;
pub mod dates;
pub mod issuer;
pub mod layout;
pub mod name;
pub mod patterns;
pub mod validate;

pub use amounts::{extract_amount, AmountExtractor};
pub use card::{extract_card_last4, CardExtractor};
pub use currency::detect_currency;
pub use dates::{extract_billing_cycle, extract_date, BillingCycleExtractor, DateExtractor};
pub use issuer::detect_issuer;
pub use name::{extract_name, NameExtractor};
pub use patterns::{Column, ValueKind};

use super::normalize::{normalize, normalize_lines};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Run the strategy cascade and return the first plausible candidate.
    fn extract(&self, ctx: &StatementContext) -> Option<Candidate<Self::Output>>;
}

/// The heuristic that produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Label followed by its value on the same line.
    LabelSameLine,
    /// Several labels in a row followed by their values in the same order.
    GroupedRow,
    /// Value picked by column index from the row under a multi-column header.
    HeaderColumn,
    /// Label alone on a line, value on a following line.
    NextLine,
    /// Value printed before its label.
    TrailingLabel,
    /// Date range introduced by a period label.
    LabelledRange,
    /// Any "<date> to <date>" range.
    BareRange,
    /// Name after a "Name:"-style label.
    NameLabel,
    /// Name after an honorific, cut at the address.
    TitlePrefix,
    /// Name line directly above an address line.
    LineBeforeAddress,
    /// All-caps name directly before a city.
    NameBeforeCity,
    /// Lone Title-Case line near the top of the document.
    TitleCaseLine,
    /// Masked card number in an issuer's own format.
    IssuerMask,
    /// Masked number after a "Card No" label.
    CardLabel,
    /// Generic "XXXX XXXX 1234" style mask.
    GenericMask,
    /// "ending in 1234" phrasing.
    EndingIn,
}

/// A value proposed by one strategy, before formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<T> {
    /// Extracted value.
    pub value: T,
    /// Strategy that found it.
    pub strategy: Strategy,
}

impl<T> Candidate<T> {
    pub fn new(value: T, strategy: Strategy) -> Self {
        Self { value, strategy }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Candidate<U> {
        Candidate {
            value: f(self.value),
            strategy: self.strategy,
        }
    }
}

/// Normalized views of one document shared by all extractors.
#[derive(Debug, Clone)]
pub struct StatementContext {
    /// Whitespace-flattened text.
    pub flat: String,
    /// Trimmed, non-empty lines.
    pub lines: Vec<String>,
    /// Detected issuer, gating issuer-specific rules.
    pub issuer: Option<&'static str>,
}

impl StatementContext {
    /// Normalize raw OCR text and detect its issuer.
    pub fn new(raw: &str) -> Self {
        let mut ctx = Self::with_issuer(raw, None);
        ctx.issuer = detect_issuer(&ctx.flat);
        ctx
    }

    /// Normalize raw OCR text with a known issuer.
    pub fn with_issuer(raw: &str, issuer: Option<&'static str>) -> Self {
        Self {
            flat: normalize(raw),
            lines: normalize_lines(raw).lines().map(str::to_string).collect(),
            issuer,
        }
    }

    /// Line-preserving text joined back together.
    pub fn line_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether an issuer-restricted rule applies to this document.
    pub fn issuer_allows(&self, rule_issuer: Option<&str>) -> bool {
        match rule_issuer {
            None => true,
            Some(name) => self.issuer == Some(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_views() {
        let ctx = StatementContext::new("  HDFC Bank \n\n Total Dues\t14,098.00 \n");
        assert_eq!(ctx.issuer, Some("HDFC Bank"));
        assert_eq!(ctx.flat, "HDFC Bank Total Dues 14,098.00");
        assert_eq!(ctx.lines, vec!["HDFC Bank", "Total Dues\t14,098.00"]);
    }

    #[test]
    fn test_issuer_gate() {
        let ctx = StatementContext::with_issuer("", Some("SBI Card"));
        assert!(ctx.issuer_allows(None));
        assert!(ctx.issuer_allows(Some("SBI Card")));
        assert!(!ctx.issuer_allows(Some("HDFC Bank")));
    }

    #[test]
    fn test_candidate_map() {
        let c = Candidate::new("14,098.00", Strategy::LabelSameLine).map(|v| v.replace(',', ""));
        assert_eq!(c.value, "14098.00");
        assert_eq!(c.strategy, Strategy::LabelSameLine);
    }
}
