//! Statement extraction record.

use serde::{Deserialize, Serialize};

/// Sentinel stored in every field the extractor could not resolve.
pub const NOT_DETECTED: &str = "Not Detected";

/// Structured fields extracted from one credit-card statement.
///
/// Every field is a display-ready string. Absence is the literal
/// [`NOT_DETECTED`] sentinel, never an empty string, so consumers can
/// render the record without checking for missing values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Canonical issuer name (e.g. "HDFC Bank").
    pub card_issuer: String,

    /// Cardholder name as printed.
    pub customer_name: String,

    /// Last four digits of the masked card number.
    pub card_last4: String,

    /// Statement period, rendered as "<start> to <end>".
    pub billing_cycle: String,

    /// Payment due date.
    pub due_date: String,

    /// Statement generation date.
    pub statement_date: String,

    /// Total amount due, currency-prefixed.
    pub total_due: String,

    /// Minimum amount due, currency-prefixed.
    pub minimum_due: String,

    /// Credit limit, currency-prefixed.
    pub credit_limit: String,

    /// Available credit, currency-prefixed.
    pub available_credit: String,

    /// Opening (previous) balance, currency-prefixed.
    pub opening_balance: String,
}

impl Default for ExtractionResult {
    fn default() -> Self {
        let nd = || NOT_DETECTED.to_string();
        Self {
            card_issuer: nd(),
            customer_name: nd(),
            card_last4: nd(),
            billing_cycle: nd(),
            due_date: nd(),
            statement_date: nd(),
            total_due: nd(),
            minimum_due: nd(),
            credit_limit: nd(),
            available_credit: nd(),
            opening_balance: nd(),
        }
    }
}

/// Names the fields of an [`ExtractionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    CardIssuer,
    CustomerName,
    CardLast4,
    BillingCycle,
    DueDate,
    StatementDate,
    TotalDue,
    MinimumDue,
    CreditLimit,
    AvailableCredit,
    OpeningBalance,
}

impl Field {
    /// All fields in record order.
    pub const ALL: [Field; 11] = [
        Field::CardIssuer,
        Field::CustomerName,
        Field::CardLast4,
        Field::BillingCycle,
        Field::DueDate,
        Field::StatementDate,
        Field::TotalDue,
        Field::MinimumDue,
        Field::CreditLimit,
        Field::AvailableCredit,
        Field::OpeningBalance,
    ];

    /// Human-readable label used in CSV headers and text output.
    pub fn label(&self) -> &'static str {
        match self {
            Field::CardIssuer => "Card Issuer",
            Field::CustomerName => "Customer Name",
            Field::CardLast4 => "Card Last 4",
            Field::BillingCycle => "Billing Cycle",
            Field::DueDate => "Payment Due",
            Field::StatementDate => "Statement Date",
            Field::TotalDue => "Total Amount Due",
            Field::MinimumDue => "Minimum Amount Due",
            Field::CreditLimit => "Credit Limit",
            Field::AvailableCredit => "Available Credit",
            Field::OpeningBalance => "Opening Balance",
        }
    }

    /// Whether the field holds a currency amount.
    pub fn is_monetary(&self) -> bool {
        matches!(
            self,
            Field::TotalDue
                | Field::MinimumDue
                | Field::CreditLimit
                | Field::AvailableCredit
                | Field::OpeningBalance
        )
    }
}

impl ExtractionResult {
    /// Create a record with every field set to [`NOT_DETECTED`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the value of a field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::CardIssuer => &self.card_issuer,
            Field::CustomerName => &self.customer_name,
            Field::CardLast4 => &self.card_last4,
            Field::BillingCycle => &self.billing_cycle,
            Field::DueDate => &self.due_date,
            Field::StatementDate => &self.statement_date,
            Field::TotalDue => &self.total_due,
            Field::MinimumDue => &self.minimum_due,
            Field::CreditLimit => &self.credit_limit,
            Field::AvailableCredit => &self.available_credit,
            Field::OpeningBalance => &self.opening_balance,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::CardIssuer => &mut self.card_issuer,
            Field::CustomerName => &mut self.customer_name,
            Field::CardLast4 => &mut self.card_last4,
            Field::BillingCycle => &mut self.billing_cycle,
            Field::DueDate => &mut self.due_date,
            Field::StatementDate => &mut self.statement_date,
            Field::TotalDue => &mut self.total_due,
            Field::MinimumDue => &mut self.minimum_due,
            Field::CreditLimit => &mut self.credit_limit,
            Field::AvailableCredit => &mut self.available_credit,
            Field::OpeningBalance => &mut self.opening_balance,
        }
    }

    /// Store an extractor outcome, falling back to the sentinel on `None`.
    pub(crate) fn set(&mut self, field: Field, value: Option<String>) {
        *self.slot(field) = value.unwrap_or_else(|| NOT_DETECTED.to_string());
    }

    /// Return a copy with one field overwritten (the manual-correction path).
    ///
    /// A blank value resets the field to [`NOT_DETECTED`].
    pub fn with_field(&self, field: Field, value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        let mut updated = self.clone();
        updated.set(field, (!trimmed.is_empty()).then(|| trimmed.to_string()));
        updated
    }

    /// Whether a field holds a real value.
    pub fn is_detected(&self, field: Field) -> bool {
        self.get(field) != NOT_DETECTED
    }

    /// Fields that were not detected.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !self.is_detected(*f))
            .collect()
    }

    /// Number of detected fields.
    pub fn detected_count(&self) -> usize {
        Field::ALL.len() - self.missing_fields().len()
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.detected_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_not_detected() {
        let result = ExtractionResult::new();
        assert!(result.is_empty());
        for field in Field::ALL {
            assert_eq!(result.get(field), NOT_DETECTED);
        }
    }

    #[test]
    fn test_with_field_leaves_original_untouched() {
        let original = ExtractionResult::new();
        let edited = original.with_field(Field::CustomerName, "  ASHA RAO ");

        assert_eq!(edited.customer_name, "ASHA RAO");
        assert_eq!(original.customer_name, NOT_DETECTED);
        assert_eq!(edited.detected_count(), 1);

        let cleared = edited.with_field(Field::CustomerName, "   ");
        assert_eq!(cleared.customer_name, NOT_DETECTED);
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let result = ExtractionResult::new().with_field(Field::CardLast4, "2950");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["cardLast4"], "2950");
        assert_eq!(json["cardIssuer"], NOT_DETECTED);
        assert!(json.get("openingBalance").is_some());

        let back: ExtractionResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_monetary_fields() {
        let monetary: Vec<_> = Field::ALL.into_iter().filter(Field::is_monetary).collect();
        assert_eq!(monetary.len(), 5);
        assert!(!Field::DueDate.is_monetary());
    }
}
