//! Document currency detection.

use super::patterns::CURRENCY_RULES;

/// Detect the currency symbol for the whole document.
///
/// Rupee markers take priority, then dollar, euro, pound and yen. Falls
/// back to `default` when no marker is present.
pub fn detect_currency<'a>(text: &str, default: &'a str) -> &'a str {
    CURRENCY_RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, symbol)| *symbol)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rupee_has_priority() {
        assert_eq!(detect_currency("Total USD 10 and Rs. 500", "₹"), "₹");
        assert_eq!(detect_currency("INR 1,000", "$"), "₹");
        assert_eq!(detect_currency("₹ 1,000", "$"), "₹");
    }

    #[test]
    fn test_other_currencies() {
        assert_eq!(detect_currency("New Balance $1,200.00", "₹"), "$");
        assert_eq!(detect_currency("Amount USD 40", "₹"), "$");
        assert_eq!(detect_currency("Saldo €40", "₹"), "€");
        assert_eq!(detect_currency("Balance £40", "₹"), "£");
        assert_eq!(detect_currency("¥4000", "₹"), "¥");
    }

    #[test]
    fn test_default_currency() {
        assert_eq!(detect_currency("Total Dues 14,098.00", "₹"), "₹");
        assert_eq!(detect_currency("", "€"), "€");
        assert_eq!(detect_currency("Hours worked", "₹"), "₹");
    }
}
