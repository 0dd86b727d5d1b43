//! Card-number suffix extraction.

use regex::Regex;
use tracing::debug;

use super::patterns::{CARD_ENDING_IN, CARD_LABEL, CARD_MASKS};
use super::validate::{is_reference_number, plausible_card_suffix};
use super::{Candidate, FieldExtractor, StatementContext, Strategy};

/// Characters that may make up a printed card number after its label.
const CARD_RUN_CHARS: &str = "0123456789Xx*•● \t-.";

/// Extractor for the last four digits of the masked card number.
///
/// Strategies, in order: the detected issuer's own mask format, a
/// masked run after a "Card No" label, generic masks, and "ending in"
/// phrasing.
#[derive(Debug, Default)]
pub struct CardExtractor;

impl CardExtractor {
    pub fn new() -> Self {
        Self
    }

    fn masks(
        &self,
        ctx: &StatementContext,
        text: &str,
        issuer_specific: bool,
    ) -> Option<Candidate<String>> {
        let strategy = if issuer_specific {
            Strategy::IssuerMask
        } else {
            Strategy::GenericMask
        };

        CARD_MASKS
            .iter()
            .filter(|mask| mask.issuer.is_some() == issuer_specific)
            .filter(|mask| ctx.issuer_allows(mask.issuer))
            .find_map(|mask| first_suffix(&mask.pattern, text))
            .map(|digits| Candidate::new(digits, strategy))
    }

    fn labelled(&self, text: &str) -> Option<Candidate<String>> {
        CARD_LABEL.find_iter(text).find_map(|label| {
            let raw: String = text[label.end()..]
                .chars()
                .take_while(|c| CARD_RUN_CHARS.contains(*c))
                .collect();

            // Stop once a full card length is reached so a figure printed
            // after the number is not read as its last group.
            let mut run = String::new();
            for group in raw.split_whitespace() {
                if run.chars().count() >= 15 {
                    break;
                }
                run.extend(group.chars().filter(|c| !matches!(c, '-' | '.')));
            }

            let len = run.chars().count();
            if !(12..=19).contains(&len) {
                return None;
            }

            let digits: String = run.chars().skip(len - 4).collect();
            (plausible_card_suffix(&digits) && !is_reference_number(text, label.start()))
                .then(|| Candidate::new(digits, Strategy::CardLabel))
        })
    }

    fn ending_in(&self, text: &str) -> Option<Candidate<String>> {
        first_suffix(&CARD_ENDING_IN, text).map(|digits| Candidate::new(digits, Strategy::EndingIn))
    }
}

/// First group-1 match of `pattern` that passes the false-positive filters.
fn first_suffix(pattern: &Regex, text: &str) -> Option<String> {
    pattern.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        let digits = caps.get(1)?.as_str();

        if !plausible_card_suffix(digits) {
            debug!("Rejected card suffix {}", digits);
            return None;
        }
        if is_reference_number(text, whole.start()) {
            debug!("Rejected reference number ending {}", digits);
            return None;
        }
        Some(digits.to_string())
    })
}

impl FieldExtractor for CardExtractor {
    type Output = String;

    fn extract(&self, ctx: &StatementContext) -> Option<Candidate<String>> {
        let text = ctx.line_text();

        let found = self
            .masks(ctx, &text, true)
            .or_else(|| self.labelled(&text))
            .or_else(|| self.masks(ctx, &text, false))
            .or_else(|| self.ending_in(&text));

        debug!("Card suffix: {:?}", found);
        found
    }
}

/// Extract the last four card digits from raw OCR text.
pub fn extract_card_last4(text: &str) -> Option<String> {
    CardExtractor::new()
        .extract(&StatementContext::new(text))
        .map(|c| c.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn last4(text: &str) -> Option<String> {
        extract_card_last4(text)
    }

    #[test]
    fn test_issuer_masks() {
        assert_eq!(
            last4("HDFC Bank\nCard No : 4893 77XX XXXX 2950"),
            Some("2950".to_string())
        );
        assert_eq!(
            last4("ICICI Bank\nCard 0000XXXXXXXX6647"),
            Some("6647".to_string())
        );
        assert_eq!(
            last4("SBI Card\nXXXX XXXX XXXX 8812"),
            Some("8812".to_string())
        );
    }

    #[test]
    fn test_generic_mask_without_issuer() {
        assert_eq!(last4("Card: **** **** 3141"), Some("3141".to_string()));
        assert_eq!(last4("XXXXXXXXXXXX5521"), Some("5521".to_string()));
    }

    #[test]
    fn test_labelled_card_number() {
        assert_eq!(last4("Card Number: 5241 •••• •••• 7730"), Some("7730".to_string()));
        assert_eq!(last4("Card No. 4000-12XX-XXXX-9071"), Some("9071".to_string()));
        assert_eq!(last4("Card No 4893 77XX XXXX 2950 14"), Some("2950".to_string()));
    }

    #[test]
    fn test_ending_in() {
        assert_eq!(
            last4("Your card ending in 8421 was billed"),
            Some("8421".to_string())
        );
        assert_eq!(last4("Last 4 digits: 3377"), Some("3377".to_string()));
    }

    #[test]
    fn test_year_after_mask_rejected() {
        assert_eq!(last4("XXXX XXXX 2024"), None);
        assert_eq!(last4("Statement XXXXXXXX2024"), None);
    }

    #[test]
    fn test_reference_numbers_rejected() {
        assert_eq!(last4("Relationship Number 4045"), None);
        assert_eq!(last4("Relationship No : XXXX XXXX 7788"), None);
        assert_eq!(
            last4("Relationship No : XXXX XXXX 7788\nCard No : XXXX XXXX 6647"),
            Some("6647".to_string())
        );
    }

    #[test]
    fn test_repeated_and_deny_listed_digits() {
        assert_eq!(last4("XXXX XXXX 7777"), None);
        assert_eq!(last4("card ending in 1234"), None);
        assert_eq!(last4("XXXX XXXX 0000"), None);
    }

    #[test]
    fn test_no_card() {
        assert_eq!(last4(""), None);
        assert_eq!(last4("Total Dues 14,098.00"), None);
    }
}
