//! Plausibility checks and false-positive filters.
//!
//! Every candidate goes through one of these before it is accepted. A
//! rejected candidate lets the extractor move on to its next match or
//! strategy.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{
    ADDRESS_KEYWORDS, CARD_FALSE_POSITIVES, CITY_NAMES, NAME_STOP_WORDS, NUMERIC_DATE,
    REFERENCE_LABELS, TEXT_DATE_DAY_FIRST, TEXT_DATE_MONTH_FIRST,
};
use super::Strategy;

/// Default longest integer part of an amount.
pub const MAX_AMOUNT_DIGITS: usize = 12;

/// Default smallest credit limit accepted.
pub const CREDIT_LIMIT_FLOOR: u64 = 10_000;

/// Default earliest and latest statement years.
pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2030;

/// Accepted year range for dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            min: MIN_YEAR,
            max: MAX_YEAR,
        }
    }
}

impl YearRange {
    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

/// Check a customer-name candidate.
///
/// Lines picked up from the document layout (rather than after a label)
/// may hold at most four words.
pub fn plausible_name(name: &str, strategy: Strategy) -> bool {
    let max_words = match strategy {
        Strategy::LineBeforeAddress | Strategy::TitleCaseLine | Strategy::NameBeforeCity => 4,
        _ => 5,
    };

    let words: Vec<&str> = name.split_whitespace().collect();
    let len = name.chars().count();

    (2..=max_words).contains(&words.len())
        && (5..=60).contains(&len)
        && words.iter().all(|w| plausible_name_word(w))
}

fn plausible_name_word(word: &str) -> bool {
    let upper = word.trim_matches(|c| c == '.' || c == ',').to_uppercase();
    word.chars().count() >= 2
        && word.chars().all(|c| c.is_alphabetic() || c == '.' || c == '\'')
        && !NAME_STOP_WORDS.contains(&upper.as_str())
        && !CITY_NAMES.contains(&upper.as_str())
}

/// Whether a word can end a name (address, city, or structural keyword).
pub fn is_name_terminator(word: &str) -> bool {
    let upper = word.trim_matches(|c: char| !c.is_alphanumeric()).to_uppercase();
    upper.is_empty()
        || word.chars().any(|c| c.is_ascii_digit())
        || ADDRESS_KEYWORDS.contains(&upper.as_str())
        || ADDRESS_KEYWORDS.contains(&word.to_uppercase().as_str())
        || CITY_NAMES.contains(&upper.as_str())
        || NAME_STOP_WORDS.contains(&upper.as_str())
}

/// Whether a line reads like the first line of a postal address.
pub fn looks_like_address(line: &str) -> bool {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return false;
    };

    first.chars().any(|c| c.is_ascii_digit())
        || first.starts_with('#')
        || line.split_whitespace().any(|w| {
            let upper = w.trim_matches(|c: char| c == ',' || c == ':').to_uppercase();
            ADDRESS_KEYWORDS.contains(&upper.as_str()) && upper != "NO"
        })
}

/// Check a four-digit card suffix against the OCR false-positive filters.
pub fn plausible_card_suffix(digits: &str) -> bool {
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    // A calendar year next to masking characters.
    let value: u32 = digits.parse().unwrap_or(0);
    if (2000..=2030).contains(&value) {
        return false;
    }

    let first = digits.as_bytes()[0];
    if digits.bytes().all(|b| b == first) {
        return false;
    }

    !CARD_FALSE_POSITIVES.contains(&digits)
}

/// Whether the number at byte offset `pos` is labelled as a relationship,
/// customer, or account reference rather than a card number.
///
/// Only the part of the same line just before the number is inspected,
/// and a closer "card" label overrides a reference label.
pub fn is_reference_number(text: &str, pos: usize) -> bool {
    let Some(before) = text.get(..pos) else {
        return false;
    };
    let window: String = before
        .chars()
        .rev()
        .take_while(|&c| c != '\n')
        .take(48)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<String>()
        .to_lowercase();

    let reference = REFERENCE_LABELS
        .iter()
        .filter_map(|label| window.rfind(label))
        .max();
    let card = window.rfind("card");

    match (reference, card) {
        (Some(r), Some(c)) => r > c,
        (Some(_), None) => true,
        _ => false,
    }
}

/// Check a date as read: day 1-31, month 1-12, year inside `years`.
pub fn plausible_date(date: &str, years: YearRange) -> bool {
    let date = date.trim();

    let (day, month, year) = if let Some(caps) = NUMERIC_DATE.captures(date) {
        (
            caps[1].parse::<u32>().unwrap_or(0),
            caps[2].parse::<u32>().unwrap_or(0),
            parse_year(&caps[3]),
        )
    } else if let Some(caps) = TEXT_DATE_DAY_FIRST.captures(date) {
        (
            caps[1].parse::<u32>().unwrap_or(0),
            month_number(&caps[2]),
            parse_year(&caps[3]),
        )
    } else if let Some(caps) = TEXT_DATE_MONTH_FIRST.captures(date) {
        (
            caps[2].parse::<u32>().unwrap_or(0),
            month_number(&caps[1]),
            parse_year(&caps[3]),
        )
    } else {
        return false;
    };

    (1..=31).contains(&day) && (1..=12).contains(&month) && years.contains(year)
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if s.len() == 2 { 2000 + year } else { year }
}

fn month_number(abbrev: &str) -> u32 {
    match abbrev.to_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => 0,
    }
}

/// Limits applied to a monetary candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountLimits {
    /// Smallest accepted value (exclusive zero when `None`).
    pub floor: Option<u64>,
    /// Longest accepted integer part.
    pub max_digits: usize,
}

impl Default for AmountLimits {
    fn default() -> Self {
        Self {
            floor: None,
            max_digits: MAX_AMOUNT_DIGITS,
        }
    }
}

/// Check a monetary candidate given in its raw, comma-grouped form.
pub fn plausible_amount(raw: &str, limits: AmountLimits) -> bool {
    let plain = raw.replace(',', "");
    let integer_digits = plain.split('.').next().unwrap_or("").len();
    if integer_digits == 0 || integer_digits > limits.max_digits {
        return false;
    }

    let Ok(value) = Decimal::from_str(&plain) else {
        return false;
    };

    value > Decimal::ZERO && limits.floor.is_none_or(|floor| value >= Decimal::from(floor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plausible_names() {
        assert!(plausible_name("MURALI KRISHNA VARIKUTI", Strategy::NameLabel));
        assert!(plausible_name("Asha K. Rao", Strategy::NameLabel));
        assert!(!plausible_name("A B C D E", Strategy::NameLabel));
        assert!(!plausible_name("MURALI", Strategy::NameLabel));
        assert!(!plausible_name("HDFC BANK", Strategy::NameLabel));
        assert!(!plausible_name("CREDIT CARD STATEMENT", Strategy::TitleCaseLine));
        assert!(!plausible_name("RAVI KUMAR GURGAON", Strategy::NameLabel));
        assert!(!plausible_name("FLAT 12B", Strategy::NameLabel));
        assert!(!plausible_name("One Two Three Four Five", Strategy::TitleCaseLine));
        assert!(plausible_name("One Two Three Four Five", Strategy::NameLabel));
    }

    #[test]
    fn test_name_terminators() {
        assert!(is_name_terminator("FLAT"));
        assert!(is_name_terminator("H-No"));
        assert!(is_name_terminator("12B"));
        assert!(is_name_terminator("DELHI"));
        assert!(is_name_terminator("STATEMENT"));
        assert!(!is_name_terminator("KRISHNA"));
    }

    #[test]
    fn test_looks_like_address() {
        assert!(looks_like_address("12 MG ROAD"));
        assert!(looks_like_address("A-203 SUNRISE APARTMENTS"));
        assert!(looks_like_address("FLAT NO 4, SECTOR 21"));
        assert!(looks_like_address("#45 2nd Cross"));
        assert!(!looks_like_address("Statement Summary"));
        assert!(!looks_like_address(""));
    }

    #[test]
    fn test_card_suffix_filters() {
        assert!(plausible_card_suffix("2950"));
        assert!(!plausible_card_suffix("2024"));
        assert!(!plausible_card_suffix("2000"));
        assert!(!plausible_card_suffix("7777"));
        assert!(!plausible_card_suffix("1234"));
        assert!(!plausible_card_suffix("4045"));
        assert!(!plausible_card_suffix("12a4"));
        assert!(plausible_card_suffix("1999"));
    }

    #[test]
    fn test_reference_numbers() {
        let text = "Relationship No : XXXX XXXX 7788\nCard No : XXXX XXXX 6647";
        let rel = text.find("7788").unwrap();
        let card = text.find("6647").unwrap();
        assert!(is_reference_number(text, rel));
        assert!(!is_reference_number(text, card));
        let mixed = "Customer ID 11 Card No XXXX 6647";
        assert!(!is_reference_number(mixed, mixed.find("6647").unwrap()));
        let labelled = "Relationship Number 4045";
        assert!(is_reference_number(labelled, labelled.find("4045").unwrap()));
    }

    #[test]
    fn test_plausible_dates() {
        let years = YearRange::default();
        assert!(plausible_date("11/01/2023", years));
        assert!(plausible_date("11-01-23", years));
        assert!(plausible_date("15 Jan 2024", years));
        assert!(plausible_date("January 15, 2024", years));
        assert!(!plausible_date("32/01/2023", years));
        assert!(!plausible_date("11/13/2023", years));
        assert!(!plausible_date("11/01/1999", years));
        assert!(!plausible_date("11/01/2031", years));
        assert!(!plausible_date("not a date", years));
    }

    #[test]
    fn test_plausible_amounts() {
        let general = AmountLimits::default();
        let credit = AmountLimits {
            floor: Some(10_000),
            ..general
        };

        assert!(plausible_amount("14,098.00", general));
        assert!(plausible_amount("2,40,000.00", credit));
        assert!(!plausible_amount("500", credit));
        assert!(!plausible_amount("0.00", general));
        assert!(!plausible_amount("48937712345629", general));
        assert!(plausible_amount("500", general));
        assert!(plausible_amount("99,99,99,99,999.00", general));
        assert!(!plausible_amount("9,999,999,999,999", general));
    }

    #[test]
    fn test_amount_limits_match_config_defaults() {
        let config = crate::models::config::ExtractionConfig::default();
        assert_eq!(AmountLimits::default().max_digits, config.max_amount_digits);
        assert_eq!(CREDIT_LIMIT_FLOOR, config.credit_limit_floor);
        assert_eq!(YearRange::default(), YearRange { min: config.min_year, max: config.max_year });
    }
}
