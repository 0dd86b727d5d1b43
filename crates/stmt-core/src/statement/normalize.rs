//! OCR text normalization.
//!
//! Two levels are produced from the same raw text:
//! - [`normalize`] flattens everything onto one line for single-regex matchers.
//! - [`normalize_lines`] keeps the line structure for the layout-aware
//!   extractors that read table rows.

/// Punctuation kept by [`normalize`]; everything else that is not
/// alphanumeric or whitespace is discarded.
const KEPT_PUNCTUATION: &[char] = &[
    '.', ',', '/', '-', '(', ')', '%', '*', '#', '&', '@', ':', '_', '–',
];

/// Currency glyphs kept by [`normalize`].
const CURRENCY_GLYPHS: &[char] = &['₹', '$', '¥', '€', '£'];

fn is_kept(c: char) -> bool {
    c.is_alphanumeric() || KEPT_PUNCTUATION.contains(&c) || CURRENCY_GLYPHS.contains(&c)
}

/// Flatten OCR text into a single line.
///
/// All whitespace becomes a single space, characters outside the allow-list
/// are dropped, and a digit run that OCR split on whitespace ("14 098")
/// is rejoined. A split is only rejoined when the token before the gap is
/// made of digits alone, so dates and decimal amounts that merely sit next
/// to each other stay apart.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    // Whether the token written since the last space is non-empty digits.
    let mut token_is_digits = false;

    for c in raw.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if !is_kept(c) {
            continue;
        }
        if pending_space {
            if !(c.is_ascii_digit() && token_is_digits) {
                out.push(' ');
                token_is_digits = c.is_ascii_digit();
            }
            pending_space = false;
        } else {
            token_is_digits = c.is_ascii_digit() && (token_is_digits || out.is_empty());
        }
        out.push(c);
    }

    out
}

/// Trim every line and drop blank ones, keeping line breaks.
///
/// Interior spacing (including tabs between table cells) is left alone.
pub fn normalize_lines(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether a line is a page delimiter inserted by the OCR pipeline,
/// e.g. `===== Page 2 =====`.
pub fn is_page_marker(line: &str) -> bool {
    let line = line.trim();
    let inner = line.trim_matches('=').trim();
    line.starts_with('=')
        && inner.len() < line.len()
        && inner
            .strip_prefix("Page")
            .map(|n| n.trim().chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  Total \t Dues\n\n 14,098.00  "), "Total Dues 14,098.00");
    }

    #[test]
    fn test_keeps_currency_and_punctuation() {
        assert_eq!(
            normalize("Rs. 1,200.50 | ₹300 € £ ¥ $ (Dr) 5% #12 A&B x@y.z"),
            "Rs. 1,200.50 ₹300 € £ ¥ $ (Dr) 5% #12 A&B x@y.z"
        );
    }

    #[test]
    fn test_drops_noise_characters() {
        assert_eq!(normalize("HDFC™ Bank’s «card»"), "HDFC Banks card");
    }

    #[test]
    fn test_rejoins_split_digit_runs() {
        assert_eq!(normalize("Amount 14 098"), "Amount 14098");
        assert_eq!(normalize("4893 7712 3456 2950"), "4893771234562950");
        assert_eq!(normalize("4893 77XX XXXX 2950"), "489377XX XXXX 2950");
    }

    #[test]
    fn test_long_split_digit_run_is_linear() {
        let raw = "1 ".repeat(600_000);
        let start = std::time::Instant::now();
        let flat = normalize(&raw);
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
        assert_eq!(flat.len(), 600_000);
        assert!(flat.bytes().all(|b| b == b'1'));
    }

    #[test]
    fn test_keeps_dates_and_amounts_apart() {
        assert_eq!(
            normalize("01/04/2024 30/04/2024\n14,098.00 702.00"),
            "01/04/2024 30/04/2024 14,098.00 702.00"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "   ",
            "1 2 3 4",
            "Name : MURALI KRISHNA\nCard No : 4893 77XX XXXX 2950\n\n===== Page 2 =====",
            "Statement Period: 01/04/2024 – 30/04/2024 ✓✓ ~~ 12  34",
            "\u{0}\u{1}garbage\u{feff} 99 | 88",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input: {:?}", s);
        }
    }

    #[test]
    fn test_normalize_lines() {
        let text = "  Payment Due Date\tTotal Dues  \n\n   11/01/2023\t14,098.00\r\n";
        assert_eq!(
            normalize_lines(text),
            "Payment Due Date\tTotal Dues\n11/01/2023\t14,098.00"
        );
        assert_eq!(normalize_lines(&normalize_lines(text)), normalize_lines(text));
    }

    #[test]
    fn test_page_marker() {
        assert!(is_page_marker("===== Page 2 ====="));
        assert!(is_page_marker("=====Page 10====="));
        assert!(!is_page_marker("Page 2"));
        assert!(!is_page_marker("===== Summary ====="));
        assert!(!is_page_marker("====="));
    }
}
