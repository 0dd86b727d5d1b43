//! Customer name extraction.
//!
//! Address and header lines are the usual false positives, so every
//! candidate from every strategy goes through [`plausible_name`].

use tracing::debug;

use super::patterns::{NAME_BEFORE_CITY, NAME_LABELS, NAME_LINE, TITLE_CASE_LINE, TITLE_NAME};
use super::validate::{is_name_terminator, looks_like_address, plausible_name};
use super::{Candidate, FieldExtractor, StatementContext, Strategy};
use crate::statement::normalize::is_page_marker;

/// Longest name taken after a label.
const MAX_NAME_WORDS: usize = 5;

const HONORIFICS: &[&str] = &["MR", "MRS", "MS", "DR", "SHRI", "SMT"];

/// Customer name extractor.
pub struct NameExtractor {
    scan_lines: usize,
}

impl NameExtractor {
    pub fn new() -> Self {
        Self { scan_lines: 15 }
    }

    /// Number of leading lines inspected by the line-based strategies.
    pub fn with_scan_lines(mut self, scan_lines: usize) -> Self {
        self.scan_lines = scan_lines;
        self
    }

    fn accept(name: String, strategy: Strategy) -> Option<Candidate<String>> {
        if plausible_name(&name, strategy) {
            Some(Candidate::new(name, strategy))
        } else {
            debug!("Rejected name {:?} from {:?}", name, strategy);
            None
        }
    }

    /// "Name : MURALI KRISHNA", "Dear Asha Rao,", or a label alone on
    /// its line with the name below.
    fn by_label(&self, ctx: &StatementContext) -> Option<Candidate<String>> {
        for (idx, line) in ctx.lines.iter().enumerate() {
            for label in NAME_LABELS.iter().filter(|l| ctx.issuer_allows(l.issuer)) {
                let Some(caps) = label.pattern.captures(line) else {
                    continue;
                };

                let rest = caps.get(1).map_or("", |m| m.as_str()).trim();
                let name = if rest.is_empty() {
                    ctx.lines[idx + 1..]
                        .iter()
                        .find(|l| !is_page_marker(l))
                        .map(|next| take_name_words(next, MAX_NAME_WORDS))
                        .unwrap_or_default()
                } else {
                    take_name_words(rest, MAX_NAME_WORDS)
                };

                if let Some(found) = Self::accept(name, Strategy::NameLabel) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// "MR MURALI KRISHNA FLAT NO 4 ...", cut at the address.
    ///
    /// Matched per line, and never right after a figure, where "Dr" is
    /// the debit marker of an amount.
    fn by_title(&self, ctx: &StatementContext) -> Option<Candidate<String>> {
        ctx.lines
            .iter()
            .filter(|l| !is_page_marker(l))
            .find_map(|line| {
                TITLE_NAME.captures_iter(line).find_map(|caps| {
                    let title = caps.get(0)?;
                    if follows_figure(&line[..title.start()]) {
                        return None;
                    }
                    Self::accept(take_name_words(&caps[1], MAX_NAME_WORDS), Strategy::TitlePrefix)
                })
            })
    }

    /// A name line directly above the first address line.
    fn before_address(&self, ctx: &StatementContext) -> Option<Candidate<String>> {
        let lines: Vec<&str> = ctx
            .lines
            .iter()
            .map(String::as_str)
            .filter(|l| !is_page_marker(l))
            .take(self.scan_lines + 1)
            .collect();

        lines.windows(2).find_map(|pair| {
            let (line, next) = (pair[0], pair[1]);
            if NAME_LINE.is_match(line) && looks_like_address(next) {
                Self::accept(collapse(line), Strategy::LineBeforeAddress)
            } else {
                None
            }
        })
    }

    /// "RAVI KUMAR GURGAON": the longest clean run of words before a city.
    fn before_city(&self, ctx: &StatementContext) -> Option<Candidate<String>> {
        NAME_BEFORE_CITY.captures_iter(&ctx.flat).find_map(|caps| {
            let words: Vec<&str> = caps[1].split_whitespace().collect();
            (0..words.len().saturating_sub(1)).find_map(|skip| {
                let tail = &words[skip..];
                if tail.iter().any(|w| is_name_terminator(w)) {
                    return None;
                }
                Self::accept(tail.join(" "), Strategy::NameBeforeCity)
            })
        })
    }

    /// Any Title-Case line near the top of the document.
    fn title_case_line(&self, ctx: &StatementContext) -> Option<Candidate<String>> {
        ctx.lines
            .iter()
            .filter(|l| !is_page_marker(l))
            .take(self.scan_lines)
            .filter(|l| TITLE_CASE_LINE.is_match(l))
            .find_map(|l| Self::accept(collapse(l), Strategy::TitleCaseLine))
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for NameExtractor {
    type Output = String;

    fn extract(&self, ctx: &StatementContext) -> Option<Candidate<String>> {
        let found = self
            .by_label(ctx)
            .or_else(|| self.by_title(ctx))
            .or_else(|| self.before_address(ctx))
            .or_else(|| self.before_city(ctx))
            .or_else(|| self.title_case_line(ctx));

        debug!("Customer name: {:?}", found);
        found
    }
}

/// Whether the last token before `pos` carries a digit ("14,098.00").
fn follows_figure(before: &str) -> bool {
    before
        .split_whitespace()
        .next_back()
        .is_some_and(|token| token.chars().any(|c| c.is_ascii_digit()))
}

fn is_honorific(word: &str) -> bool {
    let word = word.trim_end_matches('.');
    HONORIFICS.iter().any(|h| h.eq_ignore_ascii_case(word))
}

/// Take leading name words, stopping at the first address, city or
/// structural keyword, or after a word ending in a comma. A leading
/// honorific is dropped.
fn take_name_words(text: &str, max: usize) -> String {
    let mut words = Vec::new();
    let mut tokens = text.split_whitespace().peekable();
    if tokens.peek().is_some_and(|w| is_honorific(w)) {
        tokens.next();
    }

    for raw in tokens {
        let word = raw.trim_end_matches([',', ';', ':']);
        if word.is_empty()
            || is_name_terminator(word)
            || !word.chars().all(|c| c.is_alphabetic() || c == '.' || c == '\'')
        {
            break;
        }

        words.push(word);
        if words.len() == max || word.len() < raw.len() {
            break;
        }
    }

    words.join(" ")
}

fn collapse(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract the customer name from raw OCR text.
pub fn extract_name(text: &str) -> Option<String> {
    NameExtractor::new()
        .extract(&StatementContext::new(text))
        .map(|c| c.value)
}
