//! Card issuer detection.

use tracing::debug;

use super::patterns::ISSUER_RULES;

/// Detect the card issuer from flattened statement text.
///
/// Rules are tried in catalog order and the first match wins, so a
/// specific name ("IDFC FIRST Bank") shadows a generic one ("IDFC").
pub fn detect_issuer(text: &str) -> Option<&'static str> {
    let found = ISSUER_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(text))
        .map(|rule| rule.name);

    debug!("Issuer detection: {:?}", found);
    found
}
