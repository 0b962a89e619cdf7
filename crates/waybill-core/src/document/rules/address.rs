//! Registration address extraction.

use tracing::debug;

use super::patterns::{ADDRESS_FALLBACK, ADDRESS_PATTERNS, DATE_INSIDE};
use super::{scan, FieldExtractor};

/// Addresses this short are fragments, not addresses.
const MIN_ADDRESS_CHARS: usize = 10;

/// Registration address extractor.
///
/// Labelled patterns run first; the bare `г. ...` fallback only when no
/// labelled address is acceptable. The first acceptable match wins.
pub struct AddressExtractor;

impl AddressExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AddressExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AddressExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_address(text, &ADDRESS_PATTERNS).or_else(|| first_address(text, &ADDRESS_FALLBACK))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        scan(text, &ADDRESS_PATTERNS)
            .into_iter()
            .chain(scan(text, &ADDRESS_FALLBACK))
            .map(|m| clean_address(&m.value))
            .filter(|a| is_plausible_address(a))
            .collect()
    }
}

/// Extract the registration address.
pub fn extract_address(text: &str) -> Option<String> {
    AddressExtractor::new().extract(text)
}

fn first_address(text: &str, patterns: &[super::FieldPattern]) -> Option<String> {
    let mut matches = scan(text, patterns);
    matches.sort_by_key(|m| m.start);

    matches.into_iter().map(|m| clean_address(&m.value)).find(|address| {
        let ok = is_plausible_address(address);
        if !ok {
            debug!("Rejected address candidate '{}'", address);
        }
        ok
    })
}

fn clean_address(value: &str) -> String {
    value.trim_end_matches([',', ';', ' ']).to_string()
}

/// Long enough and free of embedded dates.
fn is_plausible_address(address: &str) -> bool {
    address.chars().count() > MIN_ADDRESS_CHARS && !DATE_INSIDE.is_match(address)
}
