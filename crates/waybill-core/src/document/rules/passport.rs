//! Passport number, issuing authority and subdivision code.

use tracing::debug;

use super::patterns::{ISSUING_AUTHORITY, PASSPORT_PATTERNS, SUBDIVISION_CODE};
use super::scoring::PASSPORT_SCORING;
use super::{choose, ranked, scan, Candidate, FieldExtractor, DEFAULT_CONTEXT_WINDOW};
use crate::text::{collapse_whitespace, digits_only};

/// Passport series and number extractor.
///
/// Bare ten-digit groups compete with licence numbers, so candidates are
/// scored by nearby keywords: passport words boost, licence words penalize.
pub struct PassportNumberExtractor {
    context_window: usize,
}

impl PassportNumberExtractor {
    pub fn new() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }

    /// Set the number of context characters inspected for keywords.
    pub fn with_context_window(mut self, chars: usize) -> Self {
        self.context_window = chars;
        self
    }

    /// Scored candidates with valid ten-digit values.
    pub fn candidates(&self, text: &str) -> Vec<Candidate> {
        let matches = scan(text, &PASSPORT_PATTERNS)
            .into_iter()
            .filter(|m| digits_only(&m.value).len() == 10)
            .collect();
        PASSPORT_SCORING.candidates(text, matches, self.context_window)
    }
}

impl Default for PassportNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PassportNumberExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let winner = choose(self.candidates(text))?;
        debug!("Passport candidate '{}' won with {}", winner.value, winner.priority);
        format_document_number(&winner.value)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        ranked(self.candidates(text))
            .iter()
            .filter_map(|c| format_document_number(&c.value))
            .collect()
    }
}

/// Extract the passport number with the default context window.
pub fn extract_passport_number(text: &str) -> Option<String> {
    PassportNumberExtractor::new().extract(text)
}

/// Format a ten-digit document number as `XXXX XXXXXX`.
pub fn format_document_number(raw: &str) -> Option<String> {
    let digits = digits_only(raw);
    if digits.len() != 10 {
        return None;
    }
    Some(format!("{} {}", &digits[0..4], &digits[4..10]))
}

/// Extract the passport issuing authority.
pub fn extract_issuing_authority(text: &str) -> Option<String> {
    let caps = ISSUING_AUTHORITY.captures(text)?;
    let authority = collapse_whitespace(caps.get(1)?.as_str());
    let authority = authority.trim_end_matches([',', ' ']).to_string();
    if authority.is_empty() {
        None
    } else {
        Some(authority)
    }
}

/// Extract the passport subdivision code (`DDD-DDD`).
pub fn extract_subdivision_code(text: &str) -> Option<String> {
    SUBDIVISION_CODE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
