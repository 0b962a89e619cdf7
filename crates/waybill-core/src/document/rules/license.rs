//! Driving licence number extraction.

use tracing::debug;

use super::passport::format_document_number;
use super::patterns::LICENSE_PATTERNS;
use super::scoring::LICENSE_SCORING;
use super::{choose, ranked, scan, Candidate, FieldExtractor, DEFAULT_CONTEXT_WINDOW};
use crate::text::digits_only;

/// Licence series and number extractor.
pub struct LicenseNumberExtractor {
    context_window: usize,
}

impl LicenseNumberExtractor {
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

    pub fn candidates(&self, text: &str) -> Vec<Candidate> {
        let matches = scan(text, &LICENSE_PATTERNS)
            .into_iter()
            .filter(|m| digits_only(&m.value).len() == 10)
            .collect();
        LICENSE_SCORING.candidates(text, matches, self.context_window)
    }
}

impl Default for LicenseNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for LicenseNumberExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let winner = choose(self.candidates(text))?;
        debug!("Licence candidate '{}' won with {}", winner.value, winner.priority);
        format_document_number(&winner.value)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        ranked(self.candidates(text))
            .iter()
            .filter_map(|c| format_document_number(&c.value))
            .collect()
    }
}

/// Extract the licence number with the default context window.
pub fn extract_license_number(text: &str) -> Option<String> {
    LicenseNumberExtractor::new().extract(text)
}
