//! Russian phone number extraction and formatting.

use tracing::debug;

use super::patterns::{PHONE_FALLBACK, PHONE_PATTERNS};
use super::{scan_with_fallback, FieldExtractor};
use crate::text::digits_only;

/// Phone number extractor.
pub struct PhoneExtractor;

impl PhoneExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PhoneExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PhoneExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Every distinct formatted phone, in text order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut matches = scan_with_fallback(text, &PHONE_PATTERNS, &PHONE_FALLBACK);
        matches.sort_by_key(|m| m.start);

        let mut phones: Vec<String> = Vec::new();
        for m in matches {
            match format_phone(&m.value) {
                Some(phone) if !phones.contains(&phone) => phones.push(phone),
                Some(_) => {}
                None => debug!("Skipping non-phone '{}'", m.value),
            }
        }

        phones
    }
}

/// Extract all phones from text.
pub fn extract_phones(text: &str) -> Vec<String> {
    PhoneExtractor::new().extract_all(text)
}

/// Reduce a raw phone to its 10 national digits.
///
/// Ten digits are taken as is unless they start with 7 or 8, which is the
/// shape of a licence or passport number; eleven digits starting with 7 or 8
/// lose the prefix; a `+` number with 11 to 13 digits keeps its last ten.
pub fn national_digits(raw: &str) -> Option<String> {
    let digits = digits_only(raw);
    let international = raw.trim_start().starts_with('+');

    match digits.len() {
        10 if digits.starts_with('7') || digits.starts_with('8') => None,
        10 => Some(digits),
        11 if digits.starts_with('7') || digits.starts_with('8') => Some(digits[1..].to_string()),
        11..=13 if international => Some(digits[digits.len() - 10..].to_string()),
        _ => None,
    }
}

/// Format a raw phone as `+7 (XXX) XXX-XX-XX`.
pub fn format_phone(raw: &str) -> Option<String> {
    let d = national_digits(raw)?;
    Some(format!(
        "+7 ({}) {}-{}-{}",
        &d[0..3],
        &d[3..6],
        &d[6..8],
        &d[8..10]
    ))
}
