//! Rule-based field extractors for driver documents.
//!
//! Every extractor follows the same shape: collapse whitespace, run its
//! pattern lists through [`scan`], score or validate the raw matches, then
//! pick one winner with [`choose`] (or, for first-match fields, take the
//! first valid match in text order).

pub mod address;
pub mod carrier;
pub mod dates;
pub mod license;
pub mod name;
pub mod passport;
pub mod patterns;
pub mod phone;
pub mod scoring;
pub mod vehicle;

pub use address::{extract_address, AddressExtractor};
pub use carrier::{extract_carrier, CarrierExtractor, CarrierInfo};
pub use dates::{
    extract_birth_date, extract_issue_date, extract_license_date, format_date, parse_date,
    BirthDateExtractor,
};
pub use license::{extract_license_number, LicenseNumberExtractor};
pub use name::{expand_short_name, extract_name, NameExtractor};
pub use passport::{
    extract_issuing_authority, extract_passport_number, extract_subdivision_code,
    format_document_number, PassportNumberExtractor,
};
pub use phone::{extract_phones, format_phone, PhoneExtractor};
pub use scoring::{ContextRule, ScoringRules, Window};
pub use vehicle::{extract_trailer, extract_vehicle, VehicleExtractor, VehicleKind};

use regex::Regex;
use tracing::trace;

use crate::text::collapse_whitespace;

/// Default number of context characters inspected around a match.
pub const DEFAULT_CONTEXT_WINDOW: usize = 50;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the best value for the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract every acceptable value, in preference order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Check applied to the text right after a match.
///
/// Stands in for look-ahead, which the `regex` crate does not support. Guard
/// patterns are anchored with `^` by their authors.
#[derive(Debug)]
pub enum Guard {
    /// The following text must match.
    FollowedBy(Regex),
    /// The following text must not match.
    NotFollowedBy(Regex),
}

impl Guard {
    fn allows(&self, rest: &str) -> bool {
        match self {
            Guard::FollowedBy(re) => re.is_match(rest),
            Guard::NotFollowedBy(re) => !re.is_match(rest),
        }
    }
}

/// One entry of a per-field pattern list.
#[derive(Debug)]
pub struct FieldPattern {
    /// Compiled pattern.
    pub regex: Regex,
    /// Capture groups forming the value; several groups are joined by a space.
    pub groups: &'static [usize],
    /// Optional check on the text following the match.
    pub guard: Option<Guard>,
}

impl FieldPattern {
    pub fn new(regex: Regex) -> Self {
        Self {
            regex,
            groups: &[1],
            guard: None,
        }
    }

    /// Take the value from these groups instead of group 1.
    pub fn groups(mut self, groups: &'static [usize]) -> Self {
        self.groups = groups;
        self
    }

    /// Require the text after the match to match `regex`.
    pub fn followed_by(mut self, regex: Regex) -> Self {
        self.guard = Some(Guard::FollowedBy(regex));
        self
    }

    /// Reject matches whose following text matches `regex`.
    pub fn not_followed_by(mut self, regex: Regex) -> Self {
        self.guard = Some(Guard::NotFollowedBy(regex));
        self
    }
}

/// A pattern hit before scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    /// Value assembled from the designated groups, whitespace collapsed.
    pub value: String,
    /// Byte offset of the whole match in the scanned text.
    pub start: usize,
    /// Byte offset just past the whole match.
    pub end: usize,
}

/// A scored candidate for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Extracted value.
    pub value: String,
    /// Bigger wins.
    pub priority: i32,
    /// Start offset in the scanned text; later wins on equal priority.
    pub position: usize,
}

impl Candidate {
    pub fn new(value: impl Into<String>, priority: i32, position: usize) -> Self {
        Self {
            value: value.into(),
            priority,
            position,
        }
    }
}

/// Apply every pattern in order and collect all non-overlapping matches of
/// each. Patterns are independent, so the same substring may appear in
/// several results.
pub fn scan(text: &str, patterns: &[FieldPattern]) -> Vec<RawMatch> {
    let mut results = Vec::new();

    for (index, pattern) in patterns.iter().enumerate() {
        trace!("Applying pattern #{}: {}", index, pattern.regex.as_str());

        for caps in pattern.regex.captures_iter(text) {
            let Some(full_match) = caps.get(0) else {
                continue;
            };

            if let Some(guard) = &pattern.guard {
                if !guard.allows(&text[full_match.end()..]) {
                    trace!("Match '{}' rejected by guard", full_match.as_str());
                    continue;
                }
            }

            let parts: Vec<&str> = pattern
                .groups
                .iter()
                .filter_map(|&g| caps.get(g))
                .map(|m| m.as_str())
                .collect();
            let value = collapse_whitespace(&parts.join(" "));
            if value.is_empty() {
                continue;
            }

            results.push(RawMatch {
                value,
                start: full_match.start(),
                end: full_match.end(),
            });
        }
    }

    results
}

/// Run `primary`, falling back to `fallback` only when it finds nothing.
pub fn scan_with_fallback(
    text: &str,
    primary: &[FieldPattern],
    fallback: &[FieldPattern],
) -> Vec<RawMatch> {
    let matches = scan(text, primary);
    if matches.is_empty() {
        scan(text, fallback)
    } else {
        matches
    }
}

/// Order candidates best first: highest priority, then the textually latest.
pub fn ranked(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.position.cmp(&a.position))
    });
    candidates
}

/// Pick the winner among scored candidates.
pub fn choose(candidates: Vec<Candidate>) -> Option<Candidate> {
    ranked(candidates).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_prefers_priority_then_position() {
        let candidates = vec![
            Candidate::new("a", 200, 5),
            Candidate::new("b", 300, 1),
            Candidate::new("c", 300, 9),
        ];
        assert_eq!(choose(candidates).unwrap().value, "c");
    }

    #[test]
    fn test_choose_ignores_input_order() {
        let mut candidates = vec![
            Candidate::new("a", 100, 40),
            Candidate::new("b", 100, 2),
            Candidate::new("c", 50, 90),
        ];
        let first = choose(candidates.clone()).unwrap();
        candidates.reverse();
        assert_eq!(choose(candidates).unwrap(), first);
        assert_eq!(first.value, "a");
    }

    #[test]
    fn test_choose_empty() {
        assert!(choose(Vec::new()).is_none());
    }

    #[test]
    fn test_scan_joins_groups_and_collapses_whitespace() {
        let patterns = vec![
            FieldPattern::new(Regex::new(r"(\w+)\s+(\d+)").unwrap()).groups(&[1, 2]),
        ];
        let matches = scan("volvo   77 daf 12", &patterns);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].value, "volvo 77");
        assert_eq!(matches[1].value, "daf 12");
        assert_eq!(matches[1].start, 11);
    }

    #[test]
    fn test_scan_guards() {
        let patterns = vec![FieldPattern::new(Regex::new(r"(\d{4})").unwrap())
            .not_followed_by(Regex::new(r"^\s*x").unwrap())];
        let matches = scan("1111 x 2222 y", &patterns);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value, "2222");

        let patterns = vec![FieldPattern::new(Regex::new(r"(\d{4})").unwrap())
            .followed_by(Regex::new(r"^\s*x").unwrap())];
        let matches = scan("1111 x 2222 y", &patterns);
        assert_eq!(matches[0].value, "1111");
    }

    #[test]
    fn test_scan_keeps_overlapping_matches_from_different_patterns() {
        let patterns = vec![
            FieldPattern::new(Regex::new(r"key (\d+)").unwrap()),
            FieldPattern::new(Regex::new(r"(\d+)").unwrap()),
        ];
        let matches = scan("key 42", &patterns);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].start, 0);
        assert_eq!(matches[1].start, 4);
    }

    #[test]
    fn test_fallback_only_when_primary_empty() {
        let primary = vec![FieldPattern::new(Regex::new(r"a(\d)").unwrap())];
        let fallback = vec![FieldPattern::new(Regex::new(r"(\d)").unwrap())];
        assert_eq!(scan_with_fallback("a1 2", &primary, &fallback).len(), 1);
        assert_eq!(scan_with_fallback("b1 2", &primary, &fallback).len(), 2);
    }
}
