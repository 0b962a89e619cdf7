//! Tractor unit and trailer extraction.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::patterns::{TRAILER_PATTERNS, VEHICLE_PATTERNS, VEHICLE_VALUE};
use super::scoring::{ScoringRules, TRAILER_SCORING, VEHICLE_SCORING};
use super::{choose, ranked, scan, Candidate, FieldExtractor, DEFAULT_CONTEXT_WINDOW};
use crate::text::window_before;

lazy_static! {
    static ref MERSEDES_WORD: Regex = Regex::new(r"(?i)\b(?:мерседес|mersedes)(?:-benz)?\b").unwrap();
}

/// Which vehicle the extractor looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleKind {
    Tractor,
    Trailer,
}

/// Vehicle or trailer extractor.
pub struct VehicleExtractor {
    kind: VehicleKind,
    context_window: usize,
}

impl VehicleExtractor {
    pub fn new(kind: VehicleKind) -> Self {
        Self {
            kind,
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }

    /// Set the number of context characters inspected for keywords.
    pub fn with_context_window(mut self, chars: usize) -> Self {
        self.context_window = chars;
        self
    }

    fn scoring(&self) -> &'static ScoringRules {
        match self.kind {
            VehicleKind::Tractor => &VEHICLE_SCORING,
            VehicleKind::Trailer => &TRAILER_SCORING,
        }
    }

    pub fn candidates(&self, text: &str) -> Vec<Candidate> {
        let patterns = match self.kind {
            VehicleKind::Tractor => &*VEHICLE_PATTERNS,
            VehicleKind::Trailer => &*TRAILER_PATTERNS,
        };

        let matches = scan(text, patterns)
            .into_iter()
            .filter(|m| VEHICLE_VALUE.is_match(&m.value))
            .map(|mut m| {
                if self.kind == VehicleKind::Tractor {
                    let before = window_before(text, m.start, self.context_window);
                    m.value = spell_out_mercedes(&m.value, before);
                }
                m
            })
            .collect();

        self.scoring().candidates(text, matches, self.context_window)
    }
}

impl FieldExtractor for VehicleExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let winner = choose(self.candidates(text))?;
        debug!("{:?} candidate '{}' won with {}", self.kind, winner.value, winner.priority);
        Some(winner.value)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        ranked(self.candidates(text))
            .into_iter()
            .map(|c| c.value)
            .collect()
    }
}

/// Extract the tractor unit with the default context window.
pub fn extract_vehicle(text: &str) -> Option<String> {
    VehicleExtractor::new(VehicleKind::Tractor).extract(text)
}

/// Extract the trailer with the default context window.
pub fn extract_trailer(text: &str) -> Option<String> {
    VehicleExtractor::new(VehicleKind::Trailer).extract(text)
}

/// Write the Mercedes brand as `MERSEDES-BENZ` when the value or the text
/// before it spells it "мерседес"/"mersedes". Never doubles the suffix.
fn spell_out_mercedes(value: &str, before: &str) -> String {
    let lower_value = value.to_lowercase();
    let mentioned = before.to_lowercase().contains("мерседес")
        || lower_value.contains("мерседес")
        || lower_value.contains("mersedes");
    if !mentioned {
        return value.to_string();
    }
    MERSEDES_WORD.replace_all(value, "MERSEDES-BENZ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_brand_and_plate() {
        assert_eq!(
            extract_vehicle("а/м Вольво А123ВС77, прицеп"),
            Some("Вольво А123ВС77".to_string())
        );
    }

    #[test]
    fn test_labelled_upper_case_vehicle() {
        assert_eq!(
            extract_vehicle("Тягач: VOLVO FH А123ВС77 прицеп АВ 1234 77"),
            Some("VOLVO FH А123ВС77".to_string())
        );
    }

    #[test]
    fn test_mercedes_is_spelled_out_once() {
        assert_eq!(
            extract_vehicle("а/м Мерседес А123ВС77"),
            Some("MERSEDES-BENZ А123ВС77".to_string())
        );
        assert_eq!(
            extract_vehicle("а/м Mersedes-Benz А123ВС77"),
            Some("MERSEDES-BENZ А123ВС77".to_string())
        );
        assert_eq!(spell_out_mercedes("Вольво А123ВС77", "а/м "), "Вольво А123ВС77");
    }

    #[test]
    fn test_trailer() {
        assert_eq!(
            extract_trailer("а/м Вольво А123ВС77 прицеп АВ 1234 77"),
            Some("АВ 1234 77".to_string())
        );
        assert_eq!(
            extract_trailer("п/п Шмиц ав 1234 77"),
            Some("Шмиц ав 1234 77".to_string())
        );
    }

    #[test]
    fn test_no_vehicle() {
        assert_eq!(extract_vehicle("Иванов Иван Иванович"), None);
        assert_eq!(extract_trailer("Иванов Иван Иванович"), None);
    }
}
