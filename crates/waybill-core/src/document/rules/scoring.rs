//! Context scoring for competing candidates.
//!
//! A candidate starts at the field's base priority. Each rule fires at most
//! once, when any of its checks finds a keyword in its window, and adds its
//! weight; negative weights penalize. Keyword checks are case-insensitive
//! substring tests.

use super::{Candidate, RawMatch};
use crate::text::{window_around, window_before};

/// Where a rule looks for its keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// The context window preceding the match.
    Before,
    /// The match itself plus the context window on both sides.
    Around,
    /// The extracted value.
    Value,
}

/// Keywords looked for in one window.
#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub window: Window,
    pub keywords: &'static [&'static str],
}

/// One keyword rule.
#[derive(Debug, Clone, Copy)]
pub struct ContextRule {
    pub checks: &'static [Check],
    pub weight: i32,
}

const fn before(keywords: &'static [&'static str]) -> Check {
    Check { window: Window::Before, keywords }
}

const fn around(keywords: &'static [&'static str]) -> Check {
    Check { window: Window::Around, keywords }
}

const fn value(keywords: &'static [&'static str]) -> Check {
    Check { window: Window::Value, keywords }
}

/// Scoring table for one field.
#[derive(Debug, Clone, Copy)]
pub struct ScoringRules {
    pub base: i32,
    /// Added for every whitespace-separated word of the value.
    pub per_word: i32,
    pub rules: &'static [ContextRule],
}

impl ScoringRules {
    /// Priority of `m` found in `text`, with `window` characters of context.
    pub fn score(&self, text: &str, m: &RawMatch, window: usize) -> i32 {
        let mut priority = self.base;
        priority += self.per_word * m.value.split_whitespace().count() as i32;

        for rule in self.rules {
            let hit = rule.checks.iter().any(|check| {
                let haystack = match check.window {
                    Window::Before => window_before(text, m.start, window).to_lowercase(),
                    Window::Around => window_around(text, m.start, m.end, window).to_lowercase(),
                    Window::Value => m.value.to_lowercase(),
                };
                check.keywords.iter().any(|k| haystack.contains(k))
            });
            if hit {
                priority += rule.weight;
            }
        }

        priority
    }

    /// Score every match into a candidate.
    pub fn candidates(&self, text: &str, matches: Vec<RawMatch>, window: usize) -> Vec<Candidate> {
        matches
            .into_iter()
            .map(|m| {
                let priority = self.score(text, &m, window);
                Candidate::new(m.value, priority, m.start)
            })
            .collect()
    }
}

pub const NAME_LABELS: &[&str] = &["водитель", "ф.и.о.", "данные о водителе"];
pub const PASSPORT_KEYWORDS: &[&str] = &["паспорт", "серия"];
pub const LICENSE_KEYWORDS: &[&str] = &["ву", "в/у", "водительское", "права"];
pub const VEHICLE_KEYWORDS: &[&str] = &["а/м", "автомобиль", "машина", "тягач"];
pub const TRAILER_KEYWORDS: &[&str] = &["прицеп", "п/п"];
pub const TRAILER_BRAND_HINTS: &[&str] = &["шмиц", "кро"];

pub const NAME_SCORING: ScoringRules = ScoringRules {
    base: 200,
    per_word: 100,
    rules: &[ContextRule {
        checks: &[before(NAME_LABELS)],
        weight: 100,
    }],
};

pub const PASSPORT_SCORING: ScoringRules = ScoringRules {
    base: 200,
    per_word: 0,
    rules: &[
        ContextRule {
            checks: &[around(PASSPORT_KEYWORDS)],
            weight: 100,
        },
        ContextRule {
            checks: &[around(&["ву", "водительское", "права"])],
            weight: -100,
        },
    ],
};

pub const LICENSE_SCORING: ScoringRules = ScoringRules {
    base: 100,
    per_word: 0,
    rules: &[
        ContextRule {
            checks: &[around(LICENSE_KEYWORDS)],
            weight: 100,
        },
        ContextRule {
            checks: &[around(PASSPORT_KEYWORDS)],
            weight: -100,
        },
    ],
};

pub const VEHICLE_SCORING: ScoringRules = ScoringRules {
    base: 200,
    per_word: 0,
    rules: &[ContextRule {
        checks: &[before(VEHICLE_KEYWORDS)],
        weight: 100,
    }],
};

pub const TRAILER_SCORING: ScoringRules = ScoringRules {
    base: 200,
    per_word: 0,
    rules: &[ContextRule {
        checks: &[before(TRAILER_KEYWORDS), value(TRAILER_BRAND_HINTS)],
        weight: 50,
    }],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str, value: &str) -> RawMatch {
        let start = text.find(value).unwrap();
        RawMatch {
            value: value.to_string(),
            start,
            end: start + value.len(),
        }
    }

    #[test]
    fn test_passport_keyword_boost() {
        let text = "Паспорт 4510 123456";
        assert_eq!(PASSPORT_SCORING.score(text, &raw(text, "4510 123456"), 50), 300);
    }

    #[test]
    fn test_license_keyword_penalizes_passport() {
        let text = "ВУ 7712 654321";
        assert_eq!(PASSPORT_SCORING.score(text, &raw(text, "7712 654321"), 50), 100);
        assert_eq!(LICENSE_SCORING.score(text, &raw(text, "7712 654321"), 50), 200);
    }

    #[test]
    fn test_keywords_outside_window_are_ignored() {
        let text = format!("паспорт{}4510 123456", " ".repeat(60));
        assert_eq!(PASSPORT_SCORING.score(&text, &raw(&text, "4510 123456"), 50), 200);
    }

    #[test]
    fn test_name_scores_words_and_label() {
        let text = "Водитель: Иванов Иван Иванович";
        assert_eq!(NAME_SCORING.score(text, &raw(text, "Иванов Иван Иванович"), 50), 600);
        let text = "Иванов И.И.";
        assert_eq!(NAME_SCORING.score(text, &raw(text, "Иванов И.И."), 50), 400);
    }

    #[test]
    fn test_trailer_bonus_applies_once() {
        let text = "прицеп Шмиц АВ 1234 77";
        assert_eq!(TRAILER_SCORING.score(text, &raw(text, "Шмиц АВ 1234 77"), 50), 250);
        let text = "груз АВ 1234 77";
        assert_eq!(TRAILER_SCORING.score(text, &raw(text, "АВ 1234 77"), 50), 200);
    }

    #[test]
    fn test_vehicle_keyword_before() {
        let text = "а/м Вольво А123ВС77";
        assert_eq!(VEHICLE_SCORING.score(text, &raw(text, "А123ВС77"), 50), 300);
        assert_eq!(VEHICLE_SCORING.score(text, &raw(text, "а/м"), 50), 200);
    }
}
