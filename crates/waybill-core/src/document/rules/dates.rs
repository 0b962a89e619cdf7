//! Date extraction: birth date, passport issue date and licence issue date.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::patterns::{
    BIRTH_DATE_FALLBACK, BIRTH_DATE_PATTERNS, DATE_PARTS, ISSUE_DATE_FALLBACK,
    ISSUE_DATE_PATTERNS, LICENSE_DATE_FALLBACK, LICENSE_DATE_PATTERNS,
};
use super::{scan, FieldExtractor, FieldPattern};

/// Birth date extractor with a plausible year range.
pub struct BirthDateExtractor {
    min_year: i32,
    max_year: i32,
}

impl BirthDateExtractor {
    pub fn new() -> Self {
        Self {
            min_year: 1900,
            max_year: 2007,
        }
    }

    /// Accept only birth years within `min..=max`.
    pub fn with_year_range(mut self, min: i32, max: i32) -> Self {
        self.min_year = min;
        self.max_year = max;
        self
    }

    fn plausible(&self, date: &NaiveDate) -> bool {
        (self.min_year..=self.max_year).contains(&date.year())
    }
}

impl Default for BirthDateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BirthDateExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let labelled = first_date(text, &BIRTH_DATE_PATTERNS, |d| self.plausible(d));
        labelled.or_else(|| first_date(text, &BIRTH_DATE_FALLBACK, |d| self.plausible(d)))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        scan(text, &BIRTH_DATE_PATTERNS)
            .into_iter()
            .chain(scan(text, &BIRTH_DATE_FALLBACK))
            .filter_map(|m| parse_date(&m.value))
            .filter(|d| self.plausible(d))
            .map(|d| format_date(&d))
            .collect()
    }
}

/// Extract the date of birth with the default year range.
pub fn extract_birth_date(text: &str) -> Option<String> {
    BirthDateExtractor::new().extract(text)
}

/// Extract the passport issue date.
pub fn extract_issue_date(text: &str) -> Option<String> {
    first_date(text, &ISSUE_DATE_PATTERNS, |_| true)
        .or_else(|| first_date(text, &ISSUE_DATE_FALLBACK, |_| true))
}

/// Extract the driving licence issue date.
pub fn extract_license_date(text: &str) -> Option<String> {
    first_date(text, &LICENSE_DATE_PATTERNS, |_| true)
        .or_else(|| first_date(text, &LICENSE_DATE_FALLBACK, |_| true))
}

/// First match in text order that is a real calendar date accepted by `accept`.
fn first_date(
    text: &str,
    patterns: &[FieldPattern],
    accept: impl Fn(&NaiveDate) -> bool,
) -> Option<String> {
    let mut matches = scan(text, patterns);
    matches.sort_by_key(|m| m.start);

    for m in matches {
        match parse_date(&m.value) {
            Some(date) if accept(&date) => return Some(format_date(&date)),
            Some(date) => debug!("Date {} outside accepted range", date),
            None => debug!("Rejected impossible date '{}'", m.value),
        }
    }

    None
}

/// Parse `DD.MM.YYYY`, `DD/MM/YY` and similar into a calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let caps = DATE_PARTS.captures(s.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year = parse_year(&caps[3])?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Canonical `DD.MM.YYYY` rendering.
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    match s.len() {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        2 if year <= 50 => Some(2000 + year),
        2 => Some(1900 + year),
        4 => Some(year),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_date_separators() {
        let expected = NaiveDate::from_ymd_opt(1980, 2, 1);
        assert_eq!(parse_date("01.02.1980"), expected);
        assert_eq!(parse_date("01/02/1980"), expected);
        assert_eq!(parse_date("01-02-80"), expected);
        assert_eq!(parse_date("01.02.15"), NaiveDate::from_ymd_opt(2015, 2, 1));
    }

    #[test]
    fn test_parse_date_rejects_impossible() {
        assert_eq!(parse_date("31.02.1980"), None);
        assert_eq!(parse_date("01.13.1980"), None);
        assert_eq!(parse_date("01.02.198"), None);
    }

    #[test]
    fn test_birth_date_labelled() {
        assert_eq!(
            extract_birth_date("Дата рождения: 01/02/1980"),
            Some("01.02.1980".to_string())
        );
        assert_eq!(extract_birth_date("д.р. 15.07.1975"), Some("15.07.1975".to_string()));
    }

    #[test]
    fn test_birth_date_year_range() {
        assert_eq!(extract_birth_date("Дата рождения 01.01.2015"), None);
        assert_eq!(extract_birth_date("Дата рождения 01.01.1899"), None);
        let extractor = BirthDateExtractor::new().with_year_range(1950, 2020);
        assert_eq!(
            extractor.extract("Дата рождения 01.01.2015"),
            Some("01.01.2015".to_string())
        );
    }

    #[test]
    fn test_birth_date_skips_out_of_range_and_takes_next() {
        let text = "Иванов 01.01.2015 и 03.04.1985";
        assert_eq!(extract_birth_date(text), Some("03.04.1985".to_string()));
    }

    #[test]
    fn test_birth_date_fallback_ignores_issue_dates() {
        assert_eq!(extract_birth_date("12.03.2001 выдан ОВД"), None);
        assert_eq!(extract_birth_date("Иванов 12.03.1981 г.р."), Some("12.03.1981".to_string()));
    }

    #[test]
    fn test_issue_date() {
        assert_eq!(
            extract_issue_date("паспорт выдан 12.03.2015 ОВД района"),
            Some("12.03.2015".to_string())
        );
        assert_eq!(
            extract_issue_date("выдан ОВД Тверского района г. Москвы 01.02.15"),
            Some("01.02.2015".to_string())
        );
    }

    #[test]
    fn test_license_date() {
        assert_eq!(
            extract_license_date("ВУ 7712 654321 от 10.10.2018 г. тел. 89123456789"),
            Some("10.10.2018".to_string())
        );
        assert_eq!(
            extract_license_date("водительское удостоверение 7712654321 выдано 10.10.2018"),
            Some("10.10.2018".to_string())
        );
        assert_eq!(extract_license_date("ВУ 7712 654321 от 10.10.2018 Иванов"), None);
    }
}
