//! Carrier company extraction.

use serde::{Deserialize, Serialize};

use super::patterns::{CARRIER, SOLE_TRADER_NAME};
use super::FieldExtractor;
use crate::text::{capitalize, collapse_whitespace};

/// Carrier name and its short form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierInfo {
    pub name: String,
    pub short_name: Option<String>,
}

/// Carrier extractor.
pub struct CarrierExtractor;

impl CarrierExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CarrierExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CarrierExtractor {
    type Output = CarrierInfo;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CARRIER
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| collapse_whitespace(m.as_str()).trim_end_matches([',', ';']).to_string())
            .filter(|name| !name.is_empty())
            .map(|name| CarrierInfo {
                short_name: short_name(&name),
                name,
            })
            .collect()
    }
}

/// Extract the carrier.
pub fn extract_carrier(text: &str) -> Option<CarrierInfo> {
    CarrierExtractor::new().extract(text)
}

/// Surname of a sole trader (`ИП Фамилия ...`), otherwise the last word.
fn short_name(name: &str) -> Option<String> {
    if let Some(caps) = SOLE_TRADER_NAME.captures(name) {
        return Some(capitalize(&caps[1]));
    }
    name.split_whitespace()
        .last()
        .map(|w| w.trim_matches(|c: char| c == '"' || c == '«' || c == '»'))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
}
