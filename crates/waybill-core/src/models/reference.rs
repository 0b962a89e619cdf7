//! Static lookup tables consumed by the normalizer.
//!
//! The tables are configuration data: an embedded default ships in the
//! binary, and a JSON file with the same layout can replace it. They are
//! loaded once and only read afterwards.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReferenceError, Result};

/// Embedded default tables.
pub static EMBEDDED_REFERENCE_DATA: &str = include_str!("../../data/reference.json");

/// Issuing subdivision for a passport subdivision code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subdivision {
    /// Full subdivision name.
    pub subdivision: String,
    /// Region the subdivision belongs to.
    #[serde(default)]
    pub region: String,
}

/// A case-insensitive phrase substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

/// A whole-address replacement keyed by a lower-case fragment.
///
/// These exist because a handful of real documents were mangled beyond what
/// the generic rules recover. Keep the list short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressCorrection {
    pub fragment: String,
    pub address: String,
}

/// Lookup contract the normalizer depends on.
pub trait ReferenceTables: Send + Sync {
    /// Subdivision by `DDD-DDD` code.
    fn subdivision(&self, code: &str) -> Option<&Subdivision>;

    /// Canonical car brand by lower-case alias.
    fn car_brand(&self, key: &str) -> Option<&str>;

    /// Canonical trailer brand by lower-case alias.
    fn trailer_brand(&self, key: &str) -> Option<&str>;

    /// Whether a word stays lower-case in addresses.
    fn is_small_word(&self, word: &str) -> bool;

    /// Fixed replacement for an address containing a known fragment.
    fn address_correction(&self, address: &str) -> Option<&str>;

    /// Street names applied after `ул.`.
    fn protected_street_names(&self) -> &[Substitution];

    /// Multi-word city spellings.
    fn composite_cities(&self) -> &[Substitution];

    /// Oblique-case city names mapped to the nominative.
    fn city_nominative(&self) -> &[Substitution];

    /// Cyrillic to Latin transliteration; unknown characters pass through.
    fn transliterate(&self, text: &str) -> String;
}

/// Reference tables decoded from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceData {
    pub subdivisions: HashMap<String, Subdivision>,
    pub composite_cities: Vec<Substitution>,
    pub city_nominative: Vec<Substitution>,
    pub protected_street_names: Vec<Substitution>,
    pub small_words: HashSet<String>,
    pub car_brands: HashMap<String, String>,
    pub trailer_brands: HashMap<String, String>,
    pub address_corrections: Vec<AddressCorrection>,
    pub transliteration: HashMap<String, String>,
}

impl ReferenceData {
    /// Decode the tables bundled with the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_REFERENCE_DATA)
    }

    /// Load tables from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Decode and check tables from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut data: ReferenceData =
            serde_json::from_str(json).map_err(|e| ReferenceError::Load(e.to_string()))?;
        data.check()?;
        data.lowercase_keys();
        Ok(data)
    }

    fn check(&self) -> Result<()> {
        for (code, entry) in &self.subdivisions {
            if entry.subdivision.trim().is_empty() {
                return Err(corrupt("subdivisions", code));
            }
        }
        let substitutions = self
            .composite_cities
            .iter()
            .chain(&self.city_nominative)
            .chain(&self.protected_street_names);
        for sub in substitutions {
            if sub.from.trim().is_empty() || sub.to.trim().is_empty() {
                return Err(corrupt("substitutions", &sub.from));
            }
        }
        for correction in &self.address_corrections {
            if correction.fragment.trim().is_empty() || correction.address.trim().is_empty() {
                return Err(corrupt("address_corrections", &correction.fragment));
            }
        }
        for key in self.transliteration.keys() {
            if key.chars().count() != 1 {
                return Err(corrupt("transliteration", key));
            }
        }
        Ok(())
    }

    fn lowercase_keys(&mut self) {
        self.small_words = self.small_words.iter().map(|w| w.to_lowercase()).collect();
        self.car_brands = std::mem::take(&mut self.car_brands)
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        self.trailer_brands = std::mem::take(&mut self.trailer_brands)
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        for correction in &mut self.address_corrections {
            correction.fragment = correction.fragment.to_lowercase();
        }
    }
}

fn corrupt(table: &str, key: &str) -> crate::error::WaybillError {
    ReferenceError::CorruptEntry {
        table: table.to_string(),
        key: key.to_string(),
    }
    .into()
}

impl ReferenceTables for ReferenceData {
    fn subdivision(&self, code: &str) -> Option<&Subdivision> {
        self.subdivisions.get(code)
    }

    fn car_brand(&self, key: &str) -> Option<&str> {
        self.car_brands.get(key).map(String::as_str)
    }

    fn trailer_brand(&self, key: &str) -> Option<&str> {
        self.trailer_brands.get(key).map(String::as_str)
    }

    fn is_small_word(&self, word: &str) -> bool {
        self.small_words.contains(word)
    }

    fn address_correction(&self, address: &str) -> Option<&str> {
        let lower = address.to_lowercase();
        self.address_corrections
            .iter()
            .find(|c| lower.contains(&c.fragment))
            .map(|c| c.address.as_str())
    }

    fn protected_street_names(&self) -> &[Substitution] {
        &self.protected_street_names
    }

    fn composite_cities(&self) -> &[Substitution] {
        &self.composite_cities
    }

    fn city_nominative(&self) -> &[Substitution] {
        &self.city_nominative
    }

    fn transliterate(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut buf = [0u8; 4];
        for c in text.chars() {
            let key: &str = c.encode_utf8(&mut buf);
            match self.transliteration.get(key) {
                Some(latin) => out.push_str(latin),
                None => out.push(c),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_tables_load() {
        let data = ReferenceData::embedded().unwrap();
        assert!(data.subdivision("770-001").is_some());
        assert_eq!(data.car_brand("вольво"), Some("Volvo"));
        assert_eq!(data.trailer_brand("кроне"), Some("Krone"));
        assert!(data.is_small_word("ул."));
        assert!(!data.is_small_word("ленина"));
    }

    #[test]
    fn test_transliterate() {
        let data = ReferenceData::embedded().unwrap();
        assert_eq!(data.transliterate("вольво"), "volvo");
        assert_eq!(data.transliterate("ман 7"), "man 7");
    }

    #[test]
    fn test_address_correction_is_case_insensitive() {
        let data = ReferenceData::embedded().unwrap();
        let fixed = data.address_correction("г. Липецк, ул. Ангарская, 7-22");
        assert_eq!(fixed, None);
        let fixed = data.address_correction("г. ЛИПЕЦК АНГАРСКАЯ 7-22");
        assert_eq!(fixed, Some("Липецк ул. Ангарская д. 7 кв. 22"));
    }

    #[test]
    fn test_corrupt_subdivision_is_rejected() {
        let json = r#"{"subdivisions": {"770-001": {"subdivision": " ", "region": "Москва"}}}"#;
        assert!(ReferenceData::from_json(json).is_err());
    }

    #[test]
    fn test_bad_transliteration_key_is_rejected() {
        let json = r#"{"transliteration": {"ab": "x"}}"#;
        assert!(ReferenceData::from_json(json).is_err());
    }

    #[test]
    fn test_keys_are_lowercased_on_load() {
        let json = r#"{"car_brands": {"Volvo": "Volvo"}, "small_words": ["УЛ."]}"#;
        let data = ReferenceData::from_json(json).unwrap();
        assert_eq!(data.car_brand("volvo"), Some("Volvo"));
        assert!(data.is_small_word("ул."));
    }
}
