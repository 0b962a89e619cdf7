//! Canonical display form for extracted fields.
//!
//! Every rule here is idempotent: normalizing an already normalized mapping
//! returns it unchanged. Fields that are absent stay absent.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use tracing::{debug, warn};

use crate::error::{ExtractionError, Result};
use crate::models::{Field, FieldMapping, FieldValue, ReferenceTables, Substitution};
use crate::text::{capitalize, collapse_whitespace, preview, strip_whitespace, title_case};

lazy_static! {
    static ref GLUED_CITY: Regex = Regex::new(r"\bг\.([А-Яа-яЁё])").unwrap();
    static ref PLACE_BOILERPLATE: Regex = Regex::new(
        r"(?i)\s*(?:выдан|дата\s*выдачи|с\s*\d{2}\.\d{2}\.\d{4}|от\s*\d{2}\.\d{2}\.\d{4}|регистрация|дата\s*рождения).*"
    ).unwrap();

    static ref EMBEDDED_CODE: Regex = Regex::new(
        r"(?i)\s*код\s*подразделения\s*\d{3}-\d{3}\b"
    ).unwrap();
    static ref HOUSE_LONG: Regex = Regex::new(r"(?i)\bдом\.?\s*(\d+)").unwrap();
    static ref HOUSE: Regex = Regex::new(r"(?i)\bд\.?\s*(\d+)").unwrap();
    static ref FLAT: Regex = Regex::new(r"(?i)\bкв\.?\s*(\d+)").unwrap();
    static ref SETTLEMENT: Regex = Regex::new(r"(?i)\bпос(?:\.\s*|\s+)([А-Яа-яЁё]+)").unwrap();
    static ref SPLIT_FLAT_WORD: Regex = Regex::new(r"(?i)\bкв\s+артира\b").unwrap();
    static ref TRAILING_PERIOD: Regex = Regex::new(r"\.\s*$").unwrap();
}

/// Tokens kept lower-case in addresses on top of the small-words table.
const ADDRESS_ABBREVIATIONS: &[&str] = &["ул.", "д.", "кв.", "б-р", "дом."];

/// A compiled case-insensitive replacement.
struct Rewrite {
    pattern: Regex,
    replacement: String,
}

impl Rewrite {
    fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, NoExpand(self.replacement.as_str()))
            .into_owned()
    }
}

/// Field normalizer over a set of shared reference tables.
pub struct Normalizer {
    tables: Arc<dyn ReferenceTables>,
    streets: Vec<(Regex, String)>,
    cities: Vec<Rewrite>,
    canonical: Vec<Rewrite>,
}

impl Normalizer {
    /// Compile the table-driven substitutions.
    pub fn new(tables: Arc<dyn ReferenceTables>) -> Result<Self> {
        let streets = tables
            .protected_street_names()
            .iter()
            .map(|s| {
                let pattern = Regex::new(&format!(r"(?i)(ул\.?\s*){}", regex::escape(&s.from)))?;
                Ok((pattern, s.to.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let cities = tables
            .composite_cities()
            .iter()
            .chain(tables.city_nominative())
            .map(|s| whole_word(&s.from, &s.to))
            .collect::<Result<Vec<_>>>()?;

        let canonical = tables
            .protected_street_names()
            .iter()
            .chain(tables.composite_cities())
            .chain(tables.city_nominative())
            .map(|s: &Substitution| whole_word(&s.to, &s.to))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            tables,
            streets,
            cities,
            canonical,
        })
    }

    /// Normalize a copy of `mapping`.
    pub fn normalize(&self, mapping: &FieldMapping, text: &str) -> Result<FieldMapping> {
        debug!("Normalizing {} fields of '{}'", mapping.len(), preview(text));
        let mut normalized = mapping.clone();

        self.normalize_issuing_place(&mut normalized)?;

        for field in [Field::RegistrationAddress, Field::Propiska] {
            if let Some(address) = single(&normalized, field)? {
                let address = self.normalize_address(address);
                debug!("Normalized {}: {}", field, address);
                normalized.insert(field, address);
            }
        }

        if let Some(vehicle) = single(&normalized, Field::Vehicle)? {
            let vehicle = self.normalize_vehicle(vehicle, false);
            normalized.insert(Field::Vehicle, vehicle);
        }
        if let Some(trailer) = single(&normalized, Field::Trailer)? {
            let trailer = self.normalize_vehicle(trailer, true);
            normalized.insert(Field::Trailer, trailer);
        }

        Ok(normalized)
    }

    fn normalize_issuing_place(&self, mapping: &mut FieldMapping) -> Result<()> {
        if let Some(code) = single(mapping, Field::SubdivisionCode)?.map(str::to_string) {
            match self.tables.subdivision(&code) {
                Some(entry) => {
                    let current = single(mapping, Field::PassportIssuer)?
                        .unwrap_or(entry.subdivision.as_str())
                        .to_string();
                    let region = entry.region.to_lowercase();
                    let place = if !region.is_empty() && !current.to_lowercase().contains(&region) {
                        format!("{} ({})", entry.subdivision, entry.region)
                    } else {
                        current
                    };
                    debug!("Issuing place from subdivision {}: {}", code, place);
                    mapping.insert(Field::PassportIssuer, place);
                }
                None => warn!("Subdivision code {} not found in reference tables", code),
            }
        }

        if let Some(place) = single(mapping, Field::PassportIssuer)?.map(str::to_string) {
            let place = GLUED_CITY.replace_all(&place, "г. $1");
            let place = collapse_whitespace(&PLACE_BOILERPLATE.replace(&place, ""));
            // An empty value removes the key.
            mapping.insert(Field::PassportIssuer, place);
        }

        Ok(())
    }

    /// Canonical address spelling.
    pub fn normalize_address(&self, address: &str) -> String {
        let mut address = match self.tables.address_correction(address) {
            Some(fixed) => {
                debug!("Address replaced from corrections table");
                fixed.to_string()
            }
            None => address.to_string(),
        };

        address = EMBEDDED_CODE.replace_all(&address, "").into_owned();
        address = HOUSE_LONG.replace_all(&address, "дом. $1").into_owned();
        address = HOUSE.replace_all(&address, "д. $1").into_owned();
        address = FLAT.replace_all(&address, "кв. $1").into_owned();
        address = SETTLEMENT.replace_all(&address, "пос. $1").into_owned();

        for (pattern, street) in &self.streets {
            address = pattern
                .replace_all(&address, |caps: &regex::Captures| format!("{}{}", &caps[1], street))
                .into_owned();
        }
        for rewrite in &self.cities {
            address = rewrite.apply(&address);
        }

        address = SPLIT_FLAT_WORD.replace_all(&address, "квартира").into_owned();
        address = collapse_whitespace(&address);
        address = TRAILING_PERIOD.replace(&address, "").into_owned();

        let words: Vec<String> = address
            .split(' ')
            .map(|word| {
                let bare = word.trim_end_matches([',', ';']).to_lowercase();
                if self.tables.is_small_word(&bare) || ADDRESS_ABBREVIATIONS.contains(&bare.as_str()) {
                    word.to_lowercase()
                } else {
                    capitalize(word)
                }
            })
            .collect();
        address = words.join(" ");

        for rewrite in &self.canonical {
            address = rewrite.apply(&address);
        }

        address
    }

    /// `Brand PLATE` with the brand from the car or trailer table.
    pub fn normalize_vehicle(&self, value: &str, trailer: bool) -> String {
        let value = collapse_whitespace(value);
        let Some((first, rest)) = value.split_once(' ') else {
            return value.to_uppercase();
        };

        let brand = match self.canonical_brand(first, trailer) {
            Some(brand) => brand,
            None if is_brand_shaped(first) => title_case(first),
            None => return strip_whitespace(&value).to_uppercase(),
        };

        format!("{} {}", brand, strip_whitespace(rest).to_uppercase())
    }

    fn canonical_brand(&self, token: &str, trailer: bool) -> Option<String> {
        if token.chars().any(|c| c.is_ascii_digit()) {
            return None;
        }
        let key = token.to_lowercase();
        if !trailer && key == "mercedes" {
            return Some("Mercedes".to_string());
        }
        let lookup = |k: &str| {
            if trailer {
                self.tables.trailer_brand(k)
            } else {
                self.tables.car_brand(k)
            }
        };
        lookup(&key)
            .or_else(|| lookup(&self.tables.transliterate(&key)))
            .map(str::to_string)
    }
}

/// An unknown first token still counts as a brand when it is a word of
/// three or more characters; shorter ones are plate letter series.
fn is_brand_shaped(token: &str) -> bool {
    token.chars().count() >= 3 && !token.chars().any(|c| c.is_ascii_digit())
}

fn whole_word(from: &str, to: &str) -> Result<Rewrite> {
    let starts_word = from.chars().next().is_some_and(char::is_alphanumeric);
    let ends_word = from.chars().last().is_some_and(char::is_alphanumeric);
    let pattern = format!(
        "(?i){}{}{}",
        if starts_word { r"\b" } else { "" },
        regex::escape(from),
        if ends_word { r"\b" } else { "" },
    );
    Ok(Rewrite {
        pattern: Regex::new(&pattern)?,
        replacement: to.to_string(),
    })
}

/// The single string value of `field`, or an error when it holds a list.
fn single(mapping: &FieldMapping, field: Field) -> Result<Option<&str>> {
    match mapping.get(field) {
        None => Ok(None),
        Some(FieldValue::Single(value)) => Ok(Some(value.as_str())),
        Some(FieldValue::List(_)) => Err(ExtractionError::Validation {
            field: field.key().to_string(),
            reason: "expected a single value, found a list".to_string(),
        }
        .into()),
    }
}
