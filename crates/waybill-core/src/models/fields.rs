//! Field mapping produced by the driver document parser.
//!
//! Field names are the Cyrillic keys downstream record-keeping keys off, so
//! they are fixed by serde renames and must not change.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A canonical output field.
///
/// Declaration order is the order fields appear in a [`FieldMapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Driver full name.
    #[serde(rename = "Водитель")]
    DriverName,

    /// Date of birth, `DD.MM.YYYY`.
    #[serde(rename = "Дата_рождения")]
    DateOfBirth,

    /// Phone numbers, `+7 (XXX) XXX-XX-XX`.
    #[serde(rename = "Телефон")]
    Phones,

    /// Driving licence series and number, `XXXX XXXXXX`.
    #[serde(rename = "ВУ_серия_и_номер")]
    LicenseNumber,

    /// Driving licence issue or validity date.
    #[serde(rename = "В/У_дата_срок")]
    LicenseDate,

    /// Passport series and number, `XXXX XXXXXX`.
    #[serde(rename = "Паспорт_серия_и_номер")]
    PassportNumber,

    /// Passport issuing authority.
    #[serde(rename = "Паспорт_место_выдачи")]
    PassportIssuer,

    /// Passport issue date.
    #[serde(rename = "Паспорт_дата_выдачи")]
    PassportIssueDate,

    /// Passport issuing subdivision code, `DDD-DDD`.
    #[serde(rename = "Паспорт_код_подразделения")]
    SubdivisionCode,

    /// Tractor unit brand and plate.
    #[serde(rename = "Автомобиль")]
    Vehicle,

    /// Trailer brand and plate.
    #[serde(rename = "Прицеп")]
    Trailer,

    /// Carrier company.
    #[serde(rename = "Перевозчик")]
    Carrier,

    /// Carrier short name.
    #[serde(rename = "Короткое название")]
    CarrierShortName,

    /// Registration address.
    #[serde(rename = "Адрес_регистрации")]
    RegistrationAddress,

    /// Registration address under its legacy key.
    #[serde(rename = "Прописка")]
    Propiska,
}

impl Field {
    /// All fields in output order.
    pub const ALL: [Field; 15] = [
        Field::DriverName,
        Field::DateOfBirth,
        Field::Phones,
        Field::LicenseNumber,
        Field::LicenseDate,
        Field::PassportNumber,
        Field::PassportIssuer,
        Field::PassportIssueDate,
        Field::SubdivisionCode,
        Field::Vehicle,
        Field::Trailer,
        Field::Carrier,
        Field::CarrierShortName,
        Field::RegistrationAddress,
        Field::Propiska,
    ];

    /// The external key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            Field::DriverName => "Водитель",
            Field::DateOfBirth => "Дата_рождения",
            Field::Phones => "Телефон",
            Field::LicenseNumber => "ВУ_серия_и_номер",
            Field::LicenseDate => "В/У_дата_срок",
            Field::PassportNumber => "Паспорт_серия_и_номер",
            Field::PassportIssuer => "Паспорт_место_выдачи",
            Field::PassportIssueDate => "Паспорт_дата_выдачи",
            Field::SubdivisionCode => "Паспорт_код_подразделения",
            Field::Vehicle => "Автомобиль",
            Field::Trailer => "Прицеп",
            Field::Carrier => "Перевозчик",
            Field::CarrierShortName => "Короткое название",
            Field::RegistrationAddress => "Адрес_регистрации",
            Field::Propiska => "Прописка",
        }
    }

    /// Look a field up by its external key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Value stored for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Single-valued field.
    Single(String),
    /// List-valued field (phones).
    List(Vec<String>),
}

impl FieldValue {
    /// True when the value carries no data.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Single(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }

    /// The value as a single string, if single-valued.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Single(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    /// The value as a list, if list-valued.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::Single(_) => None,
            FieldValue::List(items) => Some(items),
        }
    }

    /// Flatten into one display string; lists are joined with `, `.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Single(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Single(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Single(value.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// Ordered mapping from field to value.
///
/// Absence of a key is the "not found" signal; empty values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping(BTreeMap<Field, FieldValue>);

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous one. Empty values are dropped
    /// and remove the key instead.
    pub fn insert(&mut self, field: Field, value: impl Into<FieldValue>) {
        let value = value.into();
        if value.is_empty() {
            self.0.remove(&field);
        } else {
            self.0.insert(field, value);
        }
    }

    /// Insert only when a value was found.
    pub fn insert_opt(&mut self, field: Field, value: Option<impl Into<FieldValue>>) {
        if let Some(value) = value {
            self.insert(field, value);
        }
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    /// Single-valued field as `&str`.
    pub fn get_str(&self, field: Field) -> Option<&str> {
        self.0.get(&field).and_then(FieldValue::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn remove(&mut self, field: Field) -> Option<FieldValue> {
        self.0.remove(&field)
    }

    /// Merge another mapping in; its values replace existing ones.
    pub fn extend(&mut self, other: FieldMapping) {
        for (field, value) in other.0 {
            self.insert(field, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Field, &FieldValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when at least one field holds a non-empty value.
    pub fn has_data(&self) -> bool {
        self.0.values().any(|v| !v.is_empty())
    }
}

impl FromIterator<(Field, FieldValue)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (Field, FieldValue)>>(iter: I) -> Self {
        let mut mapping = FieldMapping::new();
        for (field, value) in iter {
            mapping.insert(field, value);
        }
        mapping
    }
}
