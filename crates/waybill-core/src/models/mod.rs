//! Data models: output fields, configuration and reference tables.

pub mod config;
pub mod fields;
pub mod reference;

pub use config::{ExtractionConfig, NormalizationConfig, ParserConfig};
pub use fields::{Field, FieldMapping, FieldValue};
pub use reference::{ReferenceData, ReferenceTables, Subdivision, Substitution};
