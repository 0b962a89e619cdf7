//! Core library for Russian road-freight driver document parsing.
//!
//! This crate provides:
//! - Rule-based field extraction (driver name, passport, licence, phones,
//!   vehicle and trailer plates, registration address, carrier)
//! - Candidate scoring and disambiguation between competing matches
//! - Normalization of extracted values against reference tables
//! - Parser configuration and reference data models

pub mod document;
pub mod error;
pub mod models;
pub mod text;

pub use document::{DocumentParser, DriverDocumentParser, Normalizer};
pub use error::{Result, WaybillError};
pub use models::{
    Field, FieldMapping, FieldValue, ParserConfig, ReferenceData, ReferenceTables,
};
