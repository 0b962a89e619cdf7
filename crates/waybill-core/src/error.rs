//! Error types for the waybill-core library.
//!
//! A field that is simply not present in the text is never an error: the
//! extractors return `None` and the key stays out of the field mapping. The
//! variants below cover the situations that should abort a whole parse.

use thiserror::Error;

/// Main error type for the waybill library.
#[derive(Error, Debug)]
pub enum WaybillError {
    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Reference table error.
    #[error("reference data error: {0}")]
    Reference(#[from] ReferenceError),

    /// A pattern built from reference data failed to compile.
    #[error("pattern error: {0}")]
    Regex(#[from] regex::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while extracting or normalizing fields.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Field validation failed in a way that indicates a bug rather than a miss.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },
}

/// Errors related to the static lookup tables.
#[derive(Error, Debug)]
pub enum ReferenceError {
    /// The table document could not be decoded.
    #[error("failed to load reference tables: {0}")]
    Load(String),

    /// An entry is present but unusable.
    #[error("corrupt entry in {table}: {key}")]
    CorruptEntry { table: String, key: String },
}

/// Result type for the waybill library.
pub type Result<T> = std::result::Result<T, WaybillError>;
