//! Driver document field extraction.

pub mod normalize;
mod parser;
pub mod rules;

pub use normalize::Normalizer;
pub use parser::DriverDocumentParser;

use crate::models::FieldMapping;

/// Trait for document parsers.
pub trait DocumentParser {
    /// Extract fields from document text.
    ///
    /// Returns `(false, empty)` when the text is not a driver document, when
    /// nothing was found, or when extraction failed; failures are logged.
    fn parse(&self, text: &str, is_driver_document: bool) -> (bool, FieldMapping);
}
