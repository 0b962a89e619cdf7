//! Driver document parser: runs every extractor, then normalizes.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::error::{Result, WaybillError};
use crate::models::{Field, FieldMapping, ParserConfig, ReferenceData, ReferenceTables};
use crate::text::{collapse_whitespace, preview};

use super::normalize::Normalizer;
use super::rules::{
    address::AddressExtractor,
    carrier::CarrierExtractor,
    dates::{extract_issue_date, extract_license_date, BirthDateExtractor},
    license::LicenseNumberExtractor,
    name::NameExtractor,
    passport::{extract_issuing_authority, extract_subdivision_code, PassportNumberExtractor},
    phone::PhoneExtractor,
    vehicle::{VehicleExtractor, VehicleKind},
    FieldExtractor,
};
use super::DocumentParser;

/// Rule-based parser for driver documents.
pub struct DriverDocumentParser {
    config: ParserConfig,
    normalizer: Normalizer,
}

impl DriverDocumentParser {
    /// Create a parser with default settings and the embedded tables.
    pub fn new() -> Result<Self> {
        Self::with_config(ParserConfig::default())
    }

    /// Create a parser from configuration, loading the tables it names.
    pub fn with_config(config: ParserConfig) -> Result<Self> {
        config.validate().map_err(WaybillError::Config)?;

        let tables = match &config.normalization.reference_data {
            Some(path) => {
                info!("Loading reference tables from {}", path.display());
                ReferenceData::from_file(path)?
            }
            None => ReferenceData::embedded()?,
        };

        Self::with_reference_data(config, Arc::new(tables))
    }

    /// Create a parser over caller-supplied tables.
    pub fn with_reference_data(
        config: ParserConfig,
        tables: Arc<dyn ReferenceTables>,
    ) -> Result<Self> {
        config.validate().map_err(WaybillError::Config)?;
        let normalizer = Normalizer::new(tables)?;
        Ok(Self { config, normalizer })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Extract and, unless disabled, normalize every field.
    pub fn try_parse(&self, text: &str) -> Result<FieldMapping> {
        let start = Instant::now();
        let text = collapse_whitespace(text);
        debug!("Parsing text: {}", preview(&text));

        let mut fields = self.extract_personal_data(&text);
        fields.extend(self.extract_passport_data(&text));
        fields.extend(self.extract_vehicle_data(&text));
        fields.extend(self.extract_address(&text));
        if self.config.extraction.include_carrier {
            fields.extend(self.extract_carrier(&text));
        }

        let fields = if self.config.normalization.enabled {
            self.normalizer.normalize(&fields, &text)?
        } else {
            fields
        };

        info!(
            "Extracted {} fields in {}ms",
            fields.len(),
            start.elapsed().as_millis()
        );
        Ok(fields)
    }

    fn window(&self) -> usize {
        self.config.extraction.context_window
    }

    fn extract_personal_data(&self, text: &str) -> FieldMapping {
        let mut fields = FieldMapping::new();
        let extraction = &self.config.extraction;

        fields.insert_opt(
            Field::DriverName,
            NameExtractor::new().with_context_window(self.window()).extract(text),
        );
        fields.insert_opt(
            Field::DateOfBirth,
            BirthDateExtractor::new()
                .with_year_range(extraction.min_birth_year, extraction.max_birth_year)
                .extract(text),
        );
        fields.insert(Field::Phones, PhoneExtractor::new().extract_all(text));
        fields.insert_opt(
            Field::LicenseNumber,
            LicenseNumberExtractor::new().with_context_window(self.window()).extract(text),
        );
        fields.insert_opt(Field::LicenseDate, extract_license_date(text));

        debug!("Personal data: {:?}", fields);
        fields
    }

    fn extract_passport_data(&self, text: &str) -> FieldMapping {
        let mut fields = FieldMapping::new();

        fields.insert_opt(
            Field::PassportNumber,
            PassportNumberExtractor::new().with_context_window(self.window()).extract(text),
        );
        fields.insert_opt(Field::PassportIssuer, extract_issuing_authority(text));
        fields.insert_opt(Field::PassportIssueDate, extract_issue_date(text));
        fields.insert_opt(Field::SubdivisionCode, extract_subdivision_code(text));

        debug!("Passport data: {:?}", fields);
        fields
    }

    fn extract_vehicle_data(&self, text: &str) -> FieldMapping {
        let mut fields = FieldMapping::new();

        fields.insert_opt(
            Field::Vehicle,
            VehicleExtractor::new(VehicleKind::Tractor)
                .with_context_window(self.window())
                .extract(text),
        );
        fields.insert_opt(
            Field::Trailer,
            VehicleExtractor::new(VehicleKind::Trailer)
                .with_context_window(self.window())
                .extract(text),
        );

        debug!("Vehicle data: {:?}", fields);
        fields
    }

    fn extract_address(&self, text: &str) -> FieldMapping {
        let mut fields = FieldMapping::new();

        if let Some(address) = AddressExtractor::new().extract(text) {
            fields.insert(Field::RegistrationAddress, address.clone());
            fields.insert(Field::Propiska, address);
        }

        debug!("Address data: {:?}", fields);
        fields
    }

    fn extract_carrier(&self, text: &str) -> FieldMapping {
        let mut fields = FieldMapping::new();

        if let Some(carrier) = CarrierExtractor::new().extract(text) {
            fields.insert(Field::Carrier, carrier.name);
            fields.insert_opt(Field::CarrierShortName, carrier.short_name);
        }

        fields
    }
}

impl DocumentParser for DriverDocumentParser {
    fn parse(&self, text: &str, is_driver_document: bool) -> (bool, FieldMapping) {
        if !is_driver_document {
            debug!("Not a driver document, skipping");
            return (false, FieldMapping::new());
        }

        match self.try_parse(text) {
            Ok(fields) => (fields.has_data(), fields),
            Err(e) => {
                error!("Failed to parse driver document: {}", e);
                (false, FieldMapping::new())
            }
        }
    }
}
