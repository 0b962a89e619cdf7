//! End-to-end parsing of driver document texts.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use waybill_core::document::rules::{
    extract_birth_date, extract_license_number, extract_passport_number,
};
use waybill_core::{
    DocumentParser, DriverDocumentParser, Field, FieldMapping, FieldValue, Normalizer,
    ParserConfig, ReferenceData,
};

const FULL_DOCUMENT: &str = "Водитель: Иванов Иван Иванович, дата рождения 15.07.1975, \
    тел. 8-912-345-67-89. Паспорт 4510 123456 выдан ОВД Тверского района г. Москвы \
    01.02.2015 код подразделения 770-001. Водительское удостоверение 7712 654321 \
    от 10.10.2018 а/м Вольво А123ВС77 прицеп АВ 1234 77 \
    Прописка: г. москвы, ул. ленина д.5 кв 12";

fn parser() -> DriverDocumentParser {
    DriverDocumentParser::new().unwrap()
}

#[test]
fn test_name_and_phone_example() {
    let (ok, fields) = parser().parse("Водитель: Иванов Иван Иванович, тел. 8-912-345-67-89", true);

    assert!(ok);
    let mut expected = FieldMapping::new();
    expected.insert(Field::DriverName, "Иванов Иван Иванович");
    expected.insert(Field::Phones, vec!["+7 (912) 345-67-89".to_string()]);
    assert_eq!(fields, expected);
}

#[test]
fn test_full_document() {
    let (ok, fields) = parser().parse(FULL_DOCUMENT, true);

    assert!(ok);
    assert_eq!(fields.get_str(Field::DriverName), Some("Иванов Иван Иванович"));
    assert_eq!(fields.get_str(Field::DateOfBirth), Some("15.07.1975"));
    assert_eq!(fields.get_str(Field::PassportNumber), Some("4510 123456"));
    assert_eq!(fields.get_str(Field::LicenseNumber), Some("7712 654321"));
    assert_eq!(fields.get_str(Field::LicenseDate), Some("10.10.2018"));
    assert_eq!(fields.get_str(Field::PassportIssueDate), Some("01.02.2015"));
    assert_eq!(
        fields.get(Field::Phones),
        Some(&FieldValue::List(vec!["+7 (912) 345-67-89".to_string()]))
    );
    assert_eq!(fields.get_str(Field::SubdivisionCode), Some("770-001"));
    assert_eq!(
        fields.get_str(Field::PassportIssuer),
        Some("ОВД Тверского района г. Москвы (Москва)")
    );
    assert_eq!(fields.get_str(Field::Vehicle), Some("Volvo А123ВС77"));
    assert_eq!(fields.get_str(Field::Trailer), Some("АВ123477"));
    assert_eq!(
        fields.get_str(Field::RegistrationAddress),
        Some("г. Москва, ул. Ленина д. 5 кв. 12")
    );
    assert_eq!(
        fields.get_str(Field::Propiska),
        fields.get_str(Field::RegistrationAddress)
    );
}

#[test]
fn test_passport_and_license_prefer_their_own_numbers() {
    let text = "Паспорт 4510 123456 выдан ОВД Тверского района г. Москвы 01.02.2015 \
                код подразделения 770-001. Водительское удостоверение 7712 654321 от 10.10.2018";

    assert_eq!(extract_passport_number(text), Some("4510 123456".to_string()));
    assert_eq!(extract_license_number(text), Some("7712 654321".to_string()));
}

#[test]
fn test_license_number_without_phone() {
    let (ok, fields) = parser().parse("Водитель: Иванов Иван Иванович. ВУ 7712 654321", true);

    assert!(ok);
    assert_eq!(fields.get_str(Field::LicenseNumber), Some("7712 654321"));
    assert!(!fields.contains(Field::Phones));
}

#[test]
fn test_all_caps_driver_name() {
    let (ok, fields) = parser().parse("Водитель: ИВАНОВ ИВАН ИВАНОВИЧ", true);

    assert!(ok);
    assert_eq!(fields.get_str(Field::DriverName), Some("ИВАНОВ ИВАН ИВАНОВИЧ"));
}

#[test]
fn test_document_numbers_have_ten_digits() {
    let (_, fields) = parser().parse(FULL_DOCUMENT, true);

    for field in [Field::PassportNumber, Field::LicenseNumber] {
        let value = fields.get_str(field).unwrap();
        assert_eq!(value.chars().filter(char::is_ascii_digit).count(), 10);
    }
}

#[test]
fn test_birth_year_must_be_plausible() {
    assert_eq!(extract_birth_date("Дата рождения: 01.01.2015"), None);
    assert_eq!(extract_birth_date("Дата рождения: 01.01.1899"), None);
    assert_eq!(extract_birth_date("Дата рождения: 01.01.1990"), Some("01.01.1990".to_string()));
}

#[test]
fn test_address_with_embedded_date_is_rejected() {
    let (_, fields) = parser().parse("Прописка: пос. Лесной 01.01.2020 кв. 1", true);
    assert!(!fields.contains(Field::RegistrationAddress));
    assert!(!fields.contains(Field::Propiska));
}

#[test]
fn test_not_a_driver_document() {
    let (ok, fields) = parser().parse(FULL_DOCUMENT, false);
    assert!(!ok);
    assert!(fields.is_empty());
}

#[test]
fn test_nothing_found() {
    let (ok, fields) = parser().parse("Счёт на оплату услуг", true);
    assert!(!ok);
    assert!(fields.is_empty());
}

#[test]
fn test_normalization_is_idempotent_on_parsed_documents() {
    let tables = Arc::new(ReferenceData::embedded().unwrap());
    let mut config = ParserConfig::default();
    config.normalization.enabled = false;
    let raw_parser = DriverDocumentParser::with_reference_data(config, tables.clone()).unwrap();
    let normalizer = Normalizer::new(tables).unwrap();

    let raw = raw_parser.try_parse(FULL_DOCUMENT).unwrap();
    let once = normalizer.normalize(&raw, FULL_DOCUMENT).unwrap();
    let twice = normalizer.normalize(&once, FULL_DOCUMENT).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_custom_reference_tables() {
    let json = r#"{
        "car_brands": {"вольво": "VOLVO TRUCKS"},
        "small_words": ["ул.", "г."]
    }"#;
    let tables = Arc::new(ReferenceData::from_json(json).unwrap());
    let parser = DriverDocumentParser::with_reference_data(ParserConfig::default(), tables).unwrap();

    let fields = parser.try_parse("а/м Вольво А123ВС77").unwrap();
    assert_eq!(fields.get_str(Field::Vehicle), Some("VOLVO TRUCKS А123ВС77"));
}

#[test]
fn test_mapping_serializes_with_document_keys() {
    let (_, fields) = parser().parse("Водитель: Иванов Иван Иванович, тел. 8-912-345-67-89", true);
    let json = serde_json::to_value(&fields).unwrap();

    assert_eq!(json["Водитель"], "Иванов Иван Иванович");
    assert_eq!(json["Телефон"][0], "+7 (912) 345-67-89");
    assert!(matches!(fields.get(Field::Phones), Some(FieldValue::List(_))));
}
