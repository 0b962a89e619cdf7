//! Regex pattern lists for driver document extraction.
//!
//! Keyword alternations are case-insensitive through `(?i:...)` groups while
//! plate captures stay case-sensitive. Labelled names may be capitalized or
//! all-caps; bare names must be capitalized. Guards replace look-ahead.

use lazy_static::lazy_static;
use regex::Regex;

use super::FieldPattern;

lazy_static! {
    // Driver name: full "Фамилия Имя Отчество" or short "Фамилия И.О."
    pub static ref NAME_PATTERNS: Vec<FieldPattern> = vec![
        FieldPattern::new(Regex::new(
            r"(?i:водитель|ф\.и\.о\.|данные\s*о\s*водителе)\s*[:\-]?\s*((?:[А-ЯЁ][а-яё]+|[А-ЯЁ]{2,})\s+(?:[А-ЯЁ][а-яё]+|[А-ЯЁ]{2,})\s+(?:[А-ЯЁ][а-яё]+|[А-ЯЁ]{2,}))\b"
        ).unwrap()),
        FieldPattern::new(Regex::new(
            r"(?i:водитель|ф\.и\.о\.|данные\s*о\s*водителе)\s*[:\-]?\s*((?:[А-ЯЁ][а-яё]+|[А-ЯЁ]{2,})\s+[А-ЯЁ]\.\s*[А-ЯЁ]\.)"
        ).unwrap()),
        FieldPattern::new(Regex::new(
            r"\b([А-ЯЁ][а-яё]+\s+[А-ЯЁ][а-яё]+\s+[А-ЯЁ][а-яё]+)\b"
        ).unwrap()),
        FieldPattern::new(Regex::new(
            r"\b([А-ЯЁ][а-яё]+\s+[А-ЯЁ]\.\s*[А-ЯЁ]\.)"
        ).unwrap()),
    ];

    pub static ref NAME_LABEL_PREFIX: Regex = Regex::new(
        r"^(?i:водитель|ф\.и\.о\.|данные\s*о\s*водителе)\s*[:\-]?\s*"
    ).unwrap();

    pub static ref SHORT_INITIALS: Regex = Regex::new(
        r"^([А-ЯЁ])\.([А-ЯЁ])\.$"
    ).unwrap();

    // Birth date
    pub static ref BIRTH_DATE_PATTERNS: Vec<FieldPattern> = vec![
        FieldPattern::new(Regex::new(
            r"(?i)(?:д\.\s*р\.|дата\s*рождения)[\s:]*(\d{2}[./\-]\d{2}[./\-]\d{4})\b"
        ).unwrap()),
    ];

    pub static ref BIRTH_DATE_FALLBACK: Vec<FieldPattern> = vec![
        FieldPattern::new(Regex::new(
            r"\b(\d{2}[./\-]\d{2}[./\-]\d{4})\b"
        ).unwrap())
        .not_followed_by(Regex::new(
            r"^\s*(?i:выдан|код|тел|паспорт|серия|водительское)"
        ).unwrap()),
    ];

    // Passport number: labelled forms first, then bare digit groups
    pub static ref PASSPORT_PATTERNS: Vec<FieldPattern> = vec![
        FieldPattern::new(Regex::new(
            r"(?i:паспорт|серия)\s*[:\-\s]*(?:№\s*)?(\d{4}\s*\d{6})\b"
        ).unwrap()),
        FieldPattern::new(Regex::new(
            r"(?i:паспорт|серия)\s*[:\-\s]*(?:№\s*)?(\d{2}\s*\d{2}\s*\d{6})\b"
        ).unwrap()),
        FieldPattern::new(Regex::new(
            r"(?i:серия)\s*(\d{2}\s*\d{2})\s*(?i:№|номер)\s*(\d{6})\b"
        ).unwrap())
        .groups(&[1, 2]),
        FieldPattern::new(Regex::new(
            r"\b(\d{4}\s*\d{6})\b"
        ).unwrap())
        .not_followed_by(Regex::new(r"^\s*(?i:ву|водительское|права)").unwrap()),
        FieldPattern::new(Regex::new(
            r"\b(\d{2}\s*\d{2}\s*\d{6})\b"
        ).unwrap())
        .not_followed_by(Regex::new(r"^\s*(?i:ву|водительское|права)").unwrap()),
        FieldPattern::new(Regex::new(
            r"(?i:паспорт|серия)\s*[:\-\s]*(?:№\s*)?(\d{10})\b"
        ).unwrap()),
    ];

    // Who issued the passport; the "выдан" prefix stays outside the capture
    pub static ref ISSUING_AUTHORITY: Regex = Regex::new(
        r"(?i)(?:(?:кем\s*)?выдан[а-яё]*\s*[а-яё\s,:]*?)?(\b(?:отделом\s*уфмс|отделением|отдел|мро|оуфмс|тп\s*уфмс|мп\s*уфмс|гу\s*мвд|умвд|уфмс|мвд|овд)[а-яё\s,.\-]{5,200})\s*(?:\d{2}\.\d{2}\.\d{2,}|$)"
    ).unwrap();

    pub static ref ISSUE_DATE_PATTERNS: Vec<FieldPattern> = vec![
        FieldPattern::new(Regex::new(
            r"(?i)(?:кем\s*выдан|паспорт\s*выдан|выдан)\s*[а-яё\s,:]*?\b(\d{2}[./\-]\d{2}[./\-]\d{2,4})\b"
        ).unwrap()),
    ];

    pub static ref ISSUE_DATE_FALLBACK: Vec<FieldPattern> = vec![
        FieldPattern::new(Regex::new(
            r"(?i)(?:уф|мвд|овд|оуфмс|тп\s*уфмс|гу\s*мвд|умвд|мп\s*уфмс)\s*[а-яё\s,.\-]+\s*(\d{2}[./\-]\d{2}[./\-]\d{2,4})\b"
        ).unwrap()),
    ];

    pub static ref SUBDIVISION_CODE: Regex = Regex::new(
        r"(?i)(?:код\s*подразделения|код)[:\-\s]*(\d{3}-\d{3})\b"
    ).unwrap();

    // Driving licence number, always labelled
    pub static ref LICENSE_PATTERNS: Vec<FieldPattern> = vec![
        FieldPattern::new(Regex::new(
            r"\b(?i:водительское\s*удостоверение|вод\.?\s*удост\.?|вод\.?\s*уд\.?|в/у|ву|права)[\s:]*(?:№\s*)?(\d{2}\s*\d{2}\s*\d{6})\b"
        ).unwrap()),
        FieldPattern::new(Regex::new(
            r"\b(?i:водительское\s*удостоверение|вод\.?\s*удост\.?|вод\.?\s*уд\.?|в/у|ву|права)[\s:]*(?:№\s*)?(\d{4}\s*\d{6})\b"
        ).unwrap()),
        FieldPattern::new(Regex::new(
            r"\b(?i:водительское\s*удостоверение|вод\.?\s*удост\.?|вод\.?\s*уд\.?|в/у|ву|права)[\s:]*(?:№\s*)?(\d{10})\b"
        ).unwrap()),
    ];

    // Licence issue date: next to the licence number, then any "выдано"/"от" date
    pub static ref LICENSE_DATE_PATTERNS: Vec<FieldPattern> = vec![
        FieldPattern::new(Regex::new(
            r"(?i)\b(?:водительское\s*удостоверение|вод\.?\s*удост\.?|вод\.?\s*уд\.?|в/у|ву|права)[\s:]*(?:№\s*)?(?:\d{2}\s*\d{2}\s*\d{6}|\d{10})\s*[,;]?\s*(?:выдано|в/у\s*дата\s*срок|дата\s+выдачи|от)\s*[:\-\s]*(\d{2}[./\-]\d{2}[./\-]\d{4})(?:\s*г\.)?"
        ).unwrap())
        .followed_by(Regex::new(
            r"^\s*(?i:код\s+подразделения|тел|а/м|прицеп|перевозчик|дата\s+рождения|$)"
        ).unwrap()),
    ];

    pub static ref LICENSE_DATE_FALLBACK: Vec<FieldPattern> = vec![
        FieldPattern::new(Regex::new(
            r"(?i)(?:дата\s+выдачи|\bот|\bвыдано)\s*[:\-\s]*(\d{2}[./\-]\d{2}[./\-]\d{4})(?:\s*г\.)?"
        ).unwrap())
        .followed_by(Regex::new(
            r"^\s*(?i:код\s+подразделения|тел|а/м|прицеп|перевозчик|$)"
        ).unwrap()),
    ];

    // Phones: strict formats first, loose ones only when nothing matched
    pub static ref PHONE_PATTERNS: Vec<FieldPattern> = vec![
        FieldPattern::new(Regex::new(
            r"(?:\+7|\b8)[\-\s]?\(?\d{3}\)?[\-\s]?\d{3}[\-\s]?\d{2}[\-\s]?\d{2}\b"
        ).unwrap())
        .groups(&[0]),
        FieldPattern::new(Regex::new(
            r"(?:\+\d{1,3}|\b8)\d{10}\b"
        ).unwrap())
        .groups(&[0]),
    ];

    pub static ref PHONE_FALLBACK: Vec<FieldPattern> = vec![
        FieldPattern::new(Regex::new(
            r"(?i)(?:телефон|тел\.?|моб\.?)\s*[:\-\s]*(\+?\d[\d\s\-()]{9,}\d)"
        ).unwrap()),
        FieldPattern::new(Regex::new(
            r"(?:^|[^\d+])(\+?[78][\d\s\-()]{9,}\d)"
        ).unwrap()),
        FieldPattern::new(Regex::new(
            r"(?:^|[^\d+])(\+?\d{1,2}[\s.\-]?\d{3}[\s.\-]?\d{3}[\s.\-]?\d{2}[\s.\-]?\d{2})\b"
        ).unwrap()),
    ];

    // Tractor unit
    pub static ref VEHICLE_PATTERNS: Vec<FieldPattern> = vec![
        FieldPattern::new(Regex::new(
            r"(?i:автомобиль|машина|а/м|тягач)\s*[:\-\s]*(?:№\s*)?([А-ЯЁA-Z0-9][А-ЯЁA-Z0-9\s/\-]{5,29})\b"
        ).unwrap()),
        FieldPattern::new(Regex::new(
            r"(?i)\b(ман|man|вольво|volvo|скания|scania|мерседес|mercedes-benz|mercedes|mersedes-benz|mersedes|даф|daf|рено|renault|ивеко|iveco|камаз|kamaz|jac)\s*([А-ЯЁA-Z]\s*\d{3}\s*[А-ЯЁA-Z]{2}\s*\d{2,3})\b"
        ).unwrap())
        .groups(&[1, 2]),
        FieldPattern::new(Regex::new(
            r"\b([А-ЯЁA-Z]\s?\d{3}\s?[А-ЯЁA-Z]{2}\s?\d{2,3})\b"
        ).unwrap())
        .followed_by(Regex::new(
            r"^\s*(?i:ман|man|вольво|volvo|скания|scania|мерседес|mercedes|mersedes|даф|daf|рено|renault|ивеко|iveco|камаз|kamaz|jac)"
        ).unwrap()),
    ];

    // Semi-trailer
    pub static ref TRAILER_PATTERNS: Vec<FieldPattern> = vec![
        FieldPattern::new(Regex::new(
            r"(?i:полуприцеп|п/прицеп|прицеп|п/п)\s*[:\-\s]*(?:№\s*)?([А-ЯЁA-Z0-9][А-ЯЁA-Z0-9\s/]{5,19})\b"
        ).unwrap()),
        FieldPattern::new(Regex::new(
            r"(?i)(?:полуприцеп|п/прицеп|прицеп|п/п)\s*[:\-\s]*(шмитц|шмиц|кроне|schmitz|krone)\s*([а-яёa-z]{1,2}\s*\d{4}\s*/?\s*\d{2,3})\b"
        ).unwrap())
        .groups(&[1, 2]),
        FieldPattern::new(Regex::new(
            r"\b([А-ЯЁ]{1,2}\s*\d{4}\s*/?\s*\d{2,3})\b"
        ).unwrap()),
    ];

    pub static ref VEHICLE_VALUE: Regex = Regex::new(
        r"^[А-ЯЁа-яёA-Za-z0-9\s/\-]{6,30}$"
    ).unwrap();

    // Registration address
    pub static ref ADDRESS_PATTERNS: Vec<FieldPattern> = vec![
        FieldPattern::new(Regex::new(
            r"(?i)(?:прописка|адрес\s*регистрации|по\s*месту\s*жительства)\s*[:\-\s]*(.+?)(?:\s*\b(?:тел|паспорт|водител|автомобил|прицеп|а/м)|\s+(?:ву|в/у|ип)\b|$)"
        ).unwrap()),
    ];

    pub static ref ADDRESS_FALLBACK: Vec<FieldPattern> = vec![
        FieldPattern::new(Regex::new(
            r"(?i)\b(г\.\s*[а-яё\s,.\-0-9]+?)(?:\s*\b(?:тел|паспорт|водител|автомобил|прицеп|а/м)|\s+(?:ву|в/у|ип)\b|$)"
        ).unwrap()),
    ];

    pub static ref DATE_INSIDE: Regex = Regex::new(
        r"\d{2}\.\d{2}\.\d{2,4}"
    ).unwrap();

    // Carrier company
    pub static ref CARRIER: Regex = Regex::new(
        r"(?i)перевозчик\s*[:\-\s]*(.+?)(?:\s*\b(?:тел|паспорт|водител|автомобил|прицеп|а/м|адрес|прописка)|$)"
    ).unwrap();

    pub static ref SOLE_TRADER_NAME: Regex = Regex::new(
        r"(?i:ип)\s+([А-ЯЁ][а-яё]+)"
    ).unwrap();

    // Date pieces
    pub static ref DATE_PARTS: Regex = Regex::new(
        r"^(\d{1,2})[./\-](\d{1,2})[./\-](\d{2,4})$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        assert_eq!(NAME_PATTERNS.len(), 4);
        assert_eq!(PASSPORT_PATTERNS.len(), 6);
        assert_eq!(LICENSE_PATTERNS.len(), 3);
        assert!(ISSUING_AUTHORITY.is_match("выдан ОВД района"));
        assert!(SUBDIVISION_CODE.is_match("код подразделения 770-001"));
        assert!(DATE_PARTS.is_match("01.02.1980"));
        assert!(VEHICLE_VALUE.is_match("VOLVO А123ВС77"));
        assert!(!CARRIER.as_str().is_empty());
        assert!(!PHONE_PATTERNS.is_empty() && !PHONE_FALLBACK.is_empty());
    }

    #[test]
    fn test_name_capture_case() {
        let caps = NAME_PATTERNS[0].regex.captures("ВОДИТЕЛЬ: Иванов Иван Иванович").unwrap();
        assert_eq!(&caps[1], "Иванов Иван Иванович");
        let caps = NAME_PATTERNS[0].regex.captures("ВОДИТЕЛЬ: ИВАНОВ ИВАН ИВАНОВИЧ тел.").unwrap();
        assert_eq!(&caps[1], "ИВАНОВ ИВАН ИВАНОВИЧ");
        let caps = NAME_PATTERNS[1].regex.captures("водитель ЗЕЛИНСКИЙ С.В.").unwrap();
        assert_eq!(&caps[1], "ЗЕЛИНСКИЙ С.В.");
        assert!(NAME_PATTERNS[2].regex.captures("иванов иван иванович").is_none());
        assert!(NAME_PATTERNS[2].regex.captures("ОВД ТВЕРСКОГО РАЙОНА").is_none());
    }
}
