//! Driver name extraction and expansion of initials.

use tracing::debug;

use super::patterns::{NAME_LABEL_PREFIX, NAME_PATTERNS, SHORT_INITIALS};
use super::scoring::NAME_SCORING;
use super::{choose, ranked, scan, Candidate, FieldExtractor, DEFAULT_CONTEXT_WINDOW};

/// Words that mark a capitalized phrase as something other than a name.
const NAME_STOPWORDS: &[&str] = &[
    "выдан", "отдел", "уфмс", "мвд", "по", "рф", "обл", "области", "республике", "фио",
    "водитель", "водителя",
];

/// Conventional first names for a single initial, male and female.
const INITIALS: &[(char, &str, &str)] = &[
    ('И', "Иван", "Ирина"),
    ('С', "Сергей", "Светлана"),
    ('В', "Вячеслав", "Вера"),
    ('Г', "Геннадий", "Галина"),
    ('А', "Александр", "Александра"),
    ('Л', "Леонид", "Людмила"),
    ('Ю', "Юрий", "Юлия"),
    ('Э', "Эльдар", "Эльвира"),
    ('М', "Михаил", "Мария"),
    ('Т', "Тимур", "Татьяна"),
    ('Н', "Николай", "Наталья"),
    ('Д', "Дмитрий", "Дарья"),
    ('П', "Павел", "Полина"),
];

/// Driver full-name extractor.
pub struct NameExtractor {
    context_window: usize,
}

impl NameExtractor {
    pub fn new() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }

    /// Set the number of context characters inspected for labels.
    pub fn with_context_window(mut self, chars: usize) -> Self {
        self.context_window = chars;
        self
    }

    pub fn candidates(&self, text: &str) -> Vec<Candidate> {
        let matches = scan(text, &NAME_PATTERNS)
            .into_iter()
            .filter(|m| is_valid_name(&m.value))
            .collect();
        NAME_SCORING.candidates(text, matches, self.context_window)
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for NameExtractor {
    type Output = String;

    /// Only the winning candidate is expanded; if it cannot be, there is no name.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        let winner = choose(self.candidates(text))?;
        debug!("Name candidate '{}' won with {}", winner.value, winner.priority);
        expand_short_name(&winner.value)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        ranked(self.candidates(text))
            .iter()
            .filter_map(|c| expand_short_name(&c.value))
            .collect()
    }
}

/// Extract the driver's name with the default context window.
pub fn extract_name(text: &str) -> Option<String> {
    NameExtractor::new().extract(text)
}

fn is_valid_name(value: &str) -> bool {
    let words: Vec<String> = value
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c == '.' || c == ',').to_lowercase())
        .collect();
    if words.len() < 2 {
        return false;
    }
    !words.iter().any(|w| NAME_STOPWORDS.contains(&w.as_str()))
}

/// Turn `Фамилия И.О.` into three words; full names pass through.
///
/// Gender follows the surname: `-ич`/`-ий` endings pick the male name,
/// anything else the female one.
pub fn expand_short_name(name: &str) -> Option<String> {
    let cleaned = NAME_LABEL_PREFIX.replace(name.trim(), "");
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let (surname, rest) = words.split_first()?;

    if !rest.iter().any(|w| w.contains('.')) {
        let capitalized = words
            .iter()
            .all(|w| w.chars().next().is_some_and(char::is_uppercase));
        return (words.len() >= 3 && capitalized).then(|| words.join(" "));
    }

    let initials = rest.concat();
    let caps = SHORT_INITIALS.captures(&initials)?;
    let lower = surname.to_lowercase();
    let male = lower.ends_with("ич") || lower.ends_with("ий");

    let first = name_for_initial(caps[1].chars().next()?, male)?;
    let second = name_for_initial(caps[2].chars().next()?, male)?;
    Some(format!("{} {} {}", surname, first, second))
}

fn name_for_initial(initial: char, male: bool) -> Option<&'static str> {
    INITIALS
        .iter()
        .find(|(c, _, _)| *c == initial)
        .map(|&(_, m, f)| if male { m } else { f })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labelled_full_name() {
        assert_eq!(
            extract_name("Водитель: Иванов Иван Иванович, тел. 89123456789"),
            Some("Иванов Иван Иванович".to_string())
        );
    }

    #[test]
    fn test_short_name_expanded_by_surname_gender() {
        assert_eq!(
            expand_short_name("Зелинский С.В."),
            Some("Зелинский Сергей Вячеслав".to_string())
        );
        assert_eq!(
            expand_short_name("Петрова А. Н."),
            Some("Петрова Александра Наталья".to_string())
        );
        assert_eq!(
            expand_short_name("Эминов Э.В."),
            Some("Эминов Эльвира Вера".to_string())
        );
    }

    #[test]
    fn test_unknown_initial_is_not_expanded() {
        assert_eq!(expand_short_name("Иванов Ж.И."), None);
    }

    #[test]
    fn test_full_name_is_preferred_over_short_form() {
        let text = "Иванов И.И. Водитель: Петров Пётр Петрович";
        assert_eq!(extract_name(text), Some("Петров Пётр Петрович".to_string()));
    }

    #[test]
    fn test_all_caps_labelled_name() {
        assert_eq!(
            extract_name("ВОДИТЕЛЬ: ИВАНОВ ИВАН ИВАНОВИЧ тел. 89123456789"),
            Some("ИВАНОВ ИВАН ИВАНОВИЧ".to_string())
        );
        assert_eq!(
            extract_name("Водитель: ЗЕЛИНСКИЙ С.В."),
            Some("ЗЕЛИНСКИЙ Сергей Вячеслав".to_string())
        );
    }

    #[test]
    fn test_all_caps_header_is_not_a_name() {
        assert_eq!(extract_name("Водитель ФИО ВОДИТЕЛЯ ОТДЕЛ"), None);
    }

    #[test]
    fn test_header_and_authority_words_are_rejected() {
        assert!(!is_valid_name("ФИО ВОДИТЕЛЯ"));
        assert!(!is_valid_name("Отдел Уфмс России"));
        assert!(is_valid_name("Попов Иван Петрович"));
        assert_eq!(extract_name("Отдел Уфмс России"), None);
    }

    #[test]
    fn test_label_prefix_is_stripped() {
        assert_eq!(
            expand_short_name("Водитель: Сидоров Сидор Сидорович"),
            Some("Сидоров Сидор Сидорович".to_string())
        );
    }
}
