//! Small string helpers shared by extractors and the normalizer.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Trim and replace every whitespace run with a single space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Remove all whitespace.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Keep only ASCII digits.
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Capitalize every space-separated word.
pub fn title_case(text: &str) -> String {
    text.split(' ').map(capitalize).collect::<Vec<_>>().join(" ")
}

/// Up to `chars` characters of `text` ending at byte offset `end`.
pub fn window_before(text: &str, end: usize, chars: usize) -> &str {
    let head = &text[..end];
    let start = head
        .char_indices()
        .rev()
        .take(chars)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(end);
    &head[start..]
}

/// Up to `chars` characters of `text` starting at byte offset `start`.
pub fn window_after(text: &str, start: usize, chars: usize) -> &str {
    let tail = &text[start..];
    let end = tail
        .char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(tail.len());
    &tail[..end]
}

/// The match plus up to `chars` characters on each side.
pub fn window_around(text: &str, start: usize, end: usize, chars: usize) -> &str {
    let before = window_before(text, start, chars);
    let after = window_after(text, end, chars);
    let from = start - before.len();
    let to = end + after.len();
    &text[from..to]
}

/// First 100 characters, for log lines.
pub fn preview(text: &str) -> &str {
    window_after(text, 0, 100)
}
