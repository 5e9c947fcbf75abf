// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Leaf text escaping. Applied once, when a leaf renders; composite nodes
//! only ever concatenate already-rendered text.

/// Escape a single term: ASCII punctuation (except `_`) and whitespace get
/// a backslash.
///
/// ```
/// use redisearch_protocol::query::escape_word;
///
/// assert_eq!(escape_word("user@example.com"), "user\\@example\\.com");
/// assert_eq!(escape_word("snake_case"), "snake_case");
/// assert_eq!(escape_word("two words"), "two\\ words");
/// ```
pub fn escape_word(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if (c.is_ascii_punctuation() && c != '_') || c.is_whitespace() {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape the inside of a quoted phrase: only `"` and `\`.
pub fn escape_phrase(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Strategy used by leaves to make raw text protocol-safe.
pub trait Escaper {
    fn word(&self, text: &str) -> String {
        escape_word(text)
    }

    fn phrase(&self, text: &str) -> String {
        escape_phrase(text)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEscaper;

impl Escaper for DefaultEscaper {}

/// Leaves text untouched, for input that is already escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl Escaper for Verbatim {
    fn word(&self, text: &str) -> String {
        text.to_string()
    }

    fn phrase(&self, text: &str) -> String {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_word() {
        assert_eq!(escape_word("hello"), "hello");
        assert_eq!(escape_word("a-b:c"), "a\\-b\\:c");
        assert_eq!(escape_word("{x}"), "\\{x\\}");
        assert_eq!(escape_word("tab\there"), "tab\\\there");
        assert_eq!(escape_word("café"), "café");
    }

    #[test]
    fn test_escape_phrase() {
        assert_eq!(escape_phrase("hello world"), "hello world");
        assert_eq!(escape_phrase("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_phrase("a\\b"), "a\\\\b");
        assert_eq!(escape_phrase("a-b"), "a-b");
    }

    #[test]
    fn test_verbatim() {
        assert_eq!(Verbatim.word("a-b"), "a-b");
        assert_eq!(DefaultEscaper.word("a-b"), "a\\-b");
    }
}
