// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Leaf nodes.

use super::{Escaper, QueryElement};

/// A single escaped term.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    text: String,
}

impl Word {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl QueryElement for Word {
    fn render(&self, escaper: &dyn Escaper) -> String {
        escaper.word(&self.text)
    }
}

/// `"quoted phrase"`
#[derive(Debug, Clone, PartialEq)]
pub struct ExactMatch {
    text: String,
}

impl ExactMatch {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl QueryElement for ExactMatch {
    fn render(&self, escaper: &dyn Escaper) -> String {
        format!("\"{}\"", escaper.phrase(&self.text))
    }
}

/// `term*`
#[derive(Debug, Clone, PartialEq)]
pub struct Prefix {
    text: String,
}

impl Prefix {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl QueryElement for Prefix {
    fn render(&self, escaper: &dyn Escaper) -> String {
        format!("{}*", escaper.word(&self.text))
    }
}

/// Query text inserted as-is, never escaped.
#[derive(Debug, Clone, PartialEq)]
pub struct RawElement {
    text: String,
}

impl RawElement {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl QueryElement for RawElement {
    fn render(&self, _escaper: &dyn Escaper) -> String {
        self.text.clone()
    }

    fn include_space(&self) -> bool {
        self.text.trim().contains(char::is_whitespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::DefaultEscaper;

    #[test]
    fn test_leaves() {
        assert_eq!(Word::new("hello world").render(&DefaultEscaper), "hello\\ world");
        assert_eq!(
            ExactMatch::new("hello \"big\" world").render(&DefaultEscaper),
            "\"hello \\\"big\\\" world\""
        );
        assert_eq!(Prefix::new("hel").render(&DefaultEscaper), "hel*");
        assert_eq!(Prefix::new("a.b").render(&DefaultEscaper), "a\\.b*");
    }

    #[test]
    fn test_raw_is_untouched() {
        let raw = RawElement::new("@title:(foo bar)");
        assert_eq!(raw.render(&DefaultEscaper), "@title:(foo bar)");
        assert!(raw.include_space());
        assert!(!RawElement::new(" * ").include_space());
        assert!(!Word::new("a b").include_space());
    }
}
