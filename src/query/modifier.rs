// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Nodes that change the meaning of a single child.

use super::{embed, Encapsulation, Escaper, Priority, QueryElement, QueryNode};
use crate::error::{Error, Result};
use crate::option::Arg;

/// `-child`
///
/// The child is parenthesized when it carries whitespace or starts with a
/// digit, which the engine would otherwise read as a negative number.
#[derive(Debug, Clone, PartialEq)]
pub struct Negation {
    child: Box<QueryNode>,
}

impl Negation {
    pub fn new(child: impl Into<QueryNode>) -> Self {
        Self {
            child: Box::new(child.into()),
        }
    }
}

impl QueryElement for Negation {
    fn render(&self, escaper: &dyn Escaper) -> String {
        let text = self.child.render(escaper);
        if self.child.include_space() || text.starts_with(|c: char| c.is_ascii_digit()) {
            format!("-({})", text)
        } else {
            format!("-{}", text)
        }
    }
}

/// `~child`: boosts matches without requiring them.
#[derive(Debug, Clone, PartialEq)]
pub struct Optional {
    child: Box<QueryNode>,
}

impl Optional {
    pub fn new(child: impl Into<QueryNode>) -> Self {
        Self {
            child: Box::new(child.into()),
        }
    }
}

impl QueryElement for Optional {
    fn render(&self, escaper: &dyn Escaper) -> String {
        format!("~{}", embed(&self.child, escaper))
    }
}

/// `%word%`, one pair of `%` per unit of Levenshtein distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Fuzzy {
    text: String,
    distance: u8,
}

impl Fuzzy {
    pub const MAX_DISTANCE: u8 = 3;

    pub fn new(text: impl Into<String>, distance: u8) -> Result<Self> {
        if !(1..=Self::MAX_DISTANCE).contains(&distance) {
            return Err(Error::OutOfRange {
                what: "fuzzy distance",
                value: distance.to_string(),
            });
        }
        Ok(Self {
            text: text.into(),
            distance,
        })
    }
}

impl QueryElement for Fuzzy {
    fn render(&self, escaper: &dyn Escaper) -> String {
        let marks = "%".repeat(usize::from(self.distance));
        format!("{}{}{}", marks, escaper.word(&self.text), marks)
    }

    fn priority(&self) -> Priority {
        Priority::Before
    }
}

/// `(child) => { $weight: 2; $slop: 1; $inorder: true; $phonetic: false; }`
///
/// Only the attributes that were set are emitted; with none set the child
/// renders alone.
///
/// ```
/// use redisearch_protocol::query::{AndGroup, Attribute, QueryNode, Word};
///
/// let child = AndGroup::new().with(Word::new("foo")).with(Word::new("bar"));
/// let node = QueryNode::from(Attribute::new(child).weight(2.5).slop(1));
/// assert_eq!(node.to_string(), "(foo bar) => { $weight: 2.5; $slop: 1; }");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    inner: Encapsulation,
    weight: Option<f64>,
    slop: Option<u32>,
    in_order: Option<bool>,
    phonetic: Option<bool>,
}

impl Attribute {
    pub fn new(child: impl Into<QueryNode>) -> Self {
        Self {
            inner: Encapsulation::parentheses(child),
            weight: None,
            slop: None,
            in_order: None,
            phonetic: None,
        }
    }

    #[must_use]
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn slop(mut self, slop: u32) -> Self {
        self.slop = Some(slop);
        self
    }

    #[must_use]
    pub fn in_order(mut self, in_order: bool) -> Self {
        self.in_order = Some(in_order);
        self
    }

    #[must_use]
    pub fn phonetic(mut self, phonetic: bool) -> Self {
        self.phonetic = Some(phonetic);
        self
    }

    fn attributes(&self) -> Vec<String> {
        let mut attributes = Vec::new();
        if let Some(weight) = self.weight {
            attributes.push(format!("$weight: {};", Arg::from(weight)));
        }
        if let Some(slop) = self.slop {
            attributes.push(format!("$slop: {};", slop));
        }
        if let Some(in_order) = self.in_order {
            attributes.push(format!("$inorder: {};", in_order));
        }
        if let Some(phonetic) = self.phonetic {
            attributes.push(format!("$phonetic: {};", phonetic));
        }
        attributes
    }
}

impl QueryElement for Attribute {
    fn render(&self, escaper: &dyn Escaper) -> String {
        let inner = self.inner.render(escaper);
        let attributes = self.attributes();
        if attributes.is_empty() {
            inner
        } else {
            format!("{} => {{ {} }}", inner, attributes.join(" "))
        }
    }

    fn include_space(&self) -> bool {
        !self.attributes().is_empty()
    }

    fn priority(&self) -> Priority {
        self.inner.priority()
    }
}
