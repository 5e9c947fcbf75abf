// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Boolean groups and the generic wrapper.

use super::{embed, Escaper, Priority, QueryElement, QueryNode};

// Stable sort by priority, then render each child, parenthesizing the
// ones with top-level whitespace.
fn render_children(children: &[QueryNode], escaper: &dyn Escaper) -> Vec<String> {
    let mut ordered: Vec<&QueryNode> = children.iter().collect();
    ordered.sort_by_key(|child| child.priority());
    ordered
        .into_iter()
        .map(|child| embed(child, escaper))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Intersection: children separated by spaces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AndGroup {
    children: Vec<QueryNode>,
}

impl AndGroup {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, child: impl Into<QueryNode>) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: impl Into<QueryNode>) {
        self.children.push(child.into());
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<N: Into<QueryNode>> FromIterator<N> for AndGroup {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl QueryElement for AndGroup {
    fn render(&self, escaper: &dyn Escaper) -> String {
        render_children(&self.children, escaper).join(" ")
    }

    fn include_space(&self) -> bool {
        self.children.len() > 1
    }
}

/// Union: `(a|b|c)`. Always parenthesized, so never needs wrapping itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrGroup {
    children: Vec<QueryNode>,
}

impl OrGroup {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, child: impl Into<QueryNode>) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: impl Into<QueryNode>) {
        self.children.push(child.into());
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<N: Into<QueryNode>> FromIterator<N> for OrGroup {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl QueryElement for OrGroup {
    fn render(&self, escaper: &dyn Escaper) -> String {
        format!("({})", render_children(&self.children, escaper).join("|"))
    }
}

/// `open child close`, optionally dropped when the child has no
/// top-level whitespace.
#[derive(Debug, Clone, PartialEq)]
pub struct Encapsulation {
    open: &'static str,
    close: &'static str,
    child: Box<QueryNode>,
    omit_without_space: bool,
}

impl Encapsulation {
    pub fn new(open: &'static str, close: &'static str, child: impl Into<QueryNode>) -> Self {
        Self {
            open,
            close,
            child: Box::new(child.into()),
            omit_without_space: false,
        }
    }

    /// `( child )`, omitted around single tokens.
    pub fn parentheses(child: impl Into<QueryNode>) -> Self {
        Self::new("(", ")", child).omit_without_space()
    }

    #[must_use]
    pub fn omit_without_space(mut self) -> Self {
        self.omit_without_space = true;
        self
    }

    fn is_omitted(&self) -> bool {
        self.omit_without_space && !self.child.include_space()
    }
}

impl QueryElement for Encapsulation {
    fn render(&self, escaper: &dyn Escaper) -> String {
        let inner = self.child.render(escaper);
        if self.is_omitted() {
            inner
        } else {
            format!("{}{}{}", self.open, inner, self.close)
        }
    }

    fn priority(&self) -> Priority {
        self.child.priority()
    }
}
