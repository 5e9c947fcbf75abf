// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Fluent accumulation of query nodes.

use std::ops::Bound;

use super::{
    AndGroup, DefaultEscaper, ExactMatch, FieldFacet, Fuzzy, Negation, NumericFacet, OrGroup, Prefix, QueryElement,
    QueryNode, RawElement, TagFacet, Word,
};
use crate::error::Result;

/// Collects clauses, then joins them with AND or OR semantics.
///
/// An empty builder matches every document (`*`).
///
/// ```
/// use redisearch_protocol::query::QueryBuilder;
///
/// let query = QueryBuilder::new()
///     .field_eq("name", "Alice Smith")
///     .numeric_range("age", Some(25.0), None)
///     .render();
/// assert_eq!(query, "@name:Alice\\ Smith @age:[25 +inf]");
///
/// assert_eq!(QueryBuilder::new().render(), "*");
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    nodes: Vec<QueryNode>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append any node.
    #[must_use]
    pub fn add(mut self, node: impl Into<QueryNode>) -> Self {
        self.nodes.push(node.into());
        self
    }

    #[must_use]
    pub fn word(self, text: impl Into<String>) -> Self {
        self.add(Word::new(text))
    }

    #[must_use]
    pub fn exact(self, phrase: impl Into<String>) -> Self {
        self.add(ExactMatch::new(phrase))
    }

    #[must_use]
    pub fn prefix(self, text: impl Into<String>) -> Self {
        self.add(Prefix::new(text))
    }

    pub fn fuzzy(self, text: impl Into<String>, distance: u8) -> Result<Self> {
        Ok(self.add(Fuzzy::new(text, distance)?))
    }

    #[must_use]
    pub fn raw(self, text: impl Into<String>) -> Self {
        self.add(RawElement::new(text))
    }

    #[must_use]
    pub fn not(self, node: impl Into<QueryNode>) -> Self {
        self.add(Negation::new(node))
    }

    /// `@field:value` with the value escaped as one term.
    #[must_use]
    pub fn field_eq(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(FieldFacet::on(field, Word::new(value)))
    }

    #[must_use]
    pub fn numeric_eq(self, field: impl Into<String>, value: f64) -> Self {
        self.add(NumericFacet::equals_to(field, value))
    }

    /// Inclusive range; `None` leaves that side open.
    #[must_use]
    pub fn numeric_range(self, field: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        let bound = |value: Option<f64>| value.map_or(Bound::Unbounded, Bound::Included);
        self.add(NumericFacet::range(field, bound(min), bound(max)))
    }

    pub fn tags<I, S>(self, field: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(self.add(TagFacet::new([field.into()], values)?))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn match_all() -> QueryNode {
        RawElement::new("*").into()
    }

    /// Every clause must match.
    pub fn build_and(mut self) -> QueryNode {
        match self.nodes.len() {
            0 => Self::match_all(),
            1 => self.nodes.remove(0),
            _ => self.nodes.into_iter().collect::<AndGroup>().into(),
        }
    }

    /// Any clause may match.
    pub fn build_or(mut self) -> QueryNode {
        match self.nodes.len() {
            0 => Self::match_all(),
            1 => self.nodes.remove(0),
            _ => self.nodes.into_iter().collect::<OrGroup>().into(),
        }
    }

    /// Text of [`build_and`](Self::build_and).
    pub fn render(self) -> String {
        self.build_and().render(&DefaultEscaper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_single_clause_is_unwrapped() {
        let node = QueryBuilder::new().field_eq("name", "Alice").build_and();
        assert_eq!(node.to_string(), "@name:Alice");
        let node = QueryBuilder::new().word("x").build_or();
        assert_eq!(node.to_string(), "x");
    }

    #[test]
    fn test_build_or() {
        let node = QueryBuilder::new()
            .field_eq("name", "Alice")
            .numeric_eq("age", 30.0)
            .build_or();
        assert_eq!(node.to_string(), "(@name:Alice|@age:[30 30])");
    }

    #[test]
    fn test_mixed_clauses() {
        let query = QueryBuilder::new()
            .word("rust")
            .tags("tags", ["db", "search"])
            .unwrap()
            .not(Word::new("java"))
            .prefix("eng")
            .exact("query builder")
            .render();
        assert_eq!(query, "rust @tags:{db|search} -java eng* \"query builder\"");
    }

    #[test]
    fn test_fuzzy_moves_first() {
        let query = QueryBuilder::new().word("a").fuzzy("serch", 1).unwrap().render();
        assert_eq!(query, "%serch% a");
        assert!(matches!(
            QueryBuilder::new().fuzzy("x", 9),
            Err(Error::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_tags_require_values() {
        assert!(matches!(
            QueryBuilder::new().tags("tags", Vec::<String>::new()),
            Err(Error::NotEnoughTerms)
        ));
    }

    #[test]
    fn test_empty_matches_all() {
        assert!(QueryBuilder::new().is_empty());
        assert_eq!(QueryBuilder::new().build_or().to_string(), "*");
    }
}
