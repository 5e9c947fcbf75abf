// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query expression AST.
//!
//! Nodes are built bottom-up and rendered once into the text passed as the
//! `query` argument of SEARCH, AGGREGATE, EXPLAIN or SPELLCHECK.
//!
//! # Syntax
//!
//! ```text
//! hello                      Word
//! "hello world"              ExactMatch
//! hel*                       Prefix
//! ~hello                     Optional
//! %hello%                    Fuzzy (distance 1, %% for 2, ...)
//! a b                        AndGroup (implicit)
//! (a|b)                      OrGroup
//! -a                         Negation
//! @title:(a b)               FieldFacet
//! @tags:{red|blue}           TagFacet
//! @price:[10 (20]            NumericFacet
//! @loc:[2.3 48.8 10 km]      GeoFacet
//! (a b) => { $weight: 2; }   Attribute
//! *=>[KNN 10 @vec $blob]     VectorClause
//! ```
//!
//! # Example
//!
//! ```
//! use redisearch_protocol::query::{NumericFacet, QueryBuilder, TagFacet};
//!
//! let query = QueryBuilder::new()
//!     .word("laptop")
//!     .add(TagFacet::new(["brand"], ["acme", "globex"]).unwrap())
//!     .add(NumericFacet::less_than("price", 1000.0))
//!     .render();
//! assert_eq!(query, "laptop @brand:{acme|globex} @price:[-inf (1000]");
//! ```

mod builder;
mod escape;
mod facet;
mod group;
mod modifier;
mod term;
mod vector;

pub use builder::QueryBuilder;
pub use escape::{escape_phrase, escape_word, DefaultEscaper, Escaper, Verbatim};
pub use facet::{FieldFacet, GeoFacet, NumericFacet, TagFacet};
pub use group::{AndGroup, Encapsulation, OrGroup};
pub use modifier::{Attribute, Fuzzy, Negation, Optional};
pub use term::{ExactMatch, Prefix, RawElement, Word};
pub use vector::{KnnCount, VectorClause};

use std::fmt;

/// Where a node sorts inside a group. `Before` nodes move to the front,
/// everything else keeps insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Before,
    Normal,
}

/// Capability shared by every query node.
pub trait QueryElement {
    fn render(&self, escaper: &dyn Escaper) -> String;

    /// Whether the rendered text contains top-level whitespace and must be
    /// parenthesized when embedded.
    fn include_space(&self) -> bool {
        false
    }

    fn priority(&self) -> Priority {
        Priority::Normal
    }
}

/// The closed set of query nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    Word(Word),
    ExactMatch(ExactMatch),
    Prefix(Prefix),
    Raw(RawElement),
    Optional(Optional),
    And(AndGroup),
    Or(OrGroup),
    Encapsulation(Encapsulation),
    Field(FieldFacet),
    Tag(TagFacet),
    Numeric(NumericFacet),
    Geo(GeoFacet),
    Negation(Negation),
    Fuzzy(Fuzzy),
    Attribute(Attribute),
    Vector(VectorClause),
}

macro_rules! delegate {
    ($node:expr, $inner:ident => $call:expr) => {
        match $node {
            QueryNode::Word($inner) => $call,
            QueryNode::ExactMatch($inner) => $call,
            QueryNode::Prefix($inner) => $call,
            QueryNode::Raw($inner) => $call,
            QueryNode::Optional($inner) => $call,
            QueryNode::And($inner) => $call,
            QueryNode::Or($inner) => $call,
            QueryNode::Encapsulation($inner) => $call,
            QueryNode::Field($inner) => $call,
            QueryNode::Tag($inner) => $call,
            QueryNode::Numeric($inner) => $call,
            QueryNode::Geo($inner) => $call,
            QueryNode::Negation($inner) => $call,
            QueryNode::Fuzzy($inner) => $call,
            QueryNode::Attribute($inner) => $call,
            QueryNode::Vector($inner) => $call,
        }
    };
}

impl QueryElement for QueryNode {
    fn render(&self, escaper: &dyn Escaper) -> String {
        delegate!(self, node => node.render(escaper))
    }

    fn include_space(&self) -> bool {
        delegate!(self, node => node.include_space())
    }

    fn priority(&self) -> Priority {
        delegate!(self, node => node.priority())
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&DefaultEscaper))
    }
}

macro_rules! into_node {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(impl From<$ty> for QueryNode {
            fn from(node: $ty) -> Self {
                QueryNode::$variant(node)
            }
        })*
    };
}

into_node!(
    Word(Word),
    ExactMatch(ExactMatch),
    Prefix(Prefix),
    Raw(RawElement),
    Optional(Optional),
    And(AndGroup),
    Or(OrGroup),
    Encapsulation(Encapsulation),
    Field(FieldFacet),
    Tag(TagFacet),
    Numeric(NumericFacet),
    Geo(GeoFacet),
    Negation(Negation),
    Fuzzy(Fuzzy),
    Attribute(Attribute),
    Vector(VectorClause),
);

// Render `node`, parenthesized when it carries top-level whitespace.
pub(crate) fn embed(node: &QueryNode, escaper: &dyn Escaper) -> String {
    let text = node.render(escaper);
    if node.include_space() {
        format!("({})", text)
    } else {
        text
    }
}
