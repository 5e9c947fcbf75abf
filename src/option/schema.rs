// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index schema field definitions (FT.CREATE / FT.ALTER).
//!
//! ```text
//! $.name AS name TEXT [NOSTEM] [WEIGHT w] [PHONETIC m] [WITHSUFFIXTRIE] [SORTABLE [UNF]] [NOINDEX]
//! price NUMERIC [SORTABLE [UNF]] [NOINDEX]
//! location GEO [SORTABLE] [NOINDEX]
//! tags TAG [SEPARATOR c] [CASESENSITIVE] [WITHSUFFIXTRIE] [SORTABLE [UNF]] [NOINDEX]
//! embedding VECTOR FLAT|HNSW nargs TYPE FLOAT32 DIM 128 DISTANCE_METRIC COSINE ...
//! ```
//!
//! The type keyword is a locked member of every field group.

use std::fmt;
use std::str::FromStr;

use super::{Arg, GroupedOption, NumberedOption, OptionNode, Validator};
use crate::error::Error;
use crate::version::since;

/// Phonetic matchers accepted by TEXT fields.
const PHONETIC_MATCHERS: &[&str] = &["dm:en", "dm:fr", "dm:pt", "dm:es"];

/// Vector index algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorAlgorithm {
    Flat,
    Hnsw,
}

impl VectorAlgorithm {
    fn keyword(self) -> &'static str {
        match self {
            VectorAlgorithm::Flat => "FLAT",
            VectorAlgorithm::Hnsw => "HNSW",
        }
    }
}

impl FromStr for VectorAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FLAT" => Ok(VectorAlgorithm::Flat),
            "HNSW" => Ok(VectorAlgorithm::Hnsw),
            _ => Err(Error::invalid("vector algorithm", s)),
        }
    }
}

/// Element type of stored vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorType {
    Float32,
    Float64,
}

impl fmt::Display for VectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorType::Float32 => write!(f, "FLOAT32"),
            VectorType::Float64 => write!(f, "FLOAT64"),
        }
    }
}

impl FromStr for VectorType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FLOAT32" => Ok(VectorType::Float32),
            "FLOAT64" => Ok(VectorType::Float64),
            _ => Err(Error::invalid("vector type", s)),
        }
    }
}

/// Distance metric for vector similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    L2,
    InnerProduct,
    Cosine,
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::L2 => write!(f, "L2"),
            DistanceMetric::InnerProduct => write!(f, "IP"),
            DistanceMetric::Cosine => write!(f, "COSINE"),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "L2" => Ok(DistanceMetric::L2),
            "IP" => Ok(DistanceMetric::InnerProduct),
            "COSINE" => Ok(DistanceMetric::Cosine),
            _ => Err(Error::invalid("distance metric", s)),
        }
    }
}

/// Vector field parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorParams {
    pub algorithm: VectorAlgorithm,
    pub vector_type: VectorType,
    pub dim: u32,
    pub metric: DistanceMetric,
    pub initial_cap: Option<u32>,
    /// FLAT only
    pub block_size: Option<u32>,
    /// HNSW only
    pub m: Option<u32>,
    /// HNSW only
    pub ef_construction: Option<u32>,
    /// HNSW only
    pub ef_runtime: Option<u32>,
    /// HNSW only
    pub epsilon: Option<f64>,
}

impl VectorParams {
    pub fn new(algorithm: VectorAlgorithm, vector_type: VectorType, dim: u32, metric: DistanceMetric) -> Self {
        Self {
            algorithm,
            vector_type,
            dim,
            metric,
            initial_cap: None,
            block_size: None,
            m: None,
            ef_construction: None,
            ef_runtime: None,
            epsilon: None,
        }
    }

    fn attributes(&self) -> NumberedOption {
        let mut attrs: Vec<Arg> = vec![
            "TYPE".into(),
            self.vector_type.to_string().into(),
            "DIM".into(),
            self.dim.into(),
            "DISTANCE_METRIC".into(),
            self.metric.to_string().into(),
        ];
        let mut push = |key: &str, value: Option<Arg>| {
            if let Some(value) = value {
                attrs.push(key.into());
                attrs.push(value);
            }
        };
        push("INITIAL_CAP", self.initial_cap.map(Arg::from));
        match self.algorithm {
            VectorAlgorithm::Flat => push("BLOCK_SIZE", self.block_size.map(Arg::from)),
            VectorAlgorithm::Hnsw => {
                push("M", self.m.map(Arg::from));
                push("EF_CONSTRUCTION", self.ef_construction.map(Arg::from));
                push("EF_RUNTIME", self.ef_runtime.map(Arg::from));
            }
        }
        let attributes = NumberedOption::with_items(self.algorithm.keyword(), attrs);
        match (self.algorithm, self.epsilon) {
            (VectorAlgorithm::Hnsw, Some(epsilon)) => {
                attributes.gated(since(2, 6, 0), [Arg::from("EPSILON"), Arg::from(epsilon)])
            }
            _ => attributes,
        }
    }
}

/// Type-specific part of a field definition.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Text {
        no_stem: bool,
        weight: Option<f64>,
        phonetic: Option<String>,
        suffix_trie: bool,
    },
    Numeric,
    Geo,
    Tag {
        separator: Option<char>,
        case_sensitive: bool,
        suffix_trie: bool,
    },
    Vector(VectorParams),
}

impl FieldType {
    fn keyword(&self) -> &'static str {
        match self {
            FieldType::Text { .. } => "TEXT",
            FieldType::Numeric => "NUMERIC",
            FieldType::Geo => "GEO",
            FieldType::Tag { .. } => "TAG",
            FieldType::Vector(_) => "VECTOR",
        }
    }
}

/// One schema attribute.
///
/// ```
/// use redisearch_protocol::option::schema::SchemaField;
/// use redisearch_protocol::option::{CommandOption, OptionNode};
///
/// let field: OptionNode = SchemaField::text("$.title").alias("title").weight(2.0).sortable().into();
/// let tokens: Vec<String> = field.render(None).iter().map(ToString::to_string).collect();
/// assert_eq!(tokens, ["$.title", "AS", "title", "TEXT", "WEIGHT", "2", "SORTABLE"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: String,
    pub alias: Option<String>,
    pub field_type: FieldType,
    pub sortable: bool,
    pub unf: bool,
    pub no_index: bool,
}

impl SchemaField {
    fn with_type(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            alias: None,
            field_type,
            sortable: false,
            unf: false,
            no_index: false,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::with_type(
            name,
            FieldType::Text {
                no_stem: false,
                weight: None,
                phonetic: None,
                suffix_trie: false,
            },
        )
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self::with_type(name, FieldType::Numeric)
    }

    pub fn geo(name: impl Into<String>) -> Self {
        Self::with_type(name, FieldType::Geo)
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self::with_type(
            name,
            FieldType::Tag {
                separator: None,
                case_sensitive: false,
                suffix_trie: false,
            },
        )
    }

    pub fn vector(name: impl Into<String>, params: VectorParams) -> Self {
        Self::with_type(name, FieldType::Vector(params))
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// SORTABLE without normalization (implies SORTABLE).
    #[must_use]
    pub fn sortable_unf(mut self) -> Self {
        self.sortable = true;
        self.unf = true;
        self
    }

    #[must_use]
    pub fn no_index(mut self) -> Self {
        self.no_index = true;
        self
    }

    /// TEXT only; ignored for other types.
    #[must_use]
    pub fn no_stem(mut self) -> Self {
        if let FieldType::Text { no_stem, .. } = &mut self.field_type {
            *no_stem = true;
        }
        self
    }

    /// TEXT only; ignored for other types.
    #[must_use]
    pub fn weight(mut self, value: f64) -> Self {
        if let FieldType::Text { weight, .. } = &mut self.field_type {
            *weight = Some(value);
        }
        self
    }

    /// TEXT only. Fails on matchers the engine does not know.
    pub fn phonetic(mut self, matcher: &str) -> Result<Self, Error> {
        if !PHONETIC_MATCHERS.contains(&matcher) {
            return Err(Error::invalid("phonetic matcher", matcher));
        }
        if let FieldType::Text { phonetic, .. } = &mut self.field_type {
            *phonetic = Some(matcher.to_string());
        }
        Ok(self)
    }

    /// TEXT and TAG only.
    #[must_use]
    pub fn suffix_trie(mut self) -> Self {
        match &mut self.field_type {
            FieldType::Text { suffix_trie, .. } | FieldType::Tag { suffix_trie, .. } => *suffix_trie = true,
            _ => {}
        }
        self
    }

    /// TAG only.
    #[must_use]
    pub fn separator(mut self, value: char) -> Self {
        if let FieldType::Tag { separator, .. } = &mut self.field_type {
            *separator = Some(value);
        }
        self
    }

    /// TAG only.
    #[must_use]
    pub fn case_sensitive(mut self) -> Self {
        if let FieldType::Tag { case_sensitive, .. } = &mut self.field_type {
            *case_sensitive = true;
        }
        self
    }
}

fn flag(keyword: &'static str, active: bool) -> OptionNode {
    let mut node = OptionNode::flag(keyword);
    node.set_flag(active);
    node
}

fn named(keyword: &'static str, value: Option<Arg>) -> OptionNode {
    let mut node = OptionNode::named(keyword);
    node.set_value(value);
    node
}

impl From<SchemaField> for OptionNode {
    fn from(field: SchemaField) -> Self {
        let type_keyword = field.field_type.keyword();
        let mut group = GroupedOption::new()
            .member("name", OptionNode::positional_value(field.name).not_empty())
            .member("alias", named("AS", field.alias.map(Arg::from)))
            .member("type", OptionNode::flag_on(type_keyword));

        group = match field.field_type {
            FieldType::Text {
                no_stem,
                weight,
                phonetic,
                suffix_trie,
            } => group
                .member("no_stem", flag("NOSTEM", no_stem))
                .member("weight", named("WEIGHT", weight.map(Arg::from)))
                .member(
                    "phonetic",
                    named("PHONETIC", phonetic.map(Arg::from))
                        .validated(Validator::one_of("phonetic matcher", PHONETIC_MATCHERS)),
                )
                .member("suffix_trie", flag("WITHSUFFIXTRIE", suffix_trie).since(since(2, 4, 0))),
            FieldType::Numeric | FieldType::Geo => group,
            FieldType::Tag {
                separator,
                case_sensitive,
                suffix_trie,
            } => group
                .member("separator", named("SEPARATOR", separator.map(|c| Arg::from(c.to_string()))))
                .member("case_sensitive", flag("CASESENSITIVE", case_sensitive))
                .member("suffix_trie", flag("WITHSUFFIXTRIE", suffix_trie).since(since(2, 4, 0))),
            FieldType::Vector(params) => {
                group
                    .member("attributes", params.attributes().into())
                    .since(since(2, 4, 0))
            }
        };

        group
            .member("sortable", flag("SORTABLE", field.sortable))
            .member("unf", flag("UNF", field.sortable && field.unf).since(since(2, 0, 0)))
            .member("no_index", flag("NOINDEX", field.no_index))
            .require(&["name", "type"])
            .lock(&["type"])
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::{strings, CommandOption};
    use semver::Version;

    fn render(field: SchemaField, version: Option<&Version>) -> Vec<String> {
        strings(&OptionNode::from(field).render(version))
    }

    #[test]
    fn test_text_field() {
        let field = SchemaField::text("title").no_stem().weight(1.5).phonetic("dm:en").unwrap();
        assert_eq!(
            render(field, None),
            vec!["title", "TEXT", "NOSTEM", "WEIGHT", "1.5", "PHONETIC", "dm:en"]
        );
        assert!(SchemaField::text("title").phonetic("dm:xx").is_err());
    }

    #[test]
    fn test_suffix_trie_is_version_gated() {
        let field = SchemaField::tag("tags").suffix_trie().separator(';');
        assert_eq!(
            render(field.clone(), Some(&Version::new(2, 4, 0))),
            vec!["tags", "TAG", "SEPARATOR", ";", "WITHSUFFIXTRIE"]
        );
        assert_eq!(
            render(field, Some(&Version::new(2, 2, 0))),
            vec!["tags", "TAG", "SEPARATOR", ";"]
        );
    }

    #[test]
    fn test_sortable_unf() {
        assert_eq!(
            render(SchemaField::numeric("price").sortable_unf().no_index(), None),
            vec!["price", "NUMERIC", "SORTABLE", "UNF", "NOINDEX"]
        );
        // UNF without SORTABLE is meaningless and dropped
        let mut field = SchemaField::geo("loc");
        field.unf = true;
        assert_eq!(render(field, None), vec!["loc", "GEO"]);
    }

    #[test]
    fn test_vector_field() {
        let mut params = VectorParams::new(VectorAlgorithm::Hnsw, VectorType::Float32, 128, DistanceMetric::Cosine);
        params.m = Some(16);
        params.block_size = Some(10);
        let field = SchemaField::vector("embedding", params);
        assert_eq!(
            render(field.clone(), None),
            vec![
                "embedding", "VECTOR", "HNSW", "8", "TYPE", "FLOAT32", "DIM", "128",
                "DISTANCE_METRIC", "COSINE", "M", "16"
            ]
        );
        assert!(render(field, Some(&Version::new(2, 2, 0))).is_empty());
    }

    #[test]
    fn test_vector_epsilon_is_version_gated() {
        let mut params = VectorParams::new(VectorAlgorithm::Hnsw, VectorType::Float32, 4, DistanceMetric::L2);
        params.epsilon = Some(0.5);
        let field = SchemaField::vector("v", params);
        assert_eq!(
            render(field.clone(), Some(&Version::new(2, 4, 0))),
            vec!["v", "VECTOR", "HNSW", "6", "TYPE", "FLOAT32", "DIM", "4", "DISTANCE_METRIC", "L2"]
        );
        assert_eq!(
            render(field, Some(&Version::new(2, 6, 0))),
            vec![
                "v", "VECTOR", "HNSW", "8", "TYPE", "FLOAT32", "DIM", "4", "DISTANCE_METRIC", "L2",
                "EPSILON", "0.5"
            ]
        );

        // FLAT has no EPSILON attribute
        let mut flat = VectorParams::new(VectorAlgorithm::Flat, VectorType::Float32, 4, DistanceMetric::L2);
        flat.epsilon = Some(0.5);
        let tokens = render(SchemaField::vector("v", flat), Some(&Version::new(2, 6, 0)));
        assert!(!tokens.contains(&"EPSILON".to_string()));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("hnsw".parse::<VectorAlgorithm>().unwrap(), VectorAlgorithm::Hnsw);
        assert!(matches!(
            "annoy".parse::<VectorAlgorithm>(),
            Err(Error::InvalidValue { what: "vector algorithm", .. })
        ));
        assert_eq!("ip".parse::<DistanceMetric>().unwrap(), DistanceMetric::InnerProduct);
        assert!("FLOAT16".parse::<VectorType>().is_err());
    }

    #[test]
    fn test_type_keyword_is_locked() {
        let node: OptionNode = SchemaField::text("title").into();
        let mut node = node;
        let group = node.as_grouped_mut().unwrap();
        assert!(matches!(group.set_flag("type", false), Err(Error::LockedOption { .. })));
        assert!(group.set_flag("no_stem", true).is_ok());
    }
}
