// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! K-nearest-neighbour clause: `filter=>[KNN k @field $blob ... AS alias]`.
//!
//! The query vector itself never appears in the query text; it is bound
//! through `PARAMS` and referenced by name.

use std::fmt;

use super::{embed, Escaper, Priority, QueryElement, QueryNode};
use crate::error::{Error, Result};

/// Runtime parameters accepted inside the KNN clause.
const KNN_PARAMETERS: &[&str] = &["EF_RUNTIME", "EPSILON"];

fn param_name(name: &str) -> &str {
    name.strip_prefix('$').unwrap_or(name)
}

/// Number of neighbours: a literal or a `$param` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnnCount {
    Value(u32),
    Param(String),
}

impl KnnCount {
    pub fn param(name: impl Into<String>) -> Self {
        let name = name.into();
        KnnCount::Param(param_name(&name).to_string())
    }
}

impl fmt::Display for KnnCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnnCount::Value(k) => write!(f, "{}", k),
            KnnCount::Param(name) => write!(f, "${}", name),
        }
    }
}

/// Vector similarity clause, optionally pre-filtered.
///
/// ```
/// use redisearch_protocol::query::{QueryNode, TagFacet, VectorClause};
///
/// let clause = VectorClause::new("embedding", 10, "query_vec")
///     .filter(TagFacet::new(["genre"], ["scifi"]).unwrap())
///     .param("EF_RUNTIME", "150")
///     .unwrap()
///     .score_as("distance");
/// assert_eq!(
///     QueryNode::from(clause).to_string(),
///     "@genre:{scifi}=>[KNN 10 @embedding $query_vec EF_RUNTIME 150 AS distance]"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VectorClause {
    filter: Option<Box<QueryNode>>,
    k: KnnCount,
    field: String,
    blob: String,
    params: Vec<(String, String)>,
    score_alias: Option<String>,
}

impl VectorClause {
    /// `blob` names the PARAMS entry holding the query vector.
    pub fn new(field: impl Into<String>, k: u32, blob: impl Into<String>) -> Self {
        let blob = blob.into();
        Self {
            filter: None,
            k: KnnCount::Value(k),
            field: field.into(),
            blob: param_name(&blob).to_string(),
            params: Vec::new(),
            score_alias: None,
        }
    }

    /// Take the neighbour count from a PARAMS entry instead of a literal.
    #[must_use]
    pub fn k_param(mut self, name: impl Into<String>) -> Self {
        self.k = KnnCount::param(name);
        self
    }

    /// Restrict the candidates; defaults to `*`.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<QueryNode>) -> Self {
        self.filter = Some(Box::new(filter.into()));
        self
    }

    /// Runtime algorithm parameter (`EF_RUNTIME`, `EPSILON`); the value may
    /// be a `$param` reference.
    pub fn param(mut self, name: &str, value: impl Into<String>) -> Result<Self> {
        let name = name.to_ascii_uppercase();
        if !KNN_PARAMETERS.contains(&name.as_str()) {
            return Err(Error::invalid("vector query parameter", name));
        }
        self.params.push((name, value.into()));
        Ok(self)
    }

    /// Name of the distance column added to each result.
    #[must_use]
    pub fn score_as(mut self, alias: impl Into<String>) -> Self {
        self.score_alias = Some(alias.into());
        self
    }
}

impl QueryElement for VectorClause {
    fn render(&self, escaper: &dyn Escaper) -> String {
        let filter = match &self.filter {
            Some(filter) => embed(filter, escaper),
            None => "*".to_string(),
        };
        let mut knn = format!("KNN {} @{} ${}", self.k, escaper.word(&self.field), self.blob);
        for (name, value) in &self.params {
            knn.push_str(&format!(" {} {}", name, value));
        }
        if let Some(alias) = &self.score_alias {
            knn.push_str(&format!(" AS {}", alias));
        }
        format!("{}=>[{}]", filter, knn)
    }

    fn priority(&self) -> Priority {
        Priority::Before
    }
}
