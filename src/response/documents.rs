// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search documents and aggregate rows.

use serde::de::DeserializeOwned;

use super::{expect_array, expect_int, expect_text, pairs_to_map, FieldMap, Reply};
use crate::error::{Error, Result};

/// Which optional columns a search reply carries per document.
///
/// ```text
/// [total, id, score?, payload?, sortkey?, [field, value, ...]?, id, ...]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLayout {
    pub content: bool,
    pub scores: bool,
    pub payloads: bool,
    pub sort_keys: bool,
}

impl Default for SearchLayout {
    fn default() -> Self {
        Self {
            content: true,
            scores: false,
            payloads: false,
            sort_keys: false,
        }
    }
}

/// One document of a search reply.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchDocument {
    pub id: String,
    pub score: Option<f64>,
    /// Score explanation tree, when EXPLAINSCORE was requested
    pub explanation: Option<Reply>,
    pub payload: Option<String>,
    pub sort_key: Option<String>,
    pub fields: FieldMap,
}

impl SearchDocument {
    pub fn get(&self, field: &str) -> Option<String> {
        self.fields.get_text(field)
    }

    /// Decode the `$` field returned for documents of an `ON JSON` index.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = self
            .get("$")
            .ok_or_else(|| Error::invalid("JSON document", format!("{} has no '$' field", self.id)))?;
        serde_json::from_str(&raw).map_err(|e| Error::invalid("JSON document", e.to_string()))
    }
}

const SEARCH: &str = "FT.SEARCH";

/// `(total, documents)` of one search page.
pub(crate) fn parse_search_page(reply: Reply, layout: SearchLayout) -> Result<(usize, Vec<SearchDocument>)> {
    let mut items = expect_array(reply, SEARCH)?.into_iter();
    let total = items
        .next()
        .ok_or_else(|| Error::unexpected(SEARCH, "empty reply"))?;
    let total = usize::try_from(expect_int(&total, SEARCH)?).unwrap_or(0);

    let mut documents = Vec::new();
    while let Some(id) = items.next() {
        let mut document = SearchDocument {
            id: expect_text(&id, SEARCH)?,
            ..Default::default()
        };
        if layout.scores {
            match next_column(&mut items, &document.id)? {
                // WITHSCORES + EXPLAINSCORE: [score, explanation]
                Reply::Array(parts) => {
                    let mut parts = parts.into_iter();
                    document.score = parts.next().as_ref().and_then(Reply::as_f64);
                    document.explanation = parts.next();
                }
                score => document.score = score.as_f64(),
            }
        }
        if layout.payloads {
            document.payload = next_column(&mut items, &document.id)?.as_text();
        }
        if layout.sort_keys {
            document.sort_key = next_column(&mut items, &document.id)?.as_text();
        }
        if layout.content {
            document.fields = match next_column(&mut items, &document.id)? {
                Reply::Array(fields) => pairs_to_map(fields),
                // expired or deleted between indexing and retrieval
                Reply::Nil => FieldMap::default(),
                other => return Err(Error::unexpected(SEARCH, other)),
            };
        }
        documents.push(document);
    }
    Ok((total, documents))
}

fn next_column(items: &mut impl Iterator<Item = Reply>, id: &str) -> Result<Reply> {
    items
        .next()
        .ok_or_else(|| Error::unexpected(SEARCH, format!("incomplete document '{}'", id)))
}

/// One row of an aggregate reply.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateRow {
    pub fields: FieldMap,
}

impl AggregateRow {
    pub fn get(&self, field: &str) -> Option<String> {
        self.fields.get_text(field)
    }

    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(Reply::as_f64)
    }
}

/// `(total, rows)` from `[total, [k, v, ...], ...]`.
pub(crate) fn parse_aggregate_page(items: Vec<Reply>) -> Result<(usize, Vec<AggregateRow>)> {
    const AGGREGATE: &str = "FT.AGGREGATE";
    let mut items = items.into_iter();
    let total = match items.next() {
        Some(total) => usize::try_from(expect_int(&total, AGGREGATE)?).unwrap_or(0),
        None => return Err(Error::unexpected(AGGREGATE, "empty reply")),
    };
    let rows = items
        .map(|row| {
            expect_array(row, AGGREGATE).map(|fields| AggregateRow {
                fields: pairs_to_map(fields),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((total, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_reply() -> Reply {
        Reply::Array(vec![
            Reply::Int(2),
            "doc:1".into(),
            "0.5".into(),
            Reply::from(vec!["title", "hello"]),
            "doc:2".into(),
            "0.25".into(),
            Reply::from(vec!["title", "world"]),
        ])
    }

    #[test]
    fn test_parse_with_scores() {
        let layout = SearchLayout {
            scores: true,
            ..Default::default()
        };
        let (total, docs) = parse_search_page(doc_reply(), layout).unwrap();
        assert_eq!(total, 2);
        assert_eq!(docs[0].id, "doc:1");
        assert_eq!(docs[0].score, Some(0.5));
        assert_eq!(docs[1].get("title").as_deref(), Some("world"));
    }

    #[test]
    fn test_parse_nocontent() {
        let reply = Reply::Array(vec![Reply::Int(3), "a".into(), "b".into(), "c".into()]);
        let layout = SearchLayout {
            content: false,
            ..Default::default()
        };
        let (total, docs) = parse_search_page(reply, layout).unwrap();
        assert_eq!(total, 3);
        assert_eq!(docs.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(docs[0].fields.is_empty());
    }

    #[test]
    fn test_incomplete_document() {
        let reply = Reply::Array(vec![Reply::Int(1), "doc:1".into()]);
        assert!(matches!(
            parse_search_page(reply, SearchLayout::default()),
            Err(Error::UnexpectedServerResponse { .. })
        ));
    }

    #[test]
    fn test_json_document() {
        #[derive(serde::Deserialize)]
        struct Product {
            name: String,
        }
        let reply = Reply::Array(vec![
            Reply::Int(1),
            "p:1".into(),
            Reply::from(vec!["$", r#"{"name":"lamp"}"#]),
        ]);
        let (_, docs) = parse_search_page(reply, SearchLayout::default()).unwrap();
        let product: Product = docs[0].json().unwrap();
        assert_eq!(product.name, "lamp");
        assert!(SearchDocument::default().json::<serde_json::Value>().is_err());
    }

    #[test]
    fn test_aggregate_rows() {
        let items = vec![
            Reply::Int(2),
            Reply::from(vec!["brand", "acme", "count", "4"]),
            Reply::from(vec!["brand", "globex", "count", "1"]),
        ];
        let (total, rows) = parse_aggregate_page(items).unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows[0].get("brand").as_deref(), Some("acme"));
        assert_eq!(rows[1].get_f64("count"), Some(1.0));
    }
}
