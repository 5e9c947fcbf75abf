// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Reply model and result interpretation.
//!
//! The engine answers with flat arrays. Most of them are conceptually
//! alternating key/value pairs:
//!
//! ```text
//! [ "index_name", "idx", "num_docs", "3", "attributes", [...] ]
//!      key         value   key        value  key          value
//! ```
//!
//! [`pairs_to_map`] rebuilds an ordered map from such an array (dropping a
//! trailing orphan key), [`lookup`] finds a single value without building
//! the map.

mod cursor;
mod documents;
mod info;
mod paginated;
mod spellcheck;
mod suggestion;

pub use cursor::{CursorPages, CursorResponse};
pub use documents::{AggregateRow, SearchDocument, SearchLayout};
pub use info::IndexInfo;
pub(crate) use paginated::DEFAULT_PAGE_SIZE;
pub use paginated::{PaginatedPages, PaginatedResponse};
pub use spellcheck::{SpellCheckResult, SpellCheckSuggestion};
pub use suggestion::Suggestion;

pub(crate) use documents::{parse_aggregate_page, parse_search_page};
pub(crate) use spellcheck::parse_spellcheck;
pub(crate) use suggestion::parse_suggestions;

use crate::error::{Error, Result};

/// One raw reply value, independent of the transport that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Nil,
    Int(i64),
    Double(f64),
    Bulk(Vec<u8>),
    Status(String),
    Array(Vec<Reply>),
}

impl Reply {
    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Nil)
    }

    /// Text of a bulk or status reply (bulk decoded lossily).
    pub fn as_text(&self) -> Option<String> {
        match self {
            Reply::Bulk(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            Reply::Status(s) => Some(s.clone()),
            Reply::Int(i) => Some(i.to_string()),
            Reply::Double(d) => Some(d.to_string()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Reply::Int(i) => Some(*i),
            Reply::Double(d) if d.fract() == 0.0 => Some(*d as i64),
            Reply::Bulk(_) | Reply::Status(_) => self.as_text()?.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Reply::Int(i) => Some(*i as f64),
            Reply::Double(d) => Some(*d),
            Reply::Bulk(_) | Reply::Status(_) => parse_float(&self.as_text()?),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Reply]> {
        match self {
            Reply::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_array(self) -> Option<Vec<Reply>> {
        match self {
            Reply::Array(items) => Some(items),
            _ => None,
        }
    }

    /// `OK` status (or the bulk string `OK`).
    pub fn is_ok(&self) -> bool {
        self.as_text().is_some_and(|s| s == "OK")
    }
}

impl From<&str> for Reply {
    fn from(s: &str) -> Self {
        Reply::Bulk(s.as_bytes().to_vec())
    }
}

impl From<String> for Reply {
    fn from(s: String) -> Self {
        Reply::Bulk(s.into_bytes())
    }
}

impl From<i64> for Reply {
    fn from(i: i64) -> Self {
        Reply::Int(i)
    }
}

impl<T: Into<Reply>> From<Vec<T>> for Reply {
    fn from(items: Vec<T>) -> Self {
        Reply::Array(items.into_iter().map(Into::into).collect())
    }
}

// The engine spells infinities "inf"/"+inf"/"-inf".
fn parse_float(text: &str) -> Option<f64> {
    match text.trim() {
        "inf" | "+inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        other => other.parse().ok(),
    }
}

/// Ordered key/value view of an alternating array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap(Vec<(String, Reply)>);

impl FieldMap {
    pub fn get(&self, key: &str) -> Option<&Reply> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Reply::as_text)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Reply)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<(String, Reply)> {
        self.0
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, Reply);
    type IntoIter = std::vec::IntoIter<(String, Reply)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Rebuild an ordered map from alternating key/value items.
///
/// Keys that are not text (nested arrays, nil) are skipped together with
/// their value; a trailing orphan key is dropped.
pub fn pairs_to_map(items: Vec<Reply>) -> FieldMap {
    let mut map = Vec::with_capacity(items.len() / 2);
    let mut iter = items.into_iter();
    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
        if let Some(key) = key.as_text() {
            map.push((key, value));
        }
    }
    FieldMap(map)
}

/// Value following `key` in an alternating array, without building a map.
pub fn lookup<'a>(items: &'a [Reply], key: &str) -> Option<&'a Reply> {
    items
        .chunks_exact(2)
        .find(|pair| pair[0].as_text().is_some_and(|k| k == key))
        .map(|pair| &pair[1])
}

/// Unwrap an array reply or fail with the issuing command as context.
pub(crate) fn expect_array(reply: Reply, context: &str) -> Result<Vec<Reply>> {
    match reply {
        Reply::Array(items) => Ok(items),
        other => Err(Error::unexpected(context, other)),
    }
}

pub(crate) fn expect_int(reply: &Reply, context: &str) -> Result<i64> {
    reply.as_i64().ok_or_else(|| Error::unexpected(context, reply))
}

pub(crate) fn expect_ok(reply: Reply, context: &str) -> Result<()> {
    if reply.is_ok() {
        Ok(())
    } else {
        Err(Error::unexpected(context, reply))
    }
}

pub(crate) fn expect_text(reply: &Reply, context: &str) -> Result<String> {
    reply.as_text().ok_or_else(|| Error::unexpected(context, reply))
}

/// Text items of a flat array (nil and nested entries skipped).
pub(crate) fn text_list(reply: Reply, context: &str) -> Result<Vec<String>> {
    Ok(expect_array(reply, context)?
        .iter()
        .filter_map(Reply::as_text)
        .collect())
}
