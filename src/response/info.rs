// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use super::{expect_array, pairs_to_map, FieldMap, Reply};
use crate::error::Result;

/// Parsed `FT.INFO` reply.
///
/// Only the commonly needed values are lifted into fields; everything the
/// server reported stays reachable through [`IndexInfo::get`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexInfo {
    pub name: String,
    pub num_docs: u64,
    pub num_terms: u64,
    pub indexing: bool,
    /// One alternating map per schema attribute (`identifier`, `attribute`, `type`, ...)
    pub attributes: Vec<FieldMap>,
    pub raw: FieldMap,
}

impl IndexInfo {
    pub(crate) fn parse(reply: Reply) -> Result<Self> {
        let raw = pairs_to_map(expect_array(reply, "FT.INFO")?);
        let number = |key: &str| raw.get(key).and_then(Reply::as_i64).unwrap_or(0).max(0) as u64;

        // Older engines call the list "fields", newer ones "attributes".
        let attributes = raw
            .get("attributes")
            .or_else(|| raw.get("fields"))
            .and_then(Reply::as_array)
            .map(|attributes| {
                attributes
                    .iter()
                    .filter_map(|attr| attr.as_array().map(|items| pairs_to_map(items.to_vec())))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            name: raw.get_text("index_name").unwrap_or_default(),
            num_docs: number("num_docs"),
            num_terms: number("num_terms"),
            indexing: number("indexing") != 0,
            attributes,
            raw,
        })
    }

    pub fn get(&self, key: &str) -> Option<&Reply> {
        self.raw.get(key)
    }

    /// Names (aliases) of the schema attributes.
    pub fn attribute_names(&self) -> Vec<String> {
        self.attributes
            .iter()
            .filter_map(|attr| attr.get_text("attribute"))
            .collect()
    }
}
