// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use super::{expect_array, Reply};
use crate::error::{Error, Result};

/// One auto-complete suggestion from `FT.SUGGET`.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub value: String,
    pub score: Option<f64>,
    pub payload: Option<String>,
}

/// Flat `[value, score?, payload?, value, ...]`; nil means no suggestions.
pub(crate) fn parse_suggestions(reply: Reply, with_scores: bool, with_payloads: bool) -> Result<Vec<Suggestion>> {
    const SUGGET: &str = "FT.SUGGET";
    if reply.is_nil() {
        return Ok(Vec::new());
    }
    let stride = 1 + usize::from(with_scores) + usize::from(with_payloads);
    let items = expect_array(reply, SUGGET)?;
    if items.len() % stride != 0 {
        return Err(Error::unexpected(SUGGET, items));
    }
    items
        .chunks_exact(stride)
        .map(|chunk| {
            let mut columns = chunk.iter();
            let value = columns
                .next()
                .and_then(Reply::as_text)
                .ok_or_else(|| Error::unexpected(SUGGET, chunk))?;
            let score = if with_scores {
                columns.next().and_then(Reply::as_f64)
            } else {
                None
            };
            let payload = if with_payloads {
                columns.next().and_then(Reply::as_text)
            } else {
                None
            };
            Ok(Suggestion { value, score, payload })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_suggestions() {
        let reply = Reply::from(vec!["hello", "help"]);
        let suggestions = parse_suggestions(reply, false, false).unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[1].value, "help");
        assert_eq!(suggestions[1].score, None);
    }

    #[test]
    fn test_scores_and_payloads() {
        let reply = Reply::from(vec!["hello", "0.8", "greeting", "help", "0.4", "assist"]);
        let suggestions = parse_suggestions(reply, true, true).unwrap();
        assert_eq!(suggestions[0].score, Some(0.8));
        assert_eq!(suggestions[1].payload.as_deref(), Some("assist"));
    }

    #[test]
    fn test_nil_and_ragged() {
        assert!(parse_suggestions(Reply::Nil, true, false).unwrap().is_empty());
        assert!(parse_suggestions(Reply::from(vec!["hello", "0.8", "help"]), true, false).is_err());
    }
}
