// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use super::{expect_array, Reply};
use crate::error::{Error, Result};

const SPELLCHECK: &str = "FT.SPELLCHECK";

#[derive(Debug, Clone, PartialEq)]
pub struct SpellCheckSuggestion {
    pub score: f64,
    pub suggestion: String,
}

/// Suggestions for one misspelled query term.
#[derive(Debug, Clone, PartialEq)]
pub struct SpellCheckResult {
    pub term: String,
    pub suggestions: Vec<SpellCheckSuggestion>,
}

/// `[["TERM", term, [[score, suggestion], ...]], ...]`
pub(crate) fn parse_spellcheck(reply: Reply) -> Result<Vec<SpellCheckResult>> {
    expect_array(reply, SPELLCHECK)?
        .into_iter()
        .map(|entry| {
            let entry = expect_array(entry, SPELLCHECK)?;
            let [kind, term, suggestions]: [Reply; 3] = entry
                .try_into()
                .map_err(|entry| Error::unexpected(SPELLCHECK, entry))?;
            if kind.as_text().as_deref() != Some("TERM") {
                return Err(Error::unexpected(SPELLCHECK, kind));
            }
            let term = term.as_text().ok_or_else(|| Error::unexpected(SPELLCHECK, &term))?;
            let suggestions = expect_array(suggestions, SPELLCHECK)?
                .into_iter()
                .map(parse_suggestion)
                .collect::<Result<Vec<_>>>()?;
            Ok(SpellCheckResult { term, suggestions })
        })
        .collect()
}

fn parse_suggestion(pair: Reply) -> Result<SpellCheckSuggestion> {
    let pair = expect_array(pair, SPELLCHECK)?;
    match pair.as_slice() {
        [score, suggestion] => Ok(SpellCheckSuggestion {
            score: score.as_f64().ok_or_else(|| Error::unexpected(SPELLCHECK, score))?,
            suggestion: suggestion
                .as_text()
                .ok_or_else(|| Error::unexpected(SPELLCHECK, suggestion))?,
        }),
        _ => Err(Error::unexpected(SPELLCHECK, pair)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spellcheck() {
        let reply = Reply::Array(vec![
            Reply::Array(vec![
                "TERM".into(),
                "helo".into(),
                Reply::Array(vec![Reply::from(vec!["0.5", "hello"]), Reply::from(vec!["0.25", "help"])]),
            ]),
            Reply::Array(vec!["TERM".into(), "wrld".into(), Reply::Array(vec![])]),
        ]);
        let results = parse_spellcheck(reply).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].term, "helo");
        assert_eq!(results[0].suggestions[0].suggestion, "hello");
        assert_eq!(results[0].suggestions[1].score, 0.25);
        assert!(results[1].suggestions.is_empty());
    }

    #[test]
    fn test_malformed_entry() {
        let reply = Reply::Array(vec![Reply::from(vec!["TERM", "helo"])]);
        assert!(matches!(
            parse_spellcheck(reply),
            Err(Error::UnexpectedServerResponse { .. })
        ));
    }
}
