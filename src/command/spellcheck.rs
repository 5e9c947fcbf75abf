// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! `FT.SPELLCHECK`

use semver::Version;

use super::{positional, Command, FtCommand};
use crate::client::Client;
use crate::error::{Error, Result};
use crate::option::{GroupedOption, OptionNode, Validator};
use crate::response::{parse_spellcheck, Reply, SpellCheckResult};
use crate::version::since;

/// Whether a custom dictionary extends or filters the suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermsMode {
    Include,
    Exclude,
}

impl TermsMode {
    fn as_str(self) -> &'static str {
        match self {
            TermsMode::Include => "INCLUDE",
            TermsMode::Exclude => "EXCLUDE",
        }
    }
}

/// `FT.SPELLCHECK index query [DISTANCE d] [TERMS INCLUDE|EXCLUDE dict]... [DIALECT n]`
#[derive(Debug, Clone)]
pub struct SpellCheck {
    command: Command,
}

impl SpellCheck {
    pub fn new(index: impl Into<String>, query: impl Into<String>) -> Self {
        let command = Command::new("FT.SPELLCHECK")
            .option("index", positional(index.into()))
            .option("query", positional(query.into()))
            .option("DISTANCE", OptionNode::named("DISTANCE"))
            .list("TERMS")
            .option("DIALECT", OptionNode::named("DIALECT"))
            .gate("DIALECT", since(2, 4, 3))
            .require(&["index", "query"]);
        Self { command }
    }

    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.command.set_version(Some(version));
        self
    }

    /// Maximum Levenshtein distance of suggestions, 1 to 4.
    pub fn distance(mut self, distance: u8) -> Result<Self> {
        if !(1..=4).contains(&distance) {
            return Err(Error::OutOfRange {
                what: "spellcheck distance",
                value: distance.to_string(),
            });
        }
        self.command.set(
            "DISTANCE",
            OptionNode::named_value("DISTANCE", distance).validated(Validator::int_range("spellcheck distance", 1, 4)),
        );
        Ok(self)
    }

    /// Repeatable.
    #[must_use]
    pub fn terms(mut self, mode: TermsMode, dictionary: impl Into<String>) -> Self {
        let terms = GroupedOption::new()
            .member("keyword", OptionNode::flag_on("TERMS"))
            .member("mode", OptionNode::positional_value(mode.as_str()))
            .member("dictionary", positional(dictionary.into()))
            .require(&["mode", "dictionary"])
            .lock(&["keyword", "mode"]);
        self.command.push("TERMS", terms.into());
        self
    }

    #[must_use]
    pub fn dialect(mut self, dialect: u8) -> Self {
        self.command.set("DIALECT", OptionNode::named_value("DIALECT", dialect));
        self
    }
}

impl FtCommand for SpellCheck {
    type Output = Vec<SpellCheckResult>;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<Self::Output> {
        parse_spellcheck(reply)
    }
}
