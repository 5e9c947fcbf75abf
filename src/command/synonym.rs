// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Synonym groups.

use super::{positional, Command, FtCommand};
use crate::client::Client;
use crate::error::{Error, Result};
use crate::option::OptionNode;
use crate::response::{expect_array, expect_ok, text_list, Reply};
use crate::version::since;

/// `FT.SYNUPDATE index group [SKIPINITIALSCAN] term...`
#[derive(Debug, Clone)]
pub struct SynUpdate {
    command: Command,
}

impl SynUpdate {
    pub fn new<I, S>(index: impl Into<String>, group: impl Into<String>, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut command = Command::new("FT.SYNUPDATE")
            .option("index", positional(index.into()))
            .option("group", positional(group.into()))
            .option("SKIPINITIALSCAN", OptionNode::flag("SKIPINITIALSCAN"))
            .list("terms")
            .gate("SKIPINITIALSCAN", since(2, 0, 0))
            .require(&["index", "group", "terms"]);
        for term in terms {
            command.push("terms", positional(term.into()));
        }
        Self { command }
    }

    #[must_use]
    pub fn skip_initial_scan(mut self) -> Self {
        self.command
            .set("SKIPINITIALSCAN", OptionNode::flag_on("SKIPINITIALSCAN"));
        self
    }
}

impl FtCommand for SynUpdate {
    type Output = ();

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<()> {
        expect_ok(reply, "FT.SYNUPDATE")
    }
}

/// `FT.SYNDUMP index`, replying with each term and the groups it belongs to.
#[derive(Debug, Clone)]
pub struct SynDump {
    command: Command,
}

impl SynDump {
    pub fn new(index: impl Into<String>) -> Self {
        let command = Command::new("FT.SYNDUMP")
            .option("index", positional(index.into()))
            .require(&["index"]);
        Self { command }
    }
}

impl FtCommand for SynDump {
    type Output = Vec<(String, Vec<String>)>;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<Self::Output> {
        const CONTEXT: &str = "FT.SYNDUMP";
        let items = expect_array(reply, CONTEXT)?;
        if items.len() % 2 != 0 {
            return Err(Error::unexpected(CONTEXT, items));
        }
        let mut synonyms = Vec::with_capacity(items.len() / 2);
        let mut items = items.into_iter();
        while let (Some(term), Some(groups)) = (items.next(), items.next()) {
            let term = term.as_text().ok_or_else(|| Error::unexpected(CONTEXT, &term))?;
            synonyms.push((term, text_list(groups, CONTEXT)?));
        }
        Ok(synonyms)
    }
}
