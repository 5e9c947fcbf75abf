// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use semver::Version;

use super::{positional, Command, FtCommand};
use crate::client::Client;
use crate::error::Result;
use crate::option::OptionNode;
use crate::response::{expect_text, Reply};
use crate::version::since;

/// `FT.EXPLAIN index query [DIALECT n]`, replying with the parsed query plan.
#[derive(Debug, Clone)]
pub struct Explain {
    command: Command,
}

impl Explain {
    pub fn new(index: impl Into<String>, query: impl Into<String>) -> Self {
        let command = Command::new("FT.EXPLAIN")
            .option("index", positional(index.into()))
            .option("query", positional(query.into()))
            .option("DIALECT", OptionNode::named("DIALECT"))
            .gate("DIALECT", since(2, 4, 3))
            .require(&["index", "query"]);
        Self { command }
    }

    #[must_use]
    pub fn dialect(mut self, dialect: u8) -> Self {
        self.command.set("DIALECT", OptionNode::named_value("DIALECT", dialect));
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.command.set_version(Some(version));
        self
    }
}

impl FtCommand for Explain {
    type Output = String;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<String> {
        expect_text(&reply, "FT.EXPLAIN")
    }
}
