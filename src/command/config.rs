// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! `FT.CONFIG GET|SET`

use super::{positional, Command, FtCommand};
use crate::client::Client;
use crate::error::{Error, Result};
use crate::option::{Arg, OptionNode};
use crate::response::{expect_array, expect_ok, Reply};

/// `FT.CONFIG GET option`; `*` lists every runtime setting.
///
/// Replies with `(name, value)` pairs; unset values are `None`.
#[derive(Debug, Clone)]
pub struct ConfigGet {
    command: Command,
}

impl ConfigGet {
    pub fn new(option: impl Into<String>) -> Self {
        let command = Command::new("FT.CONFIG")
            .option("subcommand", OptionNode::positional_value("GET"))
            .option("option", positional(option.into()))
            .require(&["option"]);
        Self { command }
    }

    pub fn all() -> Self {
        Self::new("*")
    }
}

impl FtCommand for ConfigGet {
    type Output = Vec<(String, Option<String>)>;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<Self::Output> {
        const CONTEXT: &str = "FT.CONFIG GET";
        expect_array(reply, CONTEXT)?
            .into_iter()
            .map(|entry| {
                let pair = expect_array(entry, CONTEXT)?;
                match pair.as_slice() {
                    [name, value] => {
                        let name = name.as_text().ok_or_else(|| Error::unexpected(CONTEXT, name))?;
                        Ok((name, value.as_text()))
                    }
                    _ => Err(Error::unexpected(CONTEXT, &pair)),
                }
            })
            .collect()
    }
}

/// `FT.CONFIG SET option value`
#[derive(Debug, Clone)]
pub struct ConfigSet {
    command: Command,
}

impl ConfigSet {
    pub fn new(option: impl Into<String>, value: impl Into<Arg>) -> Self {
        let command = Command::new("FT.CONFIG")
            .option("subcommand", OptionNode::positional_value("SET"))
            .option("option", positional(option.into()))
            .option("value", OptionNode::positional_value(value))
            .require(&["option", "value"]);
        Self { command }
    }
}

impl FtCommand for ConfigSet {
    type Output = ();

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<()> {
        expect_ok(reply, "FT.CONFIG SET")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::strings;

    #[test]
    fn test_subcommand_leads() {
        let get = ConfigGet::new("TIMEOUT");
        assert_eq!(get.id(), "FT.CONFIG");
        assert_eq!(strings(&get.arguments().unwrap()), vec!["GET", "TIMEOUT"]);
        let set = ConfigSet::new("TIMEOUT", 500);
        assert_eq!(strings(&set.arguments().unwrap()), vec!["SET", "TIMEOUT", "500"]);
        assert_eq!(strings(&ConfigGet::all().arguments().unwrap()), vec!["GET", "*"]);
    }

    #[test]
    fn test_get_reply() {
        let reply = Reply::from(vec![
            Reply::from(vec![Reply::from("TIMEOUT"), Reply::from("500")]),
            Reply::from(vec![Reply::from("EXTLOAD"), Reply::Nil]),
        ]);
        let settings = ConfigGet::all().parse_response(reply, None).unwrap();
        assert_eq!(
            settings,
            vec![
                ("TIMEOUT".to_string(), Some("500".to_string())),
                ("EXTLOAD".to_string(), None)
            ]
        );
    }

    #[test]
    fn test_get_rejects_ragged_entry() {
        let reply = Reply::from(vec![Reply::from(vec![Reply::from("TIMEOUT")])]);
        assert!(matches!(
            ConfigGet::all().parse_response(reply, None),
            Err(Error::UnexpectedServerResponse { .. })
        ));
    }
}
