// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Custom dictionaries used by `FT.SPELLCHECK`.

use super::{positional, Command, FtCommand};
use crate::client::Client;
use crate::error::Result;
use crate::response::{expect_int, text_list, Reply};

fn with_terms<I, S>(id: &'static str, dict: String, terms: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut command = Command::new(id)
        .option("dict", positional(dict))
        .list("terms")
        .require(&["dict", "terms"]);
    for term in terms {
        command.push("terms", positional(term.into()));
    }
    command
}

/// `FT.DICTADD dict term...`, replying with the number of new terms.
#[derive(Debug, Clone)]
pub struct DictAdd {
    command: Command,
}

impl DictAdd {
    pub fn new<I, S>(dict: impl Into<String>, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: with_terms("FT.DICTADD", dict.into(), terms),
        }
    }
}

impl FtCommand for DictAdd {
    type Output = i64;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<i64> {
        expect_int(&reply, "FT.DICTADD")
    }
}

/// `FT.DICTDEL dict term...`, replying with the number of removed terms.
#[derive(Debug, Clone)]
pub struct DictDelete {
    command: Command,
}

impl DictDelete {
    pub fn new<I, S>(dict: impl Into<String>, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: with_terms("FT.DICTDEL", dict.into(), terms),
        }
    }
}

impl FtCommand for DictDelete {
    type Output = i64;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<i64> {
        expect_int(&reply, "FT.DICTDEL")
    }
}

/// `FT.DICTDUMP dict`
#[derive(Debug, Clone)]
pub struct DictDump {
    command: Command,
}

impl DictDump {
    pub fn new(dict: impl Into<String>) -> Self {
        let command = Command::new("FT.DICTDUMP")
            .option("dict", positional(dict.into()))
            .require(&["dict"]);
        Self { command }
    }
}

impl FtCommand for DictDump {
    type Output = Vec<String>;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<Vec<String>> {
        text_list(reply, "FT.DICTDUMP")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::option::strings;

    #[test]
    fn test_terms_follow_dictionary() {
        let add = DictAdd::new("colors", ["red", "green"]);
        assert_eq!(strings(&add.arguments().unwrap()), vec!["colors", "red", "green"]);
        assert_eq!(add.id(), "FT.DICTADD");
        let del = DictDelete::new("colors", ["red"]);
        assert_eq!(strings(&del.arguments().unwrap()), vec!["colors", "red"]);
    }

    #[test]
    fn test_terms_required() {
        let add = DictAdd::new("colors", Vec::<String>::new());
        assert_eq!(
            add.arguments(),
            Err(Error::MissingOption {
                names: vec!["terms".to_string()]
            })
        );
        // empty terms are not terms
        assert!(DictAdd::new("colors", [""]).arguments().is_err());
    }

    #[test]
    fn test_dump_reply() {
        let dump = DictDump::new("colors");
        let words = dump
            .parse_response(Reply::from(vec!["green", "red"]), None)
            .unwrap();
        assert_eq!(words, vec!["green", "red"]);
        assert!(dump.parse_response(Reply::Int(1), None).is_err());
    }
}
