// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Auto-complete dictionaries: `FT.SUGADD`, `FT.SUGGET`, `FT.SUGDEL`, `FT.SUGLEN`.

use super::{positional, Command, FtCommand};
use crate::client::Client;
use crate::error::Result;
use crate::option::{CommandOption, OptionData, OptionNode};
use crate::response::{expect_int, parse_suggestions, Reply, Suggestion};

/// `FT.SUGADD key string score [INCR] [PAYLOAD payload]`
///
/// Replies with the size of the suggestion dictionary after the call.
#[derive(Debug, Clone)]
pub struct SugAdd {
    command: Command,
}

impl SugAdd {
    pub fn new(key: impl Into<String>, string: impl Into<String>, score: f64) -> Self {
        let command = Command::new("FT.SUGADD")
            .option("key", positional(key.into()))
            .option("string", positional(string.into()))
            .option("score", OptionNode::positional_value(score))
            .option("INCR", OptionNode::flag("INCR"))
            .option("PAYLOAD", OptionNode::named("PAYLOAD"))
            .require(&["key", "string", "score"]);
        Self { command }
    }

    /// Add `score` to an existing entry instead of replacing it.
    #[must_use]
    pub fn increment(mut self) -> Self {
        self.command.set("INCR", OptionNode::flag_on("INCR"));
        self
    }

    #[must_use]
    pub fn payload(mut self, payload: impl Into<String>) -> Self {
        self.command
            .set("PAYLOAD", OptionNode::named_value("PAYLOAD", payload.into()).not_empty());
        self
    }
}

impl FtCommand for SugAdd {
    type Output = i64;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<i64> {
        expect_int(&reply, "FT.SUGADD")
    }
}

/// `FT.SUGGET key prefix [FUZZY] [WITHSCORES] [WITHPAYLOADS] [MAX n]`
///
/// ```
/// use redisearch_protocol::command::{FtCommand, SugGet};
/// use redisearch_protocol::response::Reply;
///
/// let get = SugGet::new("autocomplete", "hel").fuzzy().with_scores().max(5);
/// let args: Vec<String> = get.arguments().unwrap().iter().map(ToString::to_string).collect();
/// assert_eq!(args, ["autocomplete", "hel", "FUZZY", "WITHSCORES", "MAX", "5"]);
///
/// let reply = Reply::from(vec![Reply::from("hello"), Reply::from("0.5")]);
/// let suggestions = get.parse_response(reply, None).unwrap();
/// assert_eq!(suggestions[0].value, "hello");
/// assert_eq!(suggestions[0].score, Some(0.5));
/// ```
#[derive(Debug, Clone)]
pub struct SugGet {
    command: Command,
}

impl SugGet {
    pub fn new(key: impl Into<String>, prefix: impl Into<String>) -> Self {
        let command = Command::new("FT.SUGGET")
            .option("key", positional(key.into()))
            .option("prefix", positional(prefix.into()))
            .option("FUZZY", OptionNode::flag("FUZZY"))
            .option("WITHSCORES", OptionNode::flag("WITHSCORES"))
            .option("WITHPAYLOADS", OptionNode::flag("WITHPAYLOADS"))
            .option("MAX", OptionNode::named("MAX"))
            .require(&["key", "prefix"]);
        Self { command }
    }

    fn flag(mut self, name: &'static str) -> Self {
        self.command.set(name, OptionNode::flag_on(name));
        self
    }

    fn is_set(&self, name: &str) -> bool {
        self.command
            .get(name)
            .is_some_and(|node| node.option_data() == OptionData::Flag(true))
    }

    #[must_use]
    pub fn fuzzy(self) -> Self {
        self.flag("FUZZY")
    }

    #[must_use]
    pub fn with_scores(self) -> Self {
        self.flag("WITHSCORES")
    }

    #[must_use]
    pub fn with_payloads(self) -> Self {
        self.flag("WITHPAYLOADS")
    }

    #[must_use]
    pub fn max(mut self, max: u32) -> Self {
        self.command.set("MAX", OptionNode::named_value("MAX", max));
        self
    }
}

impl FtCommand for SugGet {
    type Output = Vec<Suggestion>;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<Vec<Suggestion>> {
        parse_suggestions(reply, self.is_set("WITHSCORES"), self.is_set("WITHPAYLOADS"))
    }
}

/// `FT.SUGDEL key string`, replying whether the entry existed.
#[derive(Debug, Clone)]
pub struct SugDelete {
    command: Command,
}

impl SugDelete {
    pub fn new(key: impl Into<String>, string: impl Into<String>) -> Self {
        let command = Command::new("FT.SUGDEL")
            .option("key", positional(key.into()))
            .option("string", positional(string.into()))
            .require(&["key", "string"]);
        Self { command }
    }
}

impl FtCommand for SugDelete {
    type Output = bool;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<bool> {
        Ok(expect_int(&reply, "FT.SUGDEL")? == 1)
    }
}

/// `FT.SUGLEN key`
#[derive(Debug, Clone)]
pub struct SugLen {
    command: Command,
}

impl SugLen {
    pub fn new(key: impl Into<String>) -> Self {
        let command = Command::new("FT.SUGLEN")
            .option("key", positional(key.into()))
            .require(&["key"]);
        Self { command }
    }
}

impl FtCommand for SugLen {
    type Output = i64;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<i64> {
        expect_int(&reply, "FT.SUGLEN")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::strings;

    #[test]
    fn test_sugadd_arguments() {
        let add = SugAdd::new("ac", "hello world", 1.0).payload("greeting").increment();
        assert_eq!(
            strings(&add.arguments().unwrap()),
            vec!["ac", "hello world", "1", "INCR", "PAYLOAD", "greeting"]
        );
        assert_eq!(add.parse_response(Reply::Int(3), None).unwrap(), 3);
    }

    #[test]
    fn test_sugget_parses_with_payloads() {
        let get = SugGet::new("ac", "he").with_scores().with_payloads();
        let reply = Reply::from(vec![
            Reply::from("hello"),
            Reply::from("2"),
            Reply::from("greeting"),
            Reply::from("help"),
            Reply::from("1"),
            Reply::Nil,
        ]);
        let suggestions = get.parse_response(reply, None).unwrap();
        assert_eq!(
            suggestions,
            vec![
                Suggestion {
                    value: "hello".into(),
                    score: Some(2.0),
                    payload: Some("greeting".into())
                },
                Suggestion {
                    value: "help".into(),
                    score: Some(1.0),
                    payload: None
                },
            ]
        );
    }

    #[test]
    fn test_sugget_nil_is_empty() {
        let get = SugGet::new("ac", "zz");
        assert!(get.parse_response(Reply::Nil, None).unwrap().is_empty());
    }

    #[test]
    fn test_sugdel_and_suglen() {
        let del = SugDelete::new("ac", "hello");
        assert!(del.parse_response(Reply::Int(1), None).unwrap());
        assert!(!del.parse_response(Reply::Int(0), None).unwrap());
        assert_eq!(strings(&SugLen::new("ac").arguments().unwrap()), vec!["ac"]);
    }
}
