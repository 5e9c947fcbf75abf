// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! `FT.AGGREGATE` and the cursor commands that continue it.

use semver::Version;

use super::{Command, EntryRef, FtCommand, Ordering, PaginatedCommand};
use crate::client::Client;
use crate::error::Result;
use crate::option::aggregate::{apply, cursor_count_of, filter, load, load_all, AggregateSortBy, GroupBy, WithCursor};
use crate::option::search::{limit, limit_of, params};
use crate::option::{Arg, CommandOption, OptionNode};
use crate::response::{
    expect_array, expect_ok, parse_aggregate_page, AggregateRow, CursorResponse, PaginatedResponse, Reply,
};
use crate::version::since;

/// `FT.AGGREGATE index query [pipeline...]`
///
/// Pipeline steps keep their slot order, except APPLY: each APPLY is
/// emitted right after the step it was chained to.
///
/// ```
/// use redisearch_protocol::command::{Aggregate, FtCommand};
/// use redisearch_protocol::option::aggregate::{GroupBy, Reducer};
///
/// let aggregate = Aggregate::new("idx", "*")
///     .group_by(GroupBy::new(["brand"]).reduce(Reducer::count().alias("n")))
///     .apply("@n * 2", "double")
///     .limit(0, 5);
///
/// let args: Vec<String> = aggregate.arguments().unwrap().iter().map(ToString::to_string).collect();
/// assert_eq!(
///     args,
///     ["idx", "*", "GROUPBY", "1", "@brand", "REDUCE", "COUNT", "0", "AS", "n",
///      "APPLY", "@n * 2", "AS", "double", "LIMIT", "0", "5"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Aggregate {
    command: Command,
    // Step an APPLY appended now would follow.
    last_step: Option<EntryRef>,
}

impl Aggregate {
    pub fn new(index: impl Into<String>, query: impl Into<String>) -> Self {
        let command = Command::new("FT.AGGREGATE")
            .option("index", OptionNode::positional_value(index.into()).not_empty())
            .option("query", OptionNode::positional_value(query.into()).not_empty())
            .option("VERBATIM", OptionNode::flag("VERBATIM"))
            .option("LOAD", OptionNode::positional())
            .option("TIMEOUT", OptionNode::named("TIMEOUT"))
            .list("GROUPBY")
            .option("SORTBY", OptionNode::positional())
            .list("APPLY")
            .option("LIMIT", OptionNode::positional())
            .list("FILTER")
            .option("WITHCURSOR", OptionNode::positional())
            .option("PARAMS", OptionNode::numbered("PARAMS").not_empty())
            .option("DIALECT", OptionNode::named("DIALECT"))
            .gate("PARAMS", since(2, 4, 3))
            .gate("DIALECT", since(2, 4, 3))
            .require(&["index", "query"])
            .ordering(Ordering::Chained(vec!["APPLY"]));
        Self {
            command,
            last_step: None,
        }
    }

    fn single_step(&mut self, name: &'static str, node: OptionNode) {
        self.command.set(name, node);
        self.last_step = Some(EntryRef { slot: name, index: 0 });
    }

    pub fn index(&self) -> Option<String> {
        self.command
            .get("index")
            .and_then(|node| node.option_data().as_arg().map(ToString::to_string))
    }

    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.command.set_version(Some(version));
        self
    }

    #[must_use]
    pub fn verbatim(mut self) -> Self {
        self.command.set("VERBATIM", OptionNode::flag_on("VERBATIM"));
        self
    }

    #[must_use]
    pub fn load<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.command.set("LOAD", load(fields).into());
        self
    }

    /// `LOAD *` (engine 2.0.13 and later).
    #[must_use]
    pub fn load_all(mut self) -> Self {
        self.command.set("LOAD", load_all());
        self
    }

    #[must_use]
    pub fn timeout(mut self, millis: u64) -> Self {
        self.command.set("TIMEOUT", OptionNode::named_value("TIMEOUT", millis));
        self
    }

    #[must_use]
    pub fn group_by(mut self, group_by: GroupBy) -> Self {
        self.last_step = Some(self.command.push("GROUPBY", group_by.into()));
        self
    }

    #[must_use]
    pub fn sort_by(mut self, sort_by: AggregateSortBy) -> Self {
        self.single_step("SORTBY", sort_by.into());
        self
    }

    /// `APPLY expression AS alias`, chained to the previous step.
    #[must_use]
    pub fn apply(mut self, expression: impl Into<String>, alias: impl Into<String>) -> Self {
        let entry = self
            .command
            .push_chained("APPLY", apply(expression, alias).into(), self.last_step);
        self.last_step = Some(entry);
        self
    }

    #[must_use]
    pub fn limit(mut self, offset: usize, num: usize) -> Self {
        self.set_page(offset, num);
        self
    }

    #[must_use]
    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.last_step = Some(self.command.push("FILTER", filter(expression)));
        self
    }

    /// Read results through a server-side cursor instead of LIMIT pages.
    #[must_use]
    pub fn with_cursor(mut self, cursor: WithCursor) -> Self {
        self.command.set("WITHCURSOR", cursor.into());
        self
    }

    #[must_use]
    pub fn params<K, V>(mut self, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Arg>,
    {
        self.command
            .set("PARAMS", OptionNode::from(params(values)).not_empty());
        self
    }

    #[must_use]
    pub fn dialect(mut self, dialect: u8) -> Self {
        self.command.set("DIALECT", OptionNode::named_value("DIALECT", dialect));
        self
    }

    pub fn uses_cursor(&self) -> bool {
        self.command
            .get("WITHCURSOR")
            .is_some_and(|node| node.as_grouped().is_some())
    }

    /// COUNT requested by WITHCURSOR, if any.
    pub fn cursor_count(&self) -> Option<usize> {
        self.command.get("WITHCURSOR").and_then(cursor_count_of)
    }
}

/// Either a LIMIT-paged result or a server cursor, depending on WITHCURSOR.
#[derive(Debug)]
pub enum AggregateResult {
    Paginated(PaginatedResponse<Aggregate>),
    Cursor(CursorResponse),
}

impl AggregateResult {
    /// Rows of the current page.
    pub fn rows(&self) -> &[AggregateRow] {
        match self {
            AggregateResult::Paginated(page) => page.items(),
            AggregateResult::Cursor(cursor) => cursor.items(),
        }
    }

    pub fn into_paginated(self) -> Option<PaginatedResponse<Aggregate>> {
        match self {
            AggregateResult::Paginated(page) => Some(page),
            AggregateResult::Cursor(_) => None,
        }
    }

    pub fn into_cursor(self) -> Option<CursorResponse> {
        match self {
            AggregateResult::Cursor(cursor) => Some(cursor),
            AggregateResult::Paginated(_) => None,
        }
    }
}

impl FtCommand for Aggregate {
    type Output = AggregateResult;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, client: Option<&Client>) -> Result<Self::Output> {
        if self.uses_cursor() {
            let index = self.index().unwrap_or_default();
            let page_size = self
                .cursor_count()
                .or_else(|| client.and_then(Client::cursor_read_size));
            let version = self.command.version().or_else(|| client.and_then(Client::version)).cloned();
            let cursor = CursorResponse::from_reply(reply, index, page_size, version, client.cloned())?;
            return Ok(AggregateResult::Cursor(cursor));
        }
        let (total, rows) = self.parse_page(reply)?;
        Ok(AggregateResult::Paginated(PaginatedResponse::new(
            self.clone(),
            total,
            rows,
            client.cloned(),
        )))
    }
}

impl PaginatedCommand for Aggregate {
    type Item = AggregateRow;

    fn page(&self) -> Option<(usize, usize)> {
        limit_of(self.command.get("LIMIT")?)
    }

    fn set_page(&mut self, offset: usize, size: usize) {
        self.single_step("LIMIT", limit(offset, size).into());
    }

    fn parse_page(&self, reply: Reply) -> Result<(usize, Vec<AggregateRow>)> {
        parse_aggregate_page(expect_array(reply, "FT.AGGREGATE")?)
    }
}

/// `FT.CURSOR READ index cursor_id [COUNT n]`
#[derive(Debug, Clone)]
pub struct CursorRead {
    command: Command,
    index: String,
    count: Option<usize>,
}

impl CursorRead {
    pub fn new(index: impl Into<String>, cursor_id: i64) -> Self {
        let index = index.into();
        let command = Command::new("FT.CURSOR")
            .option("subcommand", OptionNode::positional_value("READ"))
            .option("index", OptionNode::positional_value(index.as_str()).not_empty())
            .option("cursor", OptionNode::positional_value(cursor_id))
            .option("COUNT", OptionNode::named("COUNT"))
            .require(&["index", "cursor"]);
        Self {
            command,
            index,
            count: None,
        }
    }

    #[must_use]
    pub fn count(mut self, count: Option<usize>) -> Self {
        let mut node = OptionNode::named("COUNT");
        node.set_value(count.map(Arg::from));
        self.command.set("COUNT", node);
        self.count = count;
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: Option<Version>) -> Self {
        self.command.set_version(version);
        self
    }
}

impl FtCommand for CursorRead {
    type Output = CursorResponse;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, client: Option<&Client>) -> Result<Self::Output> {
        let version = self.command.version().or_else(|| client.and_then(Client::version)).cloned();
        CursorResponse::from_reply(reply, self.index.clone(), self.count, version, client.cloned())
    }
}

/// `FT.CURSOR DEL index cursor_id`
#[derive(Debug, Clone)]
pub struct CursorDelete {
    command: Command,
}

impl CursorDelete {
    pub fn new(index: impl Into<String>, cursor_id: i64) -> Self {
        let command = Command::new("FT.CURSOR")
            .option("subcommand", OptionNode::positional_value("DEL"))
            .option("index", OptionNode::positional_value(index.into()).not_empty())
            .option("cursor", OptionNode::positional_value(cursor_id))
            .require(&["index", "cursor"]);
        Self { command }
    }
}

impl FtCommand for CursorDelete {
    type Output = ();

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<()> {
        expect_ok(reply, "FT.CURSOR DEL")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::aggregate::Reducer;
    use crate::option::search::SortDirection;
    use crate::option::strings;

    fn args<C: FtCommand>(command: &C) -> Vec<String> {
        strings(&command.arguments().unwrap())
    }

    #[test]
    fn test_apply_without_parent_goes_first() {
        let aggregate = Aggregate::new("idx", "*")
            .apply("upper(@name)", "upper_name")
            .filter("@price > 10");
        assert_eq!(
            args(&aggregate),
            vec!["idx", "*", "APPLY", "upper(@name)", "AS", "upper_name", "FILTER", "@price > 10"]
        );
    }

    #[test]
    fn test_apply_follows_its_step() {
        let aggregate = Aggregate::new("idx", "*")
            .load(["price"])
            .filter("@price > 10")
            .apply("@price * 2", "double")
            .group_by(GroupBy::new(["brand"]).reduce(Reducer::sum("double").alias("sum")))
            .sort_by(AggregateSortBy::new().key("sum", Some(SortDirection::Desc)).max(3));
        assert_eq!(
            args(&aggregate),
            vec![
                "idx", "*", "LOAD", "1", "@price", "GROUPBY", "1", "@brand", "REDUCE", "SUM", "1", "@double",
                "AS", "sum", "SORTBY", "2", "@sum", "DESC", "MAX", "3", "FILTER", "@price > 10", "APPLY",
                "@price * 2", "AS", "double"
            ]
        );
    }

    #[test]
    fn test_with_cursor() {
        let aggregate = Aggregate::new("idx", "*")
            .with_cursor(WithCursor::new().count(50).max_idle(1000))
            .dialect(2)
            .with_version(Version::new(2, 4, 3));
        assert!(aggregate.uses_cursor());
        assert_eq!(aggregate.cursor_count(), Some(50));
        assert_eq!(
            args(&aggregate),
            vec!["idx", "*", "WITHCURSOR", "COUNT", "50", "MAXIDLE", "1000", "DIALECT", "2"]
        );
    }

    #[test]
    fn test_cursor_commands() {
        assert_eq!(
            args(&CursorRead::new("idx", 42).count(Some(10))),
            vec!["READ", "idx", "42", "COUNT", "10"]
        );
        assert_eq!(args(&CursorRead::new("idx", 42)), vec!["READ", "idx", "42"]);
        assert_eq!(args(&CursorDelete::new("idx", 42)), vec!["DEL", "idx", "42"]);
        assert_eq!(CursorDelete::new("idx", 42).id(), "FT.CURSOR");
    }

    #[test]
    fn test_parse_paginated() {
        let reply = Reply::Array(vec![Reply::Int(1), Reply::from(vec!["brand", "acme"])]);
        let result = Aggregate::new("idx", "*").parse_response(reply, None).unwrap();
        assert_eq!(result.rows()[0].get("brand").as_deref(), Some("acme"));
        assert!(result.into_paginated().is_some());
    }

    #[test]
    fn test_parse_cursor() {
        let reply = Reply::Array(vec![
            Reply::Array(vec![Reply::Int(3), Reply::from(vec!["brand", "acme"])]),
            Reply::Int(99),
        ]);
        let aggregate = Aggregate::new("idx", "*").with_cursor(WithCursor::new().count(1));
        let cursor = aggregate.parse_response(reply, None).unwrap().into_cursor().unwrap();
        assert_eq!(cursor.cursor_id(), 99);
        assert_eq!(cursor.total(), 3);
        assert!(cursor.valid());
    }
}
