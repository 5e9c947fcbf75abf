// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! `FT.SEARCH`

use std::borrow::Cow;
use std::ops::Bound;

use semver::Version;

use super::{Command, FtCommand, PaginatedCommand};
use crate::client::Client;
use crate::error::Result;
use crate::option::search::{
    geo_filter, limit, limit_of, numeric_filter, params, return_fields, sort_by, GeoUnit, Highlight,
    ReturnField, SortDirection, Summarize,
};
use crate::option::{Arg, CommandOption, NumberedOption, OptionData, OptionNode};
use crate::response::{
    parse_search_page, PaginatedResponse, Reply, SearchDocument, SearchLayout, DEFAULT_PAGE_SIZE,
};
use crate::version::since;

/// `FT.SEARCH index query [options...]`
///
/// Options render in protocol order whatever order the builder methods
/// are called in.
#[derive(Debug, Clone)]
pub struct Search {
    command: Command,
}

impl Search {
    pub fn new(index: impl Into<String>, query: impl Into<String>) -> Self {
        let command = Command::new("FT.SEARCH")
            .option("index", OptionNode::positional_value(index.into()).not_empty())
            .option("query", OptionNode::positional_value(query.into()).not_empty())
            .option("NOCONTENT", OptionNode::flag("NOCONTENT"))
            .option("VERBATIM", OptionNode::flag("VERBATIM"))
            .option("NOSTOPWORDS", OptionNode::flag("NOSTOPWORDS"))
            .option("WITHSCORES", OptionNode::flag("WITHSCORES"))
            .option("WITHPAYLOADS", OptionNode::flag("WITHPAYLOADS"))
            .option("WITHSORTKEYS", OptionNode::flag("WITHSORTKEYS"))
            .list("FILTER")
            .list("GEOFILTER")
            .option("INKEYS", OptionNode::numbered("INKEYS").not_empty())
            .option("INFIELDS", OptionNode::numbered("INFIELDS").not_empty())
            .option("RETURN", OptionNode::numbered("RETURN"))
            .option("SUMMARIZE", OptionNode::positional())
            .option("HIGHLIGHT", OptionNode::positional())
            .option("SLOP", OptionNode::named("SLOP"))
            .option("TIMEOUT", OptionNode::named("TIMEOUT"))
            .option("INORDER", OptionNode::flag("INORDER"))
            .option("LANGUAGE", OptionNode::named("LANGUAGE").not_empty())
            .option("EXPANDER", OptionNode::named("EXPANDER").not_empty())
            .option("SCORER", OptionNode::named("SCORER").not_empty())
            .option("EXPLAINSCORE", OptionNode::flag("EXPLAINSCORE"))
            .option("PAYLOAD", OptionNode::named("PAYLOAD"))
            .option("SORTBY", OptionNode::positional())
            .option("LIMIT", OptionNode::positional())
            .option("PARAMS", OptionNode::numbered("PARAMS").not_empty())
            .option("DIALECT", OptionNode::named("DIALECT"))
            .gate("PARAMS", since(2, 4, 3))
            .gate("DIALECT", since(2, 4, 3))
            .require(&["index", "query"]);
        Self { command }
    }

    fn flag(mut self, name: &'static str) -> Self {
        self.command.set(name, OptionNode::flag_on(name));
        self
    }

    fn named(mut self, name: &'static str, value: impl Into<Arg>) -> Self {
        self.command.set(name, OptionNode::named_value(name, value).not_empty());
        self
    }

    fn is_set(&self, name: &str) -> bool {
        self.command
            .get(name)
            .is_some_and(|node| node.option_data() == OptionData::Flag(true))
    }

    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.command.set_version(Some(version));
        self
    }

    /// Return document ids only.
    #[must_use]
    pub fn no_content(self) -> Self {
        self.flag("NOCONTENT")
    }

    #[must_use]
    pub fn verbatim(self) -> Self {
        self.flag("VERBATIM")
    }

    #[must_use]
    pub fn no_stop_words(self) -> Self {
        self.flag("NOSTOPWORDS")
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
    pub fn with_sort_keys(self) -> Self {
        self.flag("WITHSORTKEYS")
    }

    #[must_use]
    pub fn in_order(self) -> Self {
        self.flag("INORDER")
    }

    /// Adds a score explanation to each document (implies WITHSCORES).
    #[must_use]
    pub fn explain_score(self) -> Self {
        self.flag("EXPLAINSCORE").flag("WITHSCORES")
    }

    /// Numeric range filter; repeatable.
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, min: Bound<f64>, max: Bound<f64>) -> Self {
        self.command.push("FILTER", numeric_filter(field, min, max).into());
        self
    }

    /// Geo radius filter; repeatable.
    #[must_use]
    pub fn geo_filter(mut self, field: impl Into<String>, lon: f64, lat: f64, radius: f64, unit: GeoUnit) -> Self {
        self.command
            .push("GEOFILTER", geo_filter(field, lon, lat, radius, unit).into());
        self
    }

    #[must_use]
    pub fn in_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = NumberedOption::with_items("INKEYS", keys.into_iter().map(Into::into).collect::<Vec<String>>());
        self.command.set("INKEYS", OptionNode::from(keys).not_empty());
        self
    }

    #[must_use]
    pub fn in_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields =
            NumberedOption::with_items("INFIELDS", fields.into_iter().map(Into::into).collect::<Vec<String>>());
        self.command.set("INFIELDS", OptionNode::from(fields).not_empty());
        self
    }

    /// `RETURN 0` is valid and returns no fields.
    #[must_use]
    pub fn return_fields(mut self, fields: &[ReturnField]) -> Self {
        self.command.set("RETURN", return_fields(fields).into());
        self
    }

    #[must_use]
    pub fn summarize(mut self, summarize: Summarize) -> Self {
        self.command.set("SUMMARIZE", summarize.into());
        self
    }

    #[must_use]
    pub fn highlight(mut self, highlight: Highlight) -> Self {
        self.command.set("HIGHLIGHT", highlight.into());
        self
    }

    #[must_use]
    pub fn slop(self, slop: u32) -> Self {
        self.named("SLOP", slop)
    }

    #[must_use]
    pub fn timeout(self, millis: u64) -> Self {
        self.named("TIMEOUT", millis)
    }

    #[must_use]
    pub fn language(self, language: impl Into<String>) -> Self {
        self.named("LANGUAGE", language.into())
    }

    #[must_use]
    pub fn expander(self, expander: impl Into<String>) -> Self {
        self.named("EXPANDER", expander.into())
    }

    #[must_use]
    pub fn scorer(self, scorer: impl Into<String>) -> Self {
        self.named("SCORER", scorer.into())
    }

    #[must_use]
    pub fn payload(self, payload: impl Into<String>) -> Self {
        self.named("PAYLOAD", payload.into())
    }

    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, direction: Option<SortDirection>) -> Self {
        self.command.set("SORTBY", sort_by(field, direction).into());
        self
    }

    #[must_use]
    pub fn limit(mut self, offset: usize, num: usize) -> Self {
        self.set_page(offset, num);
        self
    }

    /// Query parameters referenced as `$name` in the query text.
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
    pub fn dialect(self, dialect: u8) -> Self {
        self.named("DIALECT", dialect)
    }

    /// Columns the reply will carry for each document.
    pub fn layout(&self) -> SearchLayout {
        SearchLayout {
            content: !self.is_set("NOCONTENT"),
            scores: self.is_set("WITHSCORES"),
            payloads: self.is_set("WITHPAYLOADS"),
            sort_keys: self.is_set("WITHSORTKEYS"),
        }
    }
}

impl FtCommand for Search {
    type Output = PaginatedResponse<Search>;

    fn command(&self) -> &Command {
        &self.command
    }

    // A configured page size other than the engine's own is sent as LIMIT,
    // so the first page matches what the paginator expects.
    fn command_for(&self, client: &Client) -> Cow<'_, Command> {
        let size = client.default_page_size();
        if self.page().is_some() || size == DEFAULT_PAGE_SIZE {
            return Cow::Borrowed(&self.command);
        }
        let mut paged = self.clone();
        paged.set_page(0, size);
        Cow::Owned(paged.command)
    }

    fn parse_response(&self, reply: Reply, client: Option<&Client>) -> Result<Self::Output> {
        let (total, documents) = self.parse_page(reply)?;
        Ok(PaginatedResponse::new(self.clone(), total, documents, client.cloned()))
    }
}

impl PaginatedCommand for Search {
    type Item = SearchDocument;

    fn page(&self) -> Option<(usize, usize)> {
        limit_of(self.command.get("LIMIT")?)
    }

    fn set_page(&mut self, offset: usize, size: usize) {
        self.command.set("LIMIT", limit(offset, size).into());
    }

    fn parse_page(&self, reply: Reply) -> Result<(usize, Vec<SearchDocument>)> {
        parse_search_page(reply, self.layout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::strings;

    fn args(search: &Search) -> Vec<String> {
        strings(&search.arguments().unwrap())
    }

    #[test]
    fn test_setter_order_does_not_matter() {
        let search = Search::new("idx", "@text1:\"hello world\"")
            .limit(12, 10)
            .with_scores()
            .with_version(Version::new(2, 4, 3));
        assert_eq!(
            args(&search),
            vec!["idx", "@text1:\"hello world\"", "WITHSCORES", "LIMIT", "12", "10"]
        );
    }

    #[test]
    fn test_full_option_order() {
        let search = Search::new("idx", "hello")
            .dialect(2)
            .sort_by("price", Some(SortDirection::Desc))
            .highlight(Highlight::new().field("title").tags("<b>", "</b>"))
            .return_fields(&[ReturnField::aliased("$.title", "title")])
            .in_keys(["doc:1"])
            .filter("price", Bound::Included(10.0), Bound::Unbounded)
            .language("english")
            .no_content();
        assert_eq!(
            args(&search),
            vec![
                "idx", "hello", "NOCONTENT", "FILTER", "price", "10", "+inf", "INKEYS", "1", "doc:1",
                "RETURN", "3", "$.title", "AS", "title", "HIGHLIGHT", "FIELDS", "1", "title", "TAGS", "<b>",
                "</b>", "LANGUAGE", "english", "SORTBY", "price", "DESC", "DIALECT", "2"
            ]
        );
    }

    #[test]
    fn test_dialect_dropped_for_old_engines() {
        let search = Search::new("idx", "hello")
            .dialect(2)
            .params([("vec", "x")])
            .with_version(Version::new(2, 2, 0));
        assert_eq!(args(&search), vec!["idx", "hello"]);
    }

    #[test]
    fn test_empty_query_is_missing() {
        let search = Search::new("idx", "");
        assert!(matches!(
            search.arguments(),
            Err(crate::Error::MissingOption { names }) if names == vec!["query".to_string()]
        ));
    }

    #[test]
    fn test_layout_and_page() {
        let search = Search::new("idx", "*").no_content().explain_score();
        let layout = search.layout();
        assert!(!layout.content && layout.scores && !layout.payloads);
        assert_eq!(search.page(), None);
        assert_eq!(search.limit(20, 5).page(), Some((20, 5)));
    }

    #[test]
    fn test_parse_response_without_client() {
        let reply = Reply::Array(vec![Reply::Int(1), "doc:1".into(), Reply::from(vec!["title", "hi"])]);
        let search = Search::new("idx", "hi");
        let response = search.parse_response(reply, None).unwrap();
        assert_eq!(response.total(), 1);
        assert_eq!(response.items()[0].get("title").as_deref(), Some("hi"));
    }
}
