// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Pipeline steps of FT.AGGREGATE.
//!
//! ```text
//! LOAD n @field ... | LOAD *
//! GROUPBY n @prop ... [REDUCE fn nargs arg ... [AS name]] ...
//! SORTBY n @prop ASC|DESC ... [MAX n]
//! APPLY expr AS name
//! FILTER expr
//! WITHCURSOR [COUNT n] [MAXIDLE ms]
//! ```
//!
//! Property names are given with or without the leading `@`; it is added
//! where the engine requires it.

use std::fmt;
use std::str::FromStr;

use super::search::SortDirection;
use super::{Arg, GroupedOption, NumberedOption, OptionList, OptionNode};
use crate::error::Error;
use crate::version::since;

fn property(name: &str) -> String {
    if name.starts_with('@') {
        name.to_string()
    } else {
        format!("@{}", name)
    }
}

/// `LOAD count @field ...`
pub fn load<I, S>(fields: I) -> NumberedOption
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    NumberedOption::with_items("LOAD", fields.into_iter().map(|f| property(f.as_ref())))
}

/// `LOAD *`
pub fn load_all() -> OptionNode {
    GroupedOption::new()
        .member("keyword", OptionNode::flag_on("LOAD"))
        .member("all", OptionNode::positional_value("*"))
        .lock(&["keyword", "all"])
        .since(since(2, 0, 13))
        .into()
}

/// Reducer functions usable inside GROUPBY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceFunction {
    Count,
    CountDistinct,
    CountDistinctish,
    Sum,
    Min,
    Max,
    Avg,
    StdDev,
    Quantile,
    ToList,
    FirstValue,
    RandomSample,
}

impl ReduceFunction {
    pub fn as_str(self) -> &'static str {
        match self {
            ReduceFunction::Count => "COUNT",
            ReduceFunction::CountDistinct => "COUNT_DISTINCT",
            ReduceFunction::CountDistinctish => "COUNT_DISTINCTISH",
            ReduceFunction::Sum => "SUM",
            ReduceFunction::Min => "MIN",
            ReduceFunction::Max => "MAX",
            ReduceFunction::Avg => "AVG",
            ReduceFunction::StdDev => "STDDEV",
            ReduceFunction::Quantile => "QUANTILE",
            ReduceFunction::ToList => "TOLIST",
            ReduceFunction::FirstValue => "FIRST_VALUE",
            ReduceFunction::RandomSample => "RANDOM_SAMPLE",
        }
    }
}

impl fmt::Display for ReduceFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReduceFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        [
            ReduceFunction::Count,
            ReduceFunction::CountDistinct,
            ReduceFunction::CountDistinctish,
            ReduceFunction::Sum,
            ReduceFunction::Min,
            ReduceFunction::Max,
            ReduceFunction::Avg,
            ReduceFunction::StdDev,
            ReduceFunction::Quantile,
            ReduceFunction::ToList,
            ReduceFunction::FirstValue,
            ReduceFunction::RandomSample,
        ]
        .into_iter()
        .find(|f| f.as_str() == upper)
        .ok_or_else(|| Error::invalid("reduce function", s))
    }
}

/// `REDUCE function nargs arg ... [AS name]`
#[derive(Debug, Clone, PartialEq)]
pub struct Reducer {
    pub function: ReduceFunction,
    pub args: Vec<Arg>,
    pub alias: Option<String>,
}

impl Reducer {
    pub fn new(function: ReduceFunction, args: Vec<Arg>) -> Self {
        Self {
            function,
            args,
            alias: None,
        }
    }

    pub fn count() -> Self {
        Self::new(ReduceFunction::Count, Vec::new())
    }

    pub fn count_distinct(prop: &str) -> Self {
        Self::new(ReduceFunction::CountDistinct, vec![property(prop).into()])
    }

    pub fn sum(prop: &str) -> Self {
        Self::new(ReduceFunction::Sum, vec![property(prop).into()])
    }

    pub fn min(prop: &str) -> Self {
        Self::new(ReduceFunction::Min, vec![property(prop).into()])
    }

    pub fn max(prop: &str) -> Self {
        Self::new(ReduceFunction::Max, vec![property(prop).into()])
    }

    pub fn avg(prop: &str) -> Self {
        Self::new(ReduceFunction::Avg, vec![property(prop).into()])
    }

    pub fn to_list(prop: &str) -> Self {
        Self::new(ReduceFunction::ToList, vec![property(prop).into()])
    }

    /// `QUANTILE @prop q`; `q` must lie in `0..=1`.
    pub fn quantile(prop: &str, quantile: f64) -> Result<Self, Error> {
        if !(0.0..=1.0).contains(&quantile) {
            return Err(Error::OutOfRange {
                what: "quantile",
                value: quantile.to_string(),
            });
        }
        Ok(Self::new(
            ReduceFunction::Quantile,
            vec![property(prop).into(), quantile.into()],
        ))
    }

    /// `FIRST_VALUE @prop [BY @other [ASC|DESC]]`
    pub fn first_value(prop: &str, by: Option<(&str, Option<SortDirection>)>) -> Self {
        let mut args: Vec<Arg> = vec![property(prop).into()];
        if let Some((other, direction)) = by {
            args.push("BY".into());
            args.push(property(other).into());
            if let Some(direction) = direction {
                args.push(direction.to_string().into());
            }
        }
        Self::new(ReduceFunction::FirstValue, args)
    }

    /// `RANDOM_SAMPLE @prop size`
    pub fn random_sample(prop: &str, size: u32) -> Self {
        Self::new(
            ReduceFunction::RandomSample,
            vec![property(prop).into(), size.into()],
        )
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl From<Reducer> for OptionNode {
    fn from(reducer: Reducer) -> Self {
        // The argument count has no keyword of its own.
        let mut args = OptionList::new().with(OptionNode::positional_value(reducer.args.len()));
        for arg in reducer.args {
            args.push(OptionNode::positional_value(arg));
        }
        let mut alias = OptionNode::named("AS");
        alias.set_value(reducer.alias.map(Arg::from));
        GroupedOption::new()
            .member("keyword", OptionNode::flag_on("REDUCE"))
            .member("function", OptionNode::positional_value(reducer.function.as_str()))
            .member("args", args.into())
            .member("alias", alias)
            .require(&["function", "args"])
            .lock(&["keyword", "function"])
            .into()
    }
}

/// `GROUPBY nargs @prop ... REDUCE ...`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupBy {
    pub properties: Vec<String>,
    pub reducers: Vec<Reducer>,
}

impl GroupBy {
    pub fn new<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            properties: properties.into_iter().map(|p| property(p.as_ref())).collect(),
            reducers: Vec::new(),
        }
    }

    #[must_use]
    pub fn reduce(mut self, reducer: Reducer) -> Self {
        self.reducers.push(reducer);
        self
    }
}

impl From<GroupBy> for OptionNode {
    fn from(group_by: GroupBy) -> Self {
        let mut reducers = OptionList::new();
        for reducer in group_by.reducers {
            reducers.push(OptionNode::from(reducer));
        }
        GroupedOption::new()
            .member(
                "properties",
                NumberedOption::with_items("GROUPBY", group_by.properties).into(),
            )
            .member("reducers", reducers.into())
            .require(&["properties"])
            .lock(&["properties"])
            .into()
    }
}

/// `SORTBY nargs @prop [ASC|DESC] ... [MAX n]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateSortBy {
    pub keys: Vec<(String, Option<SortDirection>)>,
    pub max: Option<u32>,
}

impl AggregateSortBy {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn key(mut self, prop: &str, direction: Option<SortDirection>) -> Self {
        self.keys.push((property(prop), direction));
        self
    }

    #[must_use]
    pub fn max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }
}

impl From<AggregateSortBy> for OptionNode {
    fn from(sort_by: AggregateSortBy) -> Self {
        let mut items: Vec<Arg> = Vec::new();
        for (prop, direction) in sort_by.keys {
            items.push(prop.into());
            if let Some(direction) = direction {
                items.push(direction.to_string().into());
            }
        }
        let mut max = OptionNode::named("MAX");
        max.set_value(sort_by.max.map(Arg::from));
        GroupedOption::new()
            .member("keys", OptionNode::Numbered(NumberedOption::with_items("SORTBY", items)).not_empty())
            .member("max", max)
            .require(&["keys"])
            .into()
    }
}

/// `APPLY expression AS name`
pub fn apply(expression: impl Into<String>, alias: impl Into<String>) -> GroupedOption {
    GroupedOption::new()
        .member("keyword", OptionNode::flag_on("APPLY"))
        .member("expression", OptionNode::positional_value(expression.into()).not_empty())
        .member("alias", OptionNode::named_value("AS", alias.into()).not_empty())
        .require(&["expression", "alias"])
        .lock(&["keyword"])
}

/// `FILTER expression`
pub fn filter(expression: impl Into<String>) -> OptionNode {
    OptionNode::named_value("FILTER", expression.into()).not_empty()
}

/// `WITHCURSOR [COUNT read_size] [MAXIDLE idle_ms]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WithCursor {
    pub count: Option<u32>,
    pub max_idle: Option<u64>,
}

impl WithCursor {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn max_idle(mut self, max_idle_ms: u64) -> Self {
        self.max_idle = Some(max_idle_ms);
        self
    }
}

impl From<WithCursor> for OptionNode {
    fn from(cursor: WithCursor) -> Self {
        let mut count = OptionNode::named("COUNT");
        count.set_value(cursor.count.map(Arg::from));
        let mut max_idle = OptionNode::named("MAXIDLE");
        max_idle.set_value(cursor.max_idle.map(Arg::from));
        GroupedOption::new()
            .member("keyword", OptionNode::flag_on("WITHCURSOR"))
            .member("count", count)
            .member("max_idle", max_idle)
            .lock(&["keyword"])
            .into()
    }
}

/// COUNT of a group built from [`WithCursor`], if any.
pub fn cursor_count_of(node: &OptionNode) -> Option<usize> {
    let value = node.as_grouped()?.value_of("count")?.as_i64()?;
    usize::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::{strings, CommandOption};
    use semver::Version;

    #[test]
    fn test_load() {
        let option = load(["title", "@price"]);
        assert_eq!(
            strings(&option.render(None)),
            vec!["LOAD", "2", "@title", "@price"]
        );
        assert_eq!(strings(&load_all().render(None)), vec!["LOAD", "*"]);
        assert!(load_all().render(Some(&Version::new(2, 0, 0))).is_empty());
    }

    #[test]
    fn test_group_by_with_reducers() {
        let node: OptionNode = GroupBy::new(["brand"])
            .reduce(Reducer::count().alias("total"))
            .reduce(Reducer::quantile("price", 0.5).unwrap())
            .into();
        assert_eq!(
            strings(&node.render(None)),
            vec![
                "GROUPBY", "1", "@brand", "REDUCE", "COUNT", "0", "AS", "total", "REDUCE",
                "QUANTILE", "2", "@price", "0.5"
            ]
        );
    }

    #[test]
    fn test_group_by_without_reducers() {
        let node: OptionNode = GroupBy::new(["@a", "b"]).into();
        assert_eq!(strings(&node.render(None)), vec!["GROUPBY", "2", "@a", "@b"]);
    }

    #[test]
    fn test_first_value_reducer() {
        let node: OptionNode = Reducer::first_value("title", Some(("price", Some(SortDirection::Desc))))
            .alias("top")
            .into();
        assert_eq!(
            strings(&node.render(None)),
            vec!["REDUCE", "FIRST_VALUE", "4", "@title", "BY", "@price", "DESC", "AS", "top"]
        );
    }

    #[test]
    fn test_quantile_out_of_range() {
        assert!(matches!(
            Reducer::quantile("price", 1.5),
            Err(Error::OutOfRange { what: "quantile", .. })
        ));
        assert_eq!("count_distinct".parse::<ReduceFunction>().unwrap(), ReduceFunction::CountDistinct);
        assert!("median".parse::<ReduceFunction>().is_err());
    }

    #[test]
    fn test_sort_by() {
        let node: OptionNode = AggregateSortBy::new()
            .key("price", Some(SortDirection::Desc))
            .key("title", None)
            .max(10)
            .into();
        assert_eq!(
            strings(&node.render(None)),
            vec!["SORTBY", "3", "@price", "DESC", "@title", "MAX", "10"]
        );
        let empty: OptionNode = AggregateSortBy::new().max(5).into();
        assert!(empty.render(None).is_empty());
    }

    #[test]
    fn test_apply_and_filter() {
        let node: OptionNode = apply("upper(@name)", "name_upper").into();
        assert_eq!(
            strings(&node.render(None)),
            vec!["APPLY", "upper(@name)", "AS", "name_upper"]
        );
        assert_eq!(
            strings(&filter("@price > 10").render(None)),
            vec!["FILTER", "@price > 10"]
        );
        assert!(filter("").render(None).is_empty());
    }

    #[test]
    fn test_with_cursor() {
        let node: OptionNode = WithCursor::new().count(50).max_idle(1000).into();
        assert_eq!(
            strings(&node.render(None)),
            vec!["WITHCURSOR", "COUNT", "50", "MAXIDLE", "1000"]
        );
        assert_eq!(cursor_count_of(&node), Some(50));
        let node: OptionNode = WithCursor::new().into();
        assert_eq!(strings(&node.render(None)), vec!["WITHCURSOR"]);
        assert_eq!(cursor_count_of(&node), None);
    }
}
