// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Grouped options shared by the query commands (SEARCH, AGGREGATE, ...).
//!
//! ```text
//! LIMIT offset num
//! SORTBY field [ASC|DESC]
//! FILTER field min max
//! GEOFILTER field lon lat radius m|km|mi|ft
//! SUMMARIZE [FIELDS n f...] [FRAGS n] [LEN n] [SEPARATOR s]
//! HIGHLIGHT [FIELDS n f...] [TAGS open close]
//! PARAMS nargs name value ...
//! ```

use std::fmt;
use std::ops::Bound;
use std::str::FromStr;

use super::{Arg, GroupedOption, NumberedOption, OptionNode};
use crate::error::Error;

/// `LIMIT offset num`
pub fn limit(offset: usize, num: usize) -> GroupedOption {
    GroupedOption::new()
        .member("keyword", OptionNode::flag_on("LIMIT"))
        .member("offset", OptionNode::positional_value(offset))
        .member("num", OptionNode::positional_value(num))
        .require(&["offset", "num"])
        .lock(&["keyword"])
}

/// `(offset, num)` of a group built by [`limit`].
pub fn limit_of(node: &OptionNode) -> Option<(usize, usize)> {
    let group = node.as_grouped()?;
    let offset = group.value_of("offset")?.as_i64()?;
    let num = group.value_of("num")?.as_i64()?;
    Some((usize::try_from(offset).ok()?, usize::try_from(num).ok()?))
}

/// Sort direction for SORTBY clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(Error::invalid("sort direction", s)),
        }
    }
}

/// `SORTBY field [ASC|DESC]`
pub fn sort_by(field: impl Into<String>, direction: Option<SortDirection>) -> GroupedOption {
    let mut direction_node = OptionNode::positional();
    direction_node.set_value(direction.map(|d| Arg::from(d.to_string())));
    GroupedOption::new()
        .member("keyword", OptionNode::flag_on("SORTBY"))
        .member("field", OptionNode::positional_value(field.into()).not_empty())
        .member("direction", direction_node)
        .require(&["field"])
        .lock(&["keyword"])
}

/// Render a numeric range bound the way the engine reads it: `(` marks an
/// exclusive bound, unbounded sides become `-inf` / `+inf`.
pub fn range_bound(bound: Bound<f64>, lower: bool) -> String {
    match bound {
        Bound::Included(v) => Arg::from(v).to_string(),
        Bound::Excluded(v) => format!("({}", Arg::from(v)),
        Bound::Unbounded if lower => "-inf".to_string(),
        Bound::Unbounded => "+inf".to_string(),
    }
}

/// `FILTER field min max`
pub fn numeric_filter(field: impl Into<String>, min: Bound<f64>, max: Bound<f64>) -> GroupedOption {
    GroupedOption::new()
        .member("keyword", OptionNode::flag_on("FILTER"))
        .member("field", OptionNode::positional_value(field.into()).not_empty())
        .member("min", OptionNode::positional_value(range_bound(min, true)))
        .member("max", OptionNode::positional_value(range_bound(max, false)))
        .require(&["field", "min", "max"])
        .lock(&["keyword"])
}

/// Distance units accepted by GEOFILTER and geo facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoUnit {
    Meters,
    Kilometers,
    Miles,
    Feet,
}

impl GeoUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            GeoUnit::Meters => "m",
            GeoUnit::Kilometers => "km",
            GeoUnit::Miles => "mi",
            GeoUnit::Feet => "ft",
        }
    }
}

impl fmt::Display for GeoUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeoUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" => Ok(GeoUnit::Meters),
            "km" => Ok(GeoUnit::Kilometers),
            "mi" => Ok(GeoUnit::Miles),
            "ft" => Ok(GeoUnit::Feet),
            _ => Err(Error::invalid("distance unit", s)),
        }
    }
}

/// `GEOFILTER field lon lat radius unit`
pub fn geo_filter(
    field: impl Into<String>,
    lon: f64,
    lat: f64,
    radius: f64,
    unit: GeoUnit,
) -> GroupedOption {
    GroupedOption::new()
        .member("keyword", OptionNode::flag_on("GEOFILTER"))
        .member("field", OptionNode::positional_value(field.into()).not_empty())
        .member("lon", OptionNode::positional_value(lon))
        .member("lat", OptionNode::positional_value(lat))
        .member("radius", OptionNode::positional_value(radius))
        .member("unit", OptionNode::positional_value(unit.as_str()))
        .require(&["field", "lon", "lat", "radius", "unit"])
        .lock(&["keyword"])
}

/// `SUMMARIZE [FIELDS n f...] [FRAGS n] [LEN n] [SEPARATOR s]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summarize {
    pub fields: Vec<String>,
    pub frags: Option<u32>,
    pub len: Option<u32>,
    pub separator: Option<String>,
}

impl Summarize {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    #[must_use]
    pub fn frags(mut self, frags: u32) -> Self {
        self.frags = Some(frags);
        self
    }

    #[must_use]
    pub fn len(mut self, len: u32) -> Self {
        self.len = Some(len);
        self
    }

    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }
}

impl From<Summarize> for OptionNode {
    fn from(summarize: Summarize) -> Self {
        let mut frags = OptionNode::named("FRAGS");
        frags.set_value(summarize.frags.map(Arg::from));
        let mut len = OptionNode::named("LEN");
        len.set_value(summarize.len.map(Arg::from));
        let mut separator = OptionNode::named("SEPARATOR");
        separator.set_value(summarize.separator.map(Arg::from));

        GroupedOption::new()
            .member("keyword", OptionNode::flag_on("SUMMARIZE"))
            .member("fields", fields_node(summarize.fields))
            .member("frags", frags)
            .member("len", len)
            .member("separator", separator)
            .lock(&["keyword"])
            .into()
    }
}

/// `HIGHLIGHT [FIELDS n f...] [TAGS open close]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Highlight {
    pub fields: Vec<String>,
    pub tags: Option<(String, String)>,
}

impl Highlight {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    #[must_use]
    pub fn tags(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.tags = Some((open.into(), close.into()));
        self
    }
}

impl From<Highlight> for OptionNode {
    fn from(highlight: Highlight) -> Self {
        let (open, close) = match highlight.tags {
            Some((open, close)) => (Some(Arg::from(open)), Some(Arg::from(close))),
            None => (None, None),
        };
        let mut open_node = OptionNode::positional();
        open_node.set_value(open);
        let mut close_node = OptionNode::positional();
        close_node.set_value(close);
        let tags = GroupedOption::new()
            .member("keyword", OptionNode::flag_on("TAGS"))
            .member("open", open_node)
            .member("close", close_node)
            .require(&["open", "close"])
            .lock(&["keyword"]);

        GroupedOption::new()
            .member("keyword", OptionNode::flag_on("HIGHLIGHT"))
            .member("fields", fields_node(highlight.fields))
            .member("tags", tags.into())
            .lock(&["keyword"])
            .into()
    }
}

// FIELDS is omitted entirely when no field is listed.
fn fields_node(fields: Vec<String>) -> OptionNode {
    let mut node = OptionNode::numbered("FIELDS").not_empty();
    node.set_list(Some(fields.into_iter().map(Arg::from).collect()));
    node
}

/// One entry of a RETURN clause: `identifier [AS property]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnField {
    pub name: String,
    pub alias: Option<String>,
}

impl ReturnField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }
}

/// `RETURN count identifier [AS property] ...`
pub fn return_fields(fields: &[ReturnField]) -> NumberedOption {
    let mut option = NumberedOption::new("RETURN");
    let mut items = Vec::new();
    for field in fields {
        items.push(Arg::from(&field.name));
        if let Some(alias) = &field.alias {
            items.push(Arg::from("AS"));
            items.push(Arg::from(alias));
        }
    }
    option.set(Some(items));
    option
}

/// `PARAMS nargs name value ...`
pub fn params<K, V>(params: impl IntoIterator<Item = (K, V)>) -> NumberedOption
where
    K: Into<String>,
    V: Into<Arg>,
{
    let mut option = NumberedOption::new("PARAMS");
    let mut items = Vec::new();
    for (name, value) in params {
        items.push(Arg::from(name.into()));
        items.push(value.into());
    }
    option.set(Some(items));
    option
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::{strings, CommandOption};

    #[test]
    fn test_limit_roundtrip_values() {
        let node: OptionNode = limit(12, 10).into();
        assert_eq!(strings(&node.render(None)), vec!["LIMIT", "12", "10"]);
        assert_eq!(limit_of(&node), Some((12, 10)));
    }

    #[test]
    fn test_sort_by() {
        let node: OptionNode = sort_by("price", Some(SortDirection::Desc)).into();
        assert_eq!(strings(&node.render(None)), vec!["SORTBY", "price", "DESC"]);
        let node: OptionNode = sort_by("price", None).into();
        assert_eq!(strings(&node.render(None)), vec!["SORTBY", "price"]);
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_numeric_filter_bounds() {
        let node: OptionNode =
            numeric_filter("price", Bound::Excluded(10.0), Bound::Unbounded).into();
        assert_eq!(
            strings(&node.render(None)),
            vec!["FILTER", "price", "(10", "+inf"]
        );
    }

    #[test]
    fn test_geo_unit_parsing() {
        assert_eq!("KM".parse::<GeoUnit>().unwrap(), GeoUnit::Kilometers);
        assert!(matches!(
            "parsec".parse::<GeoUnit>(),
            Err(Error::InvalidValue { what: "distance unit", .. })
        ));
        let node: OptionNode = geo_filter("loc", 2.35, 48.85, 5.0, GeoUnit::Kilometers).into();
        assert_eq!(
            strings(&node.render(None)),
            vec!["GEOFILTER", "loc", "2.35", "48.85", "5", "km"]
        );
    }

    #[test]
    fn test_summarize() {
        let node: OptionNode = Summarize::new().frags(3).separator("...").into();
        assert_eq!(
            strings(&node.render(None)),
            vec!["SUMMARIZE", "FRAGS", "3", "SEPARATOR", "..."]
        );
        let node: OptionNode = Summarize::new().field("body").len(20).into();
        assert_eq!(
            strings(&node.render(None)),
            vec!["SUMMARIZE", "FIELDS", "1", "body", "LEN", "20"]
        );
    }

    #[test]
    fn test_highlight() {
        let node: OptionNode = Highlight::new().into();
        assert_eq!(strings(&node.render(None)), vec!["HIGHLIGHT"]);
        let node: OptionNode = Highlight::new().field("title").tags("<b>", "</b>").into();
        assert_eq!(
            strings(&node.render(None)),
            vec!["HIGHLIGHT", "FIELDS", "1", "title", "TAGS", "<b>", "</b>"]
        );
    }

    #[test]
    fn test_return_and_params() {
        let option = return_fields(&[ReturnField::new("title"), ReturnField::aliased("$.price", "price")]);
        assert_eq!(
            strings(&option.render(None)),
            vec!["RETURN", "4", "title", "$.price", "AS", "price"]
        );
        let option = params([("vec", "BLOB"), ("K", "10")]);
        assert_eq!(
            strings(&option.render(None)),
            vec!["PARAMS", "4", "vec", "BLOB", "K", "10"]
        );
    }
}
