// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Field-restricted clauses: `@field:inner`, or `@a|b:inner` over several
//! fields.

use std::ops::Bound;

use super::{Encapsulation, Escaper, QueryElement, QueryNode};
use crate::error::{Error, Result};
use crate::option::search::{range_bound, GeoUnit};
use crate::option::Arg;

fn collect_fields<I, S>(fields: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
    if fields.is_empty() {
        return Err(Error::NotEnoughFields);
    }
    Ok(fields)
}

fn field_prefix(fields: &[String], escaper: &dyn Escaper) -> String {
    let names: Vec<String> = fields.iter().map(|field| escaper.word(field)).collect();
    format!("@{}:", names.join("|"))
}

/// `@field:(inner)` over an arbitrary child.
///
/// ```
/// use redisearch_protocol::query::{ExactMatch, FieldFacet, QueryNode};
///
/// let facet = FieldFacet::new(["title", "body"], ExactMatch::new("hello world")).unwrap();
/// assert_eq!(QueryNode::from(facet).to_string(), "@title|body:\"hello world\"");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFacet {
    fields: Vec<String>,
    inner: Encapsulation,
}

impl FieldFacet {
    pub fn new<I, S>(fields: I, child: impl Into<QueryNode>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            fields: collect_fields(fields)?,
            inner: Encapsulation::parentheses(child),
        })
    }

    /// Single-field facet.
    pub fn on(field: impl Into<String>, child: impl Into<QueryNode>) -> Self {
        Self {
            fields: vec![field.into()],
            inner: Encapsulation::parentheses(child),
        }
    }
}

impl QueryElement for FieldFacet {
    fn render(&self, escaper: &dyn Escaper) -> String {
        format!("{}{}", field_prefix(&self.fields, escaper), self.inner.render(escaper))
    }
}

/// `@field:{a|b}`, matching any of the tags.
#[derive(Debug, Clone, PartialEq)]
pub struct TagFacet {
    fields: Vec<String>,
    tags: Vec<String>,
}

impl TagFacet {
    pub fn new<F, FS, T, TS>(fields: F, tags: T) -> Result<Self>
    where
        F: IntoIterator<Item = FS>,
        FS: Into<String>,
        T: IntoIterator<Item = TS>,
        TS: Into<String>,
    {
        let fields = collect_fields(fields)?;
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        if tags.is_empty() {
            return Err(Error::NotEnoughTerms);
        }
        Ok(Self { fields, tags })
    }
}

impl QueryElement for TagFacet {
    fn render(&self, escaper: &dyn Escaper) -> String {
        let tags: Vec<String> = self.tags.iter().map(|tag| escaper.word(tag)).collect();
        format!("{}{{{}}}", field_prefix(&self.fields, escaper), tags.join("|"))
    }
}

/// `@field:[min max]`; `(` marks an exclusive bound.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericFacet {
    fields: Vec<String>,
    min: Bound<f64>,
    max: Bound<f64>,
}

impl NumericFacet {
    pub fn new<I, S>(fields: I, min: Bound<f64>, max: Bound<f64>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            fields: collect_fields(fields)?,
            min,
            max,
        })
    }

    /// Single-field range.
    pub fn range(field: impl Into<String>, min: Bound<f64>, max: Bound<f64>) -> Self {
        Self {
            fields: vec![field.into()],
            min,
            max,
        }
    }

    pub fn equals_to(field: impl Into<String>, value: f64) -> Self {
        Self::range(field, Bound::Included(value), Bound::Included(value))
    }

    pub fn greater_than(field: impl Into<String>, value: f64) -> Self {
        Self::range(field, Bound::Excluded(value), Bound::Unbounded)
    }

    pub fn greater_than_or_equal_to(field: impl Into<String>, value: f64) -> Self {
        Self::range(field, Bound::Included(value), Bound::Unbounded)
    }

    pub fn less_than(field: impl Into<String>, value: f64) -> Self {
        Self::range(field, Bound::Unbounded, Bound::Excluded(value))
    }

    pub fn less_than_or_equal_to(field: impl Into<String>, value: f64) -> Self {
        Self::range(field, Bound::Unbounded, Bound::Included(value))
    }

    /// Inclusive on both ends.
    pub fn between(field: impl Into<String>, min: f64, max: f64) -> Self {
        Self::range(field, Bound::Included(min), Bound::Included(max))
    }
}

impl QueryElement for NumericFacet {
    fn render(&self, escaper: &dyn Escaper) -> String {
        format!(
            "{}[{} {}]",
            field_prefix(&self.fields, escaper),
            range_bound(self.min, true),
            range_bound(self.max, false)
        )
    }
}

/// `@field:[lon lat radius unit]`
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFacet {
    fields: Vec<String>,
    lon: f64,
    lat: f64,
    radius: f64,
    unit: GeoUnit,
}

impl GeoFacet {
    pub fn new<I, S>(fields: I, lon: f64, lat: f64, radius: f64, unit: GeoUnit) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            fields: collect_fields(fields)?,
            lon,
            lat,
            radius,
            unit,
        })
    }
}

impl QueryElement for GeoFacet {
    fn render(&self, escaper: &dyn Escaper) -> String {
        format!(
            "{}[{} {} {} {}]",
            field_prefix(&self.fields, escaper),
            Arg::from(self.lon),
            Arg::from(self.lat),
            Arg::from(self.radius),
            self.unit
        )
    }
}
