// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Decorators that tighten the validity of a wrapped option.

use std::fmt;
use std::sync::Arc;

use semver::Version;

use super::{Arg, CommandOption, OptionData, OptionNode};
use crate::version::Compatibility;

/// Rejects empty values: an empty string, an empty counted list, or an
/// inactive flag.
#[derive(Debug, Clone)]
pub struct NotEmptyOption {
    inner: Box<OptionNode>,
}

impl NotEmptyOption {
    pub fn new(inner: OptionNode) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    pub fn inner(&self) -> &OptionNode {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut OptionNode {
        &mut self.inner
    }
}

fn is_empty_data(data: &OptionData) -> bool {
    match data {
        OptionData::Null => true,
        OptionData::Value(arg) => arg.is_empty(),
        OptionData::Flag(active) => !active,
        OptionData::List(items) => items.is_empty(),
        OptionData::Group(members) => members.is_empty(),
        OptionData::Items(items) => items.is_empty(),
    }
}

impl CommandOption for NotEmptyOption {
    fn compatibility(&self) -> &Compatibility {
        self.inner.compatibility()
    }

    fn is_valid(&self) -> bool {
        self.inner.is_valid() && !is_empty_data(&self.inner.option_data())
    }

    fn is_valid_at(&self, version: Option<&Version>) -> bool {
        self.inner.is_valid_at(version) && !is_empty_data(&self.inner.option_data())
    }

    fn option_data(&self) -> OptionData {
        self.inner.option_data()
    }

    fn tokens(&self, version: Option<&Version>) -> Vec<Arg> {
        self.inner.tokens(version)
    }
}

/// Named predicate over [`OptionData`].
#[derive(Clone)]
pub struct Validator {
    description: &'static str,
    check: Arc<dyn Fn(&OptionData) -> bool + Send + Sync>,
}

impl Validator {
    pub fn new<F>(description: &'static str, check: F) -> Self
    where
        F: Fn(&OptionData) -> bool + Send + Sync + 'static,
    {
        Self {
            description,
            check: Arc::new(check),
        }
    }

    /// Scalar must equal one of `allowed` (case-insensitive).
    pub fn one_of(description: &'static str, allowed: &'static [&'static str]) -> Self {
        Self::new(description, move |data| match data.as_arg() {
            Some(Arg::Str(value)) => allowed.iter().any(|a| a.eq_ignore_ascii_case(value)),
            _ => false,
        })
    }

    /// Integer scalar within `min..=max`.
    pub fn int_range(description: &'static str, min: i64, max: i64) -> Self {
        Self::new(description, move |data| {
            data.as_arg()
                .and_then(Arg::as_i64)
                .is_some_and(|v| (min..=max).contains(&v))
        })
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn check(&self, data: &OptionData) -> bool {
        (self.check)(data)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Invalid whenever the predicate rejects the wrapped option's data.
#[derive(Debug, Clone)]
pub struct CustomValidatorOption {
    inner: Box<OptionNode>,
    validator: Validator,
}

impl CustomValidatorOption {
    pub fn new(inner: OptionNode, validator: Validator) -> Self {
        Self {
            inner: Box::new(inner),
            validator,
        }
    }

    pub fn inner(&self) -> &OptionNode {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut OptionNode {
        &mut self.inner
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }
}

impl CommandOption for CustomValidatorOption {
    fn compatibility(&self) -> &Compatibility {
        self.inner.compatibility()
    }

    fn is_valid(&self) -> bool {
        self.inner.is_valid() && self.validator.check(&self.inner.option_data())
    }

    fn is_valid_at(&self, version: Option<&Version>) -> bool {
        self.inner.is_valid_at(version) && self.validator.check(&self.inner.option_data())
    }

    fn option_data(&self) -> OptionData {
        self.inner.option_data()
    }

    fn tokens(&self, version: Option<&Version>) -> Vec<Arg> {
        self.inner.tokens(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::strings;

    #[test]
    fn test_not_empty_positional() {
        let mut node = OptionNode::positional().not_empty();
        assert!(!node.is_valid());
        node.set_value(Some("".into()));
        assert!(!node.is_valid());
        node.set_value(Some("idx".into()));
        assert!(node.is_valid());
        assert_eq!(strings(&node.render(None)), vec!["idx"]);
    }

    #[test]
    fn test_not_empty_numbered_and_flag() {
        let mut list = OptionNode::numbered("PREFIX").not_empty();
        list.set_list(Some(Vec::new()));
        assert!(!list.is_valid());
        list.push("doc:".into());
        assert_eq!(strings(&list.render(None)), vec!["PREFIX", "1", "doc:"]);

        let mut flag = OptionNode::flag("SCHEMA").not_empty();
        assert!(!flag.is_valid());
        flag.set_flag(true);
        assert!(flag.is_valid());
    }

    #[test]
    fn test_validator_rejects_independently() {
        let mut node = OptionNode::named("ON").validated(Validator::one_of("structure", &["HASH", "JSON"]));
        node.set_value(Some("XML".into()));
        assert!(!node.is_valid());
        assert!(node.render(None).is_empty());
        node.set_value(Some("json".into()));
        assert!(node.is_valid());
        assert_eq!(strings(&node.render(None)), vec!["ON", "json"]);
    }

    #[test]
    fn test_int_range_validator() {
        let mut node = OptionNode::named("DISTANCE").validated(Validator::int_range("distance", 1, 4));
        node.set_value(Some(5.into()));
        assert!(!node.is_valid());
        node.set_value(Some(4.into()));
        assert!(node.is_valid());
        assert_eq!(
            format!("{:?}", Validator::int_range("distance", 1, 4)),
            "Validator { description: \"distance\", .. }"
        );
    }
}
