// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Leaf option shapes.

use semver::Version;

use super::{Arg, CommandOption, OptionData};
use crate::version::Compatibility;

/// A bare value with no keyword (`idx`, the query text, a dictionary name).
#[derive(Debug, Clone, Default)]
pub struct PositionalOption {
    value: Option<Arg>,
    pub(crate) compatibility: Compatibility,
}

impl PositionalOption {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<Arg>) -> Self {
        Self {
            value: Some(value.into()),
            compatibility: Compatibility::any(),
        }
    }

    pub fn set(&mut self, value: Option<Arg>) {
        self.value = value;
    }

    pub fn value(&self) -> Option<&Arg> {
        self.value.as_ref()
    }
}

impl CommandOption for PositionalOption {
    fn compatibility(&self) -> &Compatibility {
        &self.compatibility
    }

    fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    fn option_data(&self) -> OptionData {
        self.value.clone().map_or(OptionData::Null, OptionData::Value)
    }

    fn tokens(&self, _version: Option<&Version>) -> Vec<Arg> {
        self.value.iter().cloned().collect()
    }
}

/// `KEYWORD value`
#[derive(Debug, Clone)]
pub struct NamedOption {
    keyword: &'static str,
    value: Option<Arg>,
    pub(crate) compatibility: Compatibility,
}

impl NamedOption {
    pub fn new(keyword: &'static str) -> Self {
        Self {
            keyword,
            value: None,
            compatibility: Compatibility::any(),
        }
    }

    pub fn with_value(keyword: &'static str, value: impl Into<Arg>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(keyword)
        }
    }

    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    pub fn set(&mut self, value: Option<Arg>) {
        self.value = value;
    }

    pub fn value(&self) -> Option<&Arg> {
        self.value.as_ref()
    }
}

impl CommandOption for NamedOption {
    fn compatibility(&self) -> &Compatibility {
        &self.compatibility
    }

    fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    fn option_data(&self) -> OptionData {
        self.value.clone().map_or(OptionData::Null, OptionData::Value)
    }

    fn tokens(&self, _version: Option<&Version>) -> Vec<Arg> {
        match &self.value {
            Some(value) => vec![Arg::from(self.keyword), value.clone()],
            None => Vec::new(),
        }
    }
}

/// `KEYWORD` when set, nothing otherwise. Always valid.
#[derive(Debug, Clone)]
pub struct FlagOption {
    keyword: &'static str,
    active: bool,
    pub(crate) compatibility: Compatibility,
}

impl FlagOption {
    pub fn new(keyword: &'static str, active: bool) -> Self {
        Self {
            keyword,
            active,
            compatibility: Compatibility::any(),
        }
    }

    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    pub fn set(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl CommandOption for FlagOption {
    fn compatibility(&self) -> &Compatibility {
        &self.compatibility
    }

    fn is_valid(&self) -> bool {
        true
    }

    fn option_data(&self) -> OptionData {
        OptionData::Flag(self.active)
    }

    fn tokens(&self, _version: Option<&Version>) -> Vec<Arg> {
        if self.active {
            vec![Arg::from(self.keyword)]
        } else {
            Vec::new()
        }
    }
}

/// `KEYWORD count item...`
///
/// Valid as soon as a list is present; an empty list renders `KEYWORD 0`.
/// Gated runs of items are appended only at compatible versions and the
/// count covers what is actually emitted.
#[derive(Debug, Clone)]
pub struct NumberedOption {
    keyword: &'static str,
    items: Option<Vec<Arg>>,
    gated: Vec<(Compatibility, Vec<Arg>)>,
    pub(crate) compatibility: Compatibility,
}

impl NumberedOption {
    pub fn new(keyword: &'static str) -> Self {
        Self {
            keyword,
            items: None,
            gated: Vec::new(),
            compatibility: Compatibility::any(),
        }
    }

    pub fn with_items<I, T>(keyword: &'static str, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Arg>,
    {
        Self {
            items: Some(items.into_iter().map(Into::into).collect()),
            ..Self::new(keyword)
        }
    }

    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    pub fn set(&mut self, items: Option<Vec<Arg>>) {
        self.items = items;
    }

    pub fn push(&mut self, item: Arg) {
        self.items.get_or_insert_with(Vec::new).push(item);
    }

    pub fn items(&self) -> Option<&[Arg]> {
        self.items.as_deref()
    }

    /// Appends items that render only when `compatibility` admits the target.
    pub fn gated<I, T>(mut self, compatibility: Compatibility, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Arg>,
    {
        self.items.get_or_insert_with(Vec::new);
        self.gated.push((compatibility, items.into_iter().map(Into::into).collect()));
        self
    }
}

impl CommandOption for NumberedOption {
    fn compatibility(&self) -> &Compatibility {
        &self.compatibility
    }

    fn is_valid(&self) -> bool {
        self.items.is_some()
    }

    fn option_data(&self) -> OptionData {
        self.items.clone().map_or(OptionData::Null, OptionData::List)
    }

    fn tokens(&self, version: Option<&Version>) -> Vec<Arg> {
        let Some(items) = &self.items else {
            return Vec::new();
        };
        let extra: Vec<&Arg> = self
            .gated
            .iter()
            .filter(|(compatibility, _)| compatibility.is_compatible(version))
            .flat_map(|(_, run)| run)
            .collect();
        let mut tokens = Vec::with_capacity(items.len() + extra.len() + 2);
        tokens.push(Arg::from(self.keyword));
        tokens.push(Arg::from(items.len() + extra.len()));
        tokens.extend(items.iter().cloned());
        tokens.extend(extra.into_iter().cloned());
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::strings;
    use crate::version::since;

    #[test]
    fn test_positional() {
        let mut option = PositionalOption::new();
        assert!(!option.is_valid());
        assert!(option.render(None).is_empty());
        option.set(Some("idx".into()));
        assert_eq!(strings(&option.render(None)), vec!["idx"]);
        assert_eq!(option.option_data(), OptionData::Value("idx".into()));
    }

    #[test]
    fn test_named() {
        let option = NamedOption::with_value("LANGUAGE", "french");
        assert_eq!(strings(&option.render(None)), vec!["LANGUAGE", "french"]);
        assert!(!NamedOption::new("LANGUAGE").is_valid());
    }

    #[test]
    fn test_flag() {
        let mut flag = FlagOption::new("NOCONTENT", false);
        assert!(flag.is_valid());
        assert!(flag.render(None).is_empty());
        flag.set(true);
        assert_eq!(strings(&flag.render(None)), vec!["NOCONTENT"]);
        assert_eq!(flag.option_data(), OptionData::Flag(true));
    }

    #[test]
    fn test_numbered_empty_list_is_valid() {
        let option = NumberedOption::with_items("STOPWORDS", Vec::<String>::new());
        assert!(option.is_valid());
        assert_eq!(strings(&option.render(None)), vec!["STOPWORDS", "0"]);
        assert!(!NumberedOption::new("STOPWORDS").is_valid());
    }

    #[test]
    fn test_numbered_counts_items() {
        let mut option = NumberedOption::new("INKEYS");
        option.push("doc:1".into());
        option.push("doc:2".into());
        assert_eq!(
            strings(&option.render(None)),
            vec!["INKEYS", "2", "doc:1", "doc:2"]
        );
    }

    #[test]
    fn test_numbered_gated_items_follow_version() {
        let option = NumberedOption::with_items("HNSW", ["M", "16"]).gated(since(2, 6, 0), ["EPSILON", "0.01"]);
        assert_eq!(
            strings(&option.render(Some(&Version::new(2, 4, 0)))),
            vec!["HNSW", "2", "M", "16"]
        );
        assert_eq!(
            strings(&option.render(Some(&Version::new(2, 6, 0)))),
            vec!["HNSW", "4", "M", "16", "EPSILON", "0.01"]
        );
        assert_eq!(option.render(None).len(), 6);
    }

    #[test]
    fn test_incompatible_renders_nothing() {
        let mut option = NamedOption::with_value("DIALECT", 2);
        option.compatibility = since(2, 4, 3);
        assert!(option.render(Some(&Version::new(2, 0, 0))).is_empty());
        assert_eq!(option.render(None).len(), 2);
    }
}
