// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Composite options: named records and appendable lists.

use semver::Version;

use super::{Arg, CommandOption, OptionData, OptionNode};
use crate::error::{Error, Result};
use crate::version::Compatibility;

/// A named record of options rendered in declaration order.
///
/// - **required**: the group is invalid while any of these is absent or invalid
/// - **locked**: members that cannot be replaced or mutated once declared
///   (e.g. the `TEXT` keyword of a text field definition)
///
/// ```
/// use redisearch_protocol::option::{CommandOption, GroupedOption, OptionNode};
///
/// let mut limit = GroupedOption::new()
///     .member("keyword", OptionNode::flag_on("LIMIT"))
///     .member("offset", OptionNode::positional())
///     .member("num", OptionNode::positional())
///     .require(&["offset", "num"])
///     .lock(&["keyword"]);
///
/// assert!(!limit.is_valid());
/// limit.set_value("offset", Some(0.into())).unwrap();
/// limit.set_value("num", Some(10.into())).unwrap();
/// assert_eq!(limit.render(None).len(), 3);
/// assert!(limit.set_flag("keyword", false).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GroupedOption {
    members: Vec<(&'static str, OptionNode)>,
    required: Vec<&'static str>,
    locked: Vec<&'static str>,
    pub(crate) compatibility: Compatibility,
}

impl GroupedOption {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or redeclare) a member.
    #[must_use]
    pub fn member(mut self, name: &'static str, node: OptionNode) -> Self {
        match self.members.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = node,
            None => self.members.push((name, node)),
        }
        self
    }

    #[must_use]
    pub fn require(mut self, names: &[&'static str]) -> Self {
        self.required.extend_from_slice(names);
        self
    }

    #[must_use]
    pub fn lock(mut self, names: &[&'static str]) -> Self {
        self.locked.extend_from_slice(names);
        self
    }

    #[must_use]
    pub fn since(mut self, compatibility: Compatibility) -> Self {
        self.compatibility = compatibility;
        self
    }

    pub fn get(&self, name: &str) -> Option<&OptionNode> {
        self.members.iter().find(|(n, _)| *n == name).map(|(_, node)| node)
    }

    pub fn is_locked(&self, name: &str) -> bool {
        self.locked.iter().any(|l| *l == name)
    }

    pub fn members(&self) -> impl Iterator<Item = (&'static str, &OptionNode)> {
        self.members.iter().map(|(name, node)| (*name, node))
    }

    /// Mutable access to an unlocked member.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut OptionNode> {
        if self.is_locked(name) {
            return Err(Error::LockedOption {
                name: name.to_string(),
            });
        }
        self.members
            .iter_mut()
            .find(|(n, _)| *n == name)
            .map(|(_, node)| node)
            .ok_or_else(|| Error::UnknownOption {
                name: name.to_string(),
            })
    }

    /// Replace an unlocked member.
    pub fn replace(&mut self, name: &str, node: OptionNode) -> Result<()> {
        *self.get_mut(name)? = node;
        Ok(())
    }

    pub fn set_value(&mut self, name: &str, value: Option<Arg>) -> Result<()> {
        let member = self.get_mut(name)?;
        shape_checked(name, member.set_value(value))
    }

    pub fn set_flag(&mut self, name: &str, active: bool) -> Result<()> {
        let member = self.get_mut(name)?;
        shape_checked(name, member.set_flag(active))
    }

    pub fn set_list(&mut self, name: &str, items: Option<Vec<Arg>>) -> Result<()> {
        let member = self.get_mut(name)?;
        shape_checked(name, member.set_list(items))
    }

    pub fn push(&mut self, name: &str, item: Arg) -> Result<()> {
        let member = self.get_mut(name)?;
        shape_checked(name, member.push(item))
    }

    /// Names of required members that are absent or invalid at `version`.
    pub fn missing(&self, version: Option<&Version>) -> Vec<&'static str> {
        self.required
            .iter()
            .copied()
            .filter(|name| !self.get(name).is_some_and(|node| node.is_valid_at(version)))
            .collect()
    }

    /// Scalar member value, if set.
    pub fn value_of(&self, name: &str) -> Option<Arg> {
        self.get(name).and_then(|node| node.option_data().as_arg().cloned())
    }
}

fn shape_checked(name: &str, applied: bool) -> Result<()> {
    if applied {
        Ok(())
    } else {
        Err(Error::invalid("option shape", name))
    }
}

impl CommandOption for GroupedOption {
    fn compatibility(&self) -> &Compatibility {
        &self.compatibility
    }

    fn is_valid(&self) -> bool {
        self.missing(None).is_empty()
    }

    fn is_valid_at(&self, version: Option<&Version>) -> bool {
        self.is_compatible(version) && self.missing(version).is_empty()
    }

    fn option_data(&self) -> OptionData {
        OptionData::Group(
            self.members
                .iter()
                .map(|(name, node)| (name.to_string(), node.option_data()))
                .collect(),
        )
    }

    // Members are rendered with the group's target version.
    fn tokens(&self, version: Option<&Version>) -> Vec<Arg> {
        super::render_all(self.members.iter().map(|(_, node)| node), version)
    }
}

/// An ordered, appendable sequence of arbitrary options.
///
/// Valid while at least one member is valid.
#[derive(Debug, Clone, Default)]
pub struct OptionList {
    items: Vec<OptionNode>,
    pub(crate) compatibility: Compatibility,
}

impl OptionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: impl Into<OptionNode>) {
        self.items.push(node.into());
    }

    #[must_use]
    pub fn with(mut self, node: impl Into<OptionNode>) -> Self {
        self.push(node);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionNode> {
        self.items.iter()
    }
}

impl CommandOption for OptionList {
    fn compatibility(&self) -> &Compatibility {
        &self.compatibility
    }

    fn is_valid(&self) -> bool {
        self.items.iter().any(CommandOption::is_valid)
    }

    fn is_valid_at(&self, version: Option<&Version>) -> bool {
        self.is_compatible(version) && self.items.iter().any(|item| item.is_valid_at(version))
    }

    fn option_data(&self) -> OptionData {
        OptionData::Items(self.items.iter().map(CommandOption::option_data).collect())
    }

    fn tokens(&self, version: Option<&Version>) -> Vec<Arg> {
        super::render_all(&self.items, version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::strings;
    use crate::version::since;

    fn text_field(name: &str) -> GroupedOption {
        GroupedOption::new()
            .member("name", OptionNode::positional_value(name))
            .member("type", OptionNode::flag_on("TEXT"))
            .member("nostem", OptionNode::flag("NOSTEM"))
            .member("suffix", OptionNode::flag_on("WITHSUFFIXTRIE").since(since(2, 4, 0)))
            .require(&["name"])
            .lock(&["type"])
    }

    #[test]
    fn test_flags_render_keyword_only() {
        let field = text_field("title");
        assert_eq!(
            strings(&field.render(None)),
            vec!["title", "TEXT", "WITHSUFFIXTRIE"]
        );
    }

    #[test]
    fn test_version_propagates_to_members() {
        let field = text_field("title");
        assert_eq!(
            strings(&field.render(Some(&Version::new(2, 2, 0)))),
            vec!["title", "TEXT"]
        );
    }

    #[test]
    fn test_missing_required_member() {
        let mut group = GroupedOption::new()
            .member("offset", OptionNode::positional())
            .member("num", OptionNode::positional())
            .require(&["offset", "num"]);
        assert_eq!(group.missing(None), vec!["offset", "num"]);
        assert!(group.render(None).is_empty());

        group.set_value("offset", Some(0.into())).unwrap();
        assert_eq!(group.missing(None), vec!["num"]);
        group.set_value("num", Some(10.into())).unwrap();
        assert!(group.is_valid());
    }

    #[test]
    fn test_required_member_incompatible() {
        let group = GroupedOption::new()
            .member("dialect", OptionNode::named_value("DIALECT", 2).since(since(2, 4, 3)))
            .require(&["dialect"]);
        assert!(group.is_valid_at(Some(&Version::new(2, 4, 3))));
        assert!(!group.is_valid_at(Some(&Version::new(2, 2, 0))));
    }

    #[test]
    fn test_locked_member() {
        let mut field = text_field("title");
        assert_eq!(
            field.set_flag("type", false),
            Err(Error::LockedOption { name: "type".into() })
        );
        assert!(field.replace("type", OptionNode::flag_on("TAG")).is_err());
        field.set_flag("nostem", true).unwrap();
        assert!(strings(&field.render(None)).contains(&"NOSTEM".to_string()));
    }

    #[test]
    fn test_unknown_and_wrong_shape() {
        let mut field = text_field("title");
        assert!(matches!(field.set_flag("weight", true), Err(Error::UnknownOption { .. })));
        assert!(matches!(field.set_value("nostem", Some("x".into())), Err(Error::InvalidValue { .. })));
    }

    #[test]
    fn test_option_list() {
        let mut list = OptionList::new();
        assert!(!list.is_valid());
        list.push(text_field("title"));
        list.push(OptionNode::named("WEIGHT"));
        list.push(text_field("body"));
        assert_eq!(
            strings(&list.render(Some(&Version::new(2, 0, 0)))),
            vec!["title", "TEXT", "body", "TEXT"]
        );
        assert_eq!(list.len(), 3);
    }
}
