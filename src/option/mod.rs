// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Option composition engine.
//!
//! An option is any node that can say whether it is compatible with a
//! protocol version, whether it currently holds something worth sending,
//! and which flat tokens it contributes to a command line.
//!
//! # Shapes
//!
//! ```text
//! Positional      value                       idx
//! Named           KEYWORD value               LANGUAGE english
//! Flag            KEYWORD (when set)          WITHSCORES
//! Numbered        KEYWORD count items...      INKEYS 2 doc:1 doc:2
//! NotEmpty        wraps any option, rejects empty values
//! Validated       wraps any option, rejects values failing a predicate
//! Grouped         named record of options     LIMIT 0 10
//! List            appendable sequence         SCHEMA title TEXT body TEXT
//! ```
//!
//! [`CommandOption`] is the capability; [`OptionNode`] is the closed set of
//! shapes a command or group can own.

mod basic;
mod decorated;
mod grouped;
pub mod aggregate;
pub mod schema;
pub mod search;

pub use basic::{FlagOption, NamedOption, NumberedOption, PositionalOption};
pub use decorated::{CustomValidatorOption, NotEmptyOption, Validator};
pub use grouped::{GroupedOption, OptionList};

use std::fmt;

use semver::Version;

use crate::version::Compatibility;

/// One token of a command line.
///
/// There is deliberately no boolean variant: flags contribute their keyword
/// or nothing at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Str(String),
    Int(i64),
    Float(f64),
    /// Raw bytes, e.g. a vector blob bound through PARAMS.
    Bytes(Vec<u8>),
}

impl Arg {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Arg::Int(i) => Some(*i),
            Arg::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Arg::Str(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Empty string or blob: the only scalars considered "empty" by [`NotEmptyOption`].
    pub fn is_empty(&self) -> bool {
        match self {
            Arg::Str(s) => s.is_empty(),
            Arg::Bytes(b) => b.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.write_str(s),
            Arg::Int(i) => write!(f, "{}", i),
            Arg::Float(v) if v.is_infinite() => f.write_str(if *v > 0.0 { "+inf" } else { "-inf" }),
            Arg::Float(v) => write!(f, "{}", v),
            Arg::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
        }
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Str(s.clone())
    }
}

impl From<Vec<u8>> for Arg {
    fn from(b: Vec<u8>) -> Self {
        Arg::Bytes(b)
    }
}

impl From<&[u8]> for Arg {
    fn from(b: &[u8]) -> Self {
        Arg::Bytes(b.to_vec())
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}

impl From<f32> for Arg {
    fn from(v: f32) -> Self {
        Arg::Float(f64::from(v))
    }
}

macro_rules! int_arg {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(v: $t) -> Self {
                Arg::Int(i64::from(v))
            }
        })*
    };
}

// Values past i64::MAX clamp instead of wrapping negative.
macro_rules! wide_int_arg {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg {
            fn from(v: $t) -> Self {
                Arg::Int(i64::try_from(v).unwrap_or(i64::MAX))
            }
        })*
    };
}

int_arg!(i32, i64, u8, u16, u32);
wide_int_arg!(u64, usize);

/// Raw logical value of an option, as seen by validators.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionData {
    Null,
    Value(Arg),
    Flag(bool),
    List(Vec<Arg>),
    Group(Vec<(String, OptionData)>),
    Items(Vec<OptionData>),
}

impl OptionData {
    pub fn as_arg(&self) -> Option<&Arg> {
        match self {
            OptionData::Value(arg) => Some(arg),
            _ => None,
        }
    }

    /// Member of a grouped value.
    pub fn member(&self, name: &str) -> Option<&OptionData> {
        match self {
            OptionData::Group(members) => members.iter().find(|(n, _)| n == name).map(|(_, d)| d),
            _ => None,
        }
    }
}

/// Capability shared by every option shape.
pub trait CommandOption {
    fn compatibility(&self) -> &Compatibility;

    /// `true` when `version` is absent or inside the option's range.
    fn is_compatible(&self, version: Option<&Version>) -> bool {
        self.compatibility().is_compatible(version)
    }

    /// `true` when the option holds something that should be emitted.
    fn is_valid(&self) -> bool;

    /// Validity as seen by a command targeting `version`.
    fn is_valid_at(&self, version: Option<&Version>) -> bool {
        self.is_compatible(version) && self.is_valid()
    }

    fn option_data(&self) -> OptionData;

    /// Tokens of a valid option. Callers go through [`CommandOption::render`].
    fn tokens(&self, version: Option<&Version>) -> Vec<Arg>;

    /// Flat tokens, or nothing when incompatible or invalid.
    fn render(&self, version: Option<&Version>) -> Vec<Arg> {
        if !self.is_valid_at(version) {
            return Vec::new();
        }
        self.tokens(version)
    }
}

/// The closed set of option shapes.
#[derive(Debug, Clone)]
pub enum OptionNode {
    Positional(PositionalOption),
    Named(NamedOption),
    Flag(FlagOption),
    Numbered(NumberedOption),
    NotEmpty(NotEmptyOption),
    Validated(CustomValidatorOption),
    Grouped(GroupedOption),
    List(OptionList),
}

impl OptionNode {
    pub fn positional() -> Self {
        OptionNode::Positional(PositionalOption::new())
    }

    pub fn positional_value(value: impl Into<Arg>) -> Self {
        OptionNode::Positional(PositionalOption::with_value(value))
    }

    pub fn named(keyword: &'static str) -> Self {
        OptionNode::Named(NamedOption::new(keyword))
    }

    pub fn named_value(keyword: &'static str, value: impl Into<Arg>) -> Self {
        OptionNode::Named(NamedOption::with_value(keyword, value))
    }

    pub fn flag(keyword: &'static str) -> Self {
        OptionNode::Flag(FlagOption::new(keyword, false))
    }

    pub fn flag_on(keyword: &'static str) -> Self {
        OptionNode::Flag(FlagOption::new(keyword, true))
    }

    pub fn numbered(keyword: &'static str) -> Self {
        OptionNode::Numbered(NumberedOption::new(keyword))
    }

    /// Wrap in a [`NotEmptyOption`].
    #[must_use]
    pub fn not_empty(self) -> Self {
        OptionNode::NotEmpty(NotEmptyOption::new(self))
    }

    /// Wrap in a [`CustomValidatorOption`].
    #[must_use]
    pub fn validated(self, validator: Validator) -> Self {
        OptionNode::Validated(CustomValidatorOption::new(self, validator))
    }

    /// Restrict to a protocol version range.
    #[must_use]
    pub fn since(mut self, compatibility: Compatibility) -> Self {
        self.set_compatibility(compatibility);
        self
    }

    fn set_compatibility(&mut self, compatibility: Compatibility) {
        match self {
            OptionNode::Positional(o) => o.compatibility = compatibility,
            OptionNode::Named(o) => o.compatibility = compatibility,
            OptionNode::Flag(o) => o.compatibility = compatibility,
            OptionNode::Numbered(o) => o.compatibility = compatibility,
            OptionNode::NotEmpty(o) => o.inner_mut().set_compatibility(compatibility),
            OptionNode::Validated(o) => o.inner_mut().set_compatibility(compatibility),
            OptionNode::Grouped(o) => o.compatibility = compatibility,
            OptionNode::List(o) => o.compatibility = compatibility,
        }
    }

    /// Set the scalar of a positional or named option (through decorators).
    ///
    /// Returns `false` when this shape carries no scalar.
    pub fn set_value(&mut self, value: Option<Arg>) -> bool {
        match self {
            OptionNode::Positional(o) => o.set(value),
            OptionNode::Named(o) => o.set(value),
            OptionNode::NotEmpty(o) => return o.inner_mut().set_value(value),
            OptionNode::Validated(o) => return o.inner_mut().set_value(value),
            _ => return false,
        }
        true
    }

    /// Toggle a flag (through decorators).
    pub fn set_flag(&mut self, active: bool) -> bool {
        match self {
            OptionNode::Flag(o) => o.set(active),
            OptionNode::NotEmpty(o) => return o.inner_mut().set_flag(active),
            OptionNode::Validated(o) => return o.inner_mut().set_flag(active),
            _ => return false,
        }
        true
    }

    /// Replace the items of a numbered option (through decorators).
    pub fn set_list(&mut self, items: Option<Vec<Arg>>) -> bool {
        match self {
            OptionNode::Numbered(o) => o.set(items),
            OptionNode::NotEmpty(o) => return o.inner_mut().set_list(items),
            OptionNode::Validated(o) => return o.inner_mut().set_list(items),
            _ => return false,
        }
        true
    }

    /// Append to a numbered option or a heterogeneous list.
    pub fn push(&mut self, item: Arg) -> bool {
        match self {
            OptionNode::Numbered(o) => o.push(item),
            OptionNode::NotEmpty(o) => return o.inner_mut().push(item),
            OptionNode::Validated(o) => return o.inner_mut().push(item),
            _ => return false,
        }
        true
    }

    /// Positional options render without a keyword; used to anchor reordering.
    pub fn is_positional(&self) -> bool {
        match self {
            OptionNode::Positional(_) => true,
            OptionNode::NotEmpty(o) => o.inner().is_positional(),
            OptionNode::Validated(o) => o.inner().is_positional(),
            _ => false,
        }
    }

    pub fn as_grouped(&self) -> Option<&GroupedOption> {
        match self {
            OptionNode::Grouped(g) => Some(g),
            OptionNode::NotEmpty(o) => o.inner().as_grouped(),
            OptionNode::Validated(o) => o.inner().as_grouped(),
            _ => None,
        }
    }

    pub fn as_grouped_mut(&mut self) -> Option<&mut GroupedOption> {
        match self {
            OptionNode::Grouped(g) => Some(g),
            OptionNode::NotEmpty(o) => o.inner_mut().as_grouped_mut(),
            OptionNode::Validated(o) => o.inner_mut().as_grouped_mut(),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut OptionList> {
        match self {
            OptionNode::List(l) => Some(l),
            OptionNode::NotEmpty(o) => o.inner_mut().as_list_mut(),
            OptionNode::Validated(o) => o.inner_mut().as_list_mut(),
            _ => None,
        }
    }

    fn as_dyn(&self) -> &dyn CommandOption {
        match self {
            OptionNode::Positional(o) => o,
            OptionNode::Named(o) => o,
            OptionNode::Flag(o) => o,
            OptionNode::Numbered(o) => o,
            OptionNode::NotEmpty(o) => o,
            OptionNode::Validated(o) => o,
            OptionNode::Grouped(o) => o,
            OptionNode::List(o) => o,
        }
    }
}

impl CommandOption for OptionNode {
    fn compatibility(&self) -> &Compatibility {
        self.as_dyn().compatibility()
    }

    fn is_valid(&self) -> bool {
        self.as_dyn().is_valid()
    }

    fn is_valid_at(&self, version: Option<&Version>) -> bool {
        self.as_dyn().is_valid_at(version)
    }

    fn option_data(&self) -> OptionData {
        self.as_dyn().option_data()
    }

    fn tokens(&self, version: Option<&Version>) -> Vec<Arg> {
        self.as_dyn().tokens(version)
    }

    fn render(&self, version: Option<&Version>) -> Vec<Arg> {
        self.as_dyn().render(version)
    }
}

impl From<GroupedOption> for OptionNode {
    fn from(group: GroupedOption) -> Self {
        OptionNode::Grouped(group)
    }
}

impl From<OptionList> for OptionNode {
    fn from(list: OptionList) -> Self {
        OptionNode::List(list)
    }
}

impl From<NumberedOption> for OptionNode {
    fn from(option: NumberedOption) -> Self {
        OptionNode::Numbered(option)
    }
}

impl From<NamedOption> for OptionNode {
    fn from(option: NamedOption) -> Self {
        OptionNode::Named(option)
    }
}

/// Render a sequence of options in order, skipping incompatible or invalid ones.
pub fn render_all<'a, I>(options: I, version: Option<&Version>) -> Vec<Arg>
where
    I: IntoIterator<Item = &'a OptionNode>,
{
    options
        .into_iter()
        .filter(|option| option.is_valid_at(version))
        .flat_map(|option| option.tokens(version))
        .collect()
}

#[cfg(test)]
pub(crate) fn strings(args: &[Arg]) -> Vec<String> {
    args.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::since;

    #[test]
    fn test_arg_display() {
        assert_eq!(Arg::from("idx").to_string(), "idx");
        assert_eq!(Arg::from(12u32).to_string(), "12");
        assert_eq!(Arg::from(1.5).to_string(), "1.5");
        assert_eq!(Arg::from(100.0).to_string(), "100");
        assert_eq!(Arg::Float(f64::INFINITY).to_string(), "+inf");
        assert_eq!(Arg::Float(f64::NEG_INFINITY).to_string(), "-inf");
    }

    #[test]
    fn test_wide_ints_clamp() {
        assert_eq!(Arg::from(u64::MAX), Arg::Int(i64::MAX));
        assert_eq!(Arg::from(usize::MAX), Arg::Int(i64::MAX));
        assert_eq!(Arg::from(7usize), Arg::Int(7));
    }

    #[test]
    fn test_arg_as_i64() {
        assert_eq!(Arg::from("42").as_i64(), Some(42));
        assert_eq!(Arg::from(3.0).as_i64(), Some(3));
        assert_eq!(Arg::from(3.5).as_i64(), None);
    }

    #[test]
    fn test_since_reaches_through_decorators() {
        let node = OptionNode::named_value("DIALECT", 2).not_empty().since(since(2, 4, 3));
        assert!(node.render(Some(&Version::new(2, 2, 0))).is_empty());
        assert_eq!(
            strings(&node.render(Some(&Version::new(2, 4, 3)))),
            vec!["DIALECT", "2"]
        );
    }

    #[test]
    fn test_setters_reject_wrong_shape() {
        let mut flag = OptionNode::flag("NOCONTENT");
        assert!(!flag.set_value(Some("x".into())));
        assert!(flag.set_flag(true));
        assert_eq!(strings(&flag.render(None)), vec!["NOCONTENT"]);

        let mut numbered = OptionNode::numbered("INKEYS").not_empty();
        assert!(numbered.push("doc:1".into()));
        assert_eq!(strings(&numbered.render(None)), vec!["INKEYS", "1", "doc:1"]);
    }

    #[test]
    fn test_render_all_skips_invalid() {
        let options = vec![
            OptionNode::positional_value("idx"),
            OptionNode::named("LANGUAGE"),
            OptionNode::flag_on("VERBATIM"),
        ];
        assert_eq!(strings(&render_all(&options, None)), vec!["idx", "VERBATIM"]);
    }
}
