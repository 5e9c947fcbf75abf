// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Commands: named, ordered collections of options.
//!
//! A [`Command`] owns one slot per option name, in declaration order. A slot
//! holds either a single [`OptionNode`] or a repeatable list of entries
//! (FILTER, GROUPBY, APPLY, ...). Arguments are assembled in four steps:
//!
//! 1. required slots that are absent or invalid at the target version fail
//!    the call with [`Error::MissingOption`]
//! 2. incompatible and invalid entries are dropped
//! 3. the command ordering is applied (declaration order, or re-insertion of
//!    chained entries after their parent)
//! 4. every surviving entry is flattened into tokens
//!
//! Concrete protocol commands wrap a `Command` and implement [`FtCommand`],
//! which adds the reply parser.

mod aggregate;
mod alias;
mod config;
mod dictionary;
mod explain;
mod index;
mod search;
mod spellcheck;
mod suggestion;
mod synonym;

pub use aggregate::{Aggregate, AggregateResult, CursorDelete, CursorRead};
pub use alias::{AliasAdd, AliasDelete, AliasUpdate};
pub use config::{ConfigGet, ConfigSet};
pub use dictionary::{DictAdd, DictDelete, DictDump};
pub use explain::Explain;
pub use index::{
    Alter, Create, DropIndex, IndexBuilder, IndexOn, Info, ListIndexes, TagValues,
};
pub use search::Search;
pub use spellcheck::{SpellCheck, TermsMode};
pub use suggestion::{SugAdd, SugDelete, SugGet, SugLen};
pub use synonym::{SynDump, SynUpdate};

use std::borrow::Cow;

use semver::Version;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::option::{Arg, CommandOption, OptionNode};
use crate::response::Reply;
use crate::version::Compatibility;

/// Address of one rendered entry: a slot name and the index inside it
/// (always 0 for single-valued slots).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRef {
    pub slot: &'static str,
    pub index: usize,
}

/// One element of a repeatable slot.
#[derive(Debug, Clone)]
pub struct ListEntry {
    pub node: OptionNode,
    /// Entry this one was chained from, captured when it was appended
    pub parent: Option<EntryRef>,
}

#[derive(Debug, Clone)]
enum SlotContent {
    Single(OptionNode),
    Many(Vec<ListEntry>),
}

#[derive(Debug, Clone)]
struct Slot {
    name: &'static str,
    compatibility: Compatibility,
    content: SlotContent,
}

/// How surviving entries are arranged before flattening.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Ordering {
    /// Slot declaration order, entries of a list in append order.
    #[default]
    Declaration,
    /// Entries of the named slots are moved right after their parent entry,
    /// or in front of every keyword option when they have none.
    Chained(Vec<&'static str>),
}

/// Protocol verb plus its option slots.
///
/// ```
/// use redisearch_protocol::command::Command;
/// use redisearch_protocol::option::{search::limit, OptionNode};
///
/// let mut command = Command::new("FT.SEARCH")
///     .option("index", OptionNode::positional().not_empty())
///     .option("query", OptionNode::positional().not_empty())
///     .option("WITHSCORES", OptionNode::flag("WITHSCORES"))
///     .option("LIMIT", OptionNode::positional())
///     .require(&["index", "query"]);
///
/// assert!(command.arguments().is_err());
/// command.set("LIMIT", limit(12, 10).into());
/// command.set_flag("WITHSCORES", true).unwrap();
/// command.set_value("query", Some("hello".into())).unwrap();
/// command.set_value("index", Some("idx".into())).unwrap();
///
/// let args: Vec<String> = command.arguments().unwrap().iter().map(ToString::to_string).collect();
/// assert_eq!(args, ["idx", "hello", "WITHSCORES", "LIMIT", "12", "10"]);
/// ```
#[derive(Debug, Clone)]
pub struct Command {
    id: &'static str,
    version: Option<Version>,
    slots: Vec<Slot>,
    required: Vec<&'static str>,
    ordering: Ordering,
}

impl Command {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            version: None,
            slots: Vec::new(),
            required: Vec::new(),
            ordering: Ordering::Declaration,
        }
    }

    /// Declare a single-valued slot.
    #[must_use]
    pub fn option(mut self, name: &'static str, node: OptionNode) -> Self {
        self.set(name, node);
        self
    }

    /// Declare a repeatable slot.
    #[must_use]
    pub fn list(mut self, name: &'static str) -> Self {
        if self.slot(name).is_none() {
            self.slots.push(Slot {
                name,
                compatibility: Compatibility::any(),
                content: SlotContent::Many(Vec::new()),
            });
        }
        self
    }

    /// Gate a whole slot on a version range, whatever node it holds later.
    #[must_use]
    pub fn gate(mut self, name: &'static str, compatibility: Compatibility) -> Self {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.name == name) {
            slot.compatibility = compatibility;
        }
        self
    }

    #[must_use]
    pub fn require(mut self, names: &[&'static str]) -> Self {
        self.required.extend_from_slice(names);
        self
    }

    #[must_use]
    pub fn ordering(mut self, ordering: Ordering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Version the command is built for; `None` renders every option.
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    pub fn set_version(&mut self, version: Option<Version>) {
        self.version = version;
    }

    fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == name)
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.name == name)
    }

    /// Node of a single-valued slot.
    pub fn get(&self, name: &str) -> Option<&OptionNode> {
        match &self.slot(name)?.content {
            SlotContent::Single(node) => Some(node),
            SlotContent::Many(_) => None,
        }
    }

    /// Mutable node of a single-valued slot.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut OptionNode> {
        match self.slot_mut(name).map(|slot| &mut slot.content) {
            Some(SlotContent::Single(node)) => Ok(node),
            _ => Err(Error::UnknownOption {
                name: name.to_string(),
            }),
        }
    }

    /// Entries of a repeatable slot.
    pub fn entries(&self, name: &str) -> &[ListEntry] {
        match self.slot(name).map(|slot| &slot.content) {
            Some(SlotContent::Many(entries)) => entries,
            _ => &[],
        }
    }

    /// Replace (or declare) a single-valued slot. The slot keeps its gate.
    pub fn set(&mut self, name: &'static str, node: OptionNode) {
        match self.slot_mut(name) {
            Some(slot) => slot.content = SlotContent::Single(node),
            None => self.slots.push(Slot {
                name,
                compatibility: Compatibility::any(),
                content: SlotContent::Single(node),
            }),
        }
    }

    pub fn set_value(&mut self, name: &str, value: Option<Arg>) -> Result<()> {
        if self.get_mut(name)?.set_value(value) {
            Ok(())
        } else {
            Err(Error::invalid("option shape", name))
        }
    }

    pub fn set_flag(&mut self, name: &str, active: bool) -> Result<()> {
        if self.get_mut(name)?.set_flag(active) {
            Ok(())
        } else {
            Err(Error::invalid("option shape", name))
        }
    }

    /// Append to a repeatable slot (declared on first use).
    pub fn push(&mut self, name: &'static str, node: OptionNode) -> EntryRef {
        self.push_chained(name, node, None)
    }

    /// Append to a repeatable slot, remembering the entry it follows.
    pub fn push_chained(&mut self, name: &'static str, node: OptionNode, parent: Option<EntryRef>) -> EntryRef {
        let entry = ListEntry { node, parent };
        let slot = match self.slots.iter().position(|s| s.name == name) {
            Some(position) => &mut self.slots[position],
            None => {
                self.slots.push(Slot {
                    name,
                    compatibility: Compatibility::any(),
                    content: SlotContent::Many(Vec::new()),
                });
                let last = self.slots.len() - 1;
                &mut self.slots[last]
            }
        };
        match &mut slot.content {
            SlotContent::Many(entries) => {
                entries.push(entry);
                EntryRef {
                    slot: name,
                    index: entries.len() - 1,
                }
            }
            content @ SlotContent::Single(_) => {
                *content = SlotContent::Many(vec![entry]);
                EntryRef { slot: name, index: 0 }
            }
        }
    }

    /// Required slots that are absent or invalid at `version`.
    pub fn missing(&self, version: Option<&Version>) -> Vec<&'static str> {
        self.required
            .iter()
            .copied()
            .filter(|name| {
                let Some(slot) = self.slot(name) else {
                    return true;
                };
                if !slot.compatibility.is_compatible(version) {
                    return true;
                }
                match &slot.content {
                    SlotContent::Single(node) => !node.is_valid_at(version),
                    SlotContent::Many(entries) => !entries.iter().any(|e| e.node.is_valid_at(version)),
                }
            })
            .collect()
    }

    /// Tokens for the command's own target version.
    pub fn arguments(&self) -> Result<Vec<Arg>> {
        self.arguments_at(self.version.as_ref())
    }

    /// Tokens for an explicit target version.
    pub fn arguments_at(&self, version: Option<&Version>) -> Result<Vec<Arg>> {
        let missing = self.missing(version);
        if !missing.is_empty() {
            return Err(Error::MissingOption {
                names: missing.into_iter().map(String::from).collect(),
            });
        }

        let entries = self.ordered(self.rendered_entries(version));
        Ok(entries
            .into_iter()
            .flat_map(|entry| entry.node.tokens(version))
            .collect())
    }

    fn rendered_entries(&self, version: Option<&Version>) -> Vec<Rendered<'_>> {
        let mut rendered = Vec::new();
        for slot in self.slots.iter().filter(|s| s.compatibility.is_compatible(version)) {
            match &slot.content {
                SlotContent::Single(node) => rendered.push(Rendered {
                    at: EntryRef { slot: slot.name, index: 0 },
                    node,
                    parent: None,
                }),
                SlotContent::Many(entries) => {
                    rendered.extend(entries.iter().enumerate().map(|(index, entry)| Rendered {
                        at: EntryRef { slot: slot.name, index },
                        node: &entry.node,
                        parent: entry.parent,
                    }))
                }
            }
        }
        rendered.retain(|entry| entry.node.is_valid_at(version));
        rendered
    }

    fn ordered<'a>(&self, entries: Vec<Rendered<'a>>) -> Vec<Rendered<'a>> {
        match &self.ordering {
            Ordering::Declaration => entries,
            Ordering::Chained(names) => chain(entries, names),
        }
    }
}

struct Rendered<'a> {
    at: EntryRef,
    node: &'a OptionNode,
    parent: Option<EntryRef>,
}

/// Move chained entries right after their parent.
///
/// A chained entry whose parent is itself chained follows the same anchor,
/// keeping append order. Entries without a surviving anchor go in front of
/// the first keyword option (after the positional index and query).
fn chain<'a>(entries: Vec<Rendered<'a>>, names: &[&'static str]) -> Vec<Rendered<'a>> {
    let is_chained = |at: &EntryRef| names.contains(&at.slot);
    let parents: Vec<(EntryRef, Option<EntryRef>)> = entries
        .iter()
        .filter(|e| is_chained(&e.at))
        .map(|e| (e.at, e.parent))
        .collect();

    let (chained, mut base): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .enumerate()
        .partition(|(_, e)| is_chained(&e.at));

    let anchor_of = |mut parent: Option<EntryRef>| {
        // Bounded walk: a chain can never be longer than the chained entries.
        for _ in 0..=parents.len() {
            match parent {
                Some(p) if is_chained(&p) => {
                    parent = parents.iter().find(|(at, _)| *at == p).and_then(|(_, up)| *up);
                }
                other => return other,
            }
        }
        None
    };
    let front = base.iter().take_while(|(_, e)| e.node.is_positional()).count();

    let mut placements: Vec<(usize, usize, Rendered<'a>)> = chained
        .into_iter()
        .map(|(original, entry)| {
            let position = anchor_of(entry.parent)
                .and_then(|anchor| base.iter().position(|(_, e)| e.at == anchor))
                .map_or(front, |p| p + 1);
            (position, original, entry)
        })
        .collect();

    // Highest insertion point first so earlier positions never shift.
    placements.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
    for (position, original, entry) in placements {
        base.insert(position, (original, entry));
    }
    base.into_iter().map(|(_, entry)| entry).collect()
}

/// A protocol command with a typed reply.
pub trait FtCommand {
    type Output;

    fn command(&self) -> &Command;

    /// The command as sent through `client`, with any client-level
    /// defaults applied.
    fn command_for(&self, _client: &Client) -> Cow<'_, Command> {
        Cow::Borrowed(self.command())
    }

    fn parse_response(&self, reply: Reply, client: Option<&Client>) -> Result<Self::Output>;

    fn id(&self) -> &'static str {
        self.command().id()
    }

    fn arguments(&self) -> Result<Vec<Arg>> {
        self.command().arguments()
    }
}

/// A command whose results can be re-requested page by page.
pub trait PaginatedCommand: FtCommand + Clone {
    type Item;

    /// `(offset, size)` currently requested, if a LIMIT is set.
    fn page(&self) -> Option<(usize, usize)>;

    fn set_page(&mut self, offset: usize, size: usize);

    /// `(total, items)` of one page reply.
    fn parse_page(&self, reply: Reply) -> Result<(usize, Vec<Self::Item>)>;
}

// Mandatory positional argument such as an index or dictionary name.
pub(crate) fn positional(value: impl Into<Arg>) -> OptionNode {
    OptionNode::positional_value(value).not_empty()
}
