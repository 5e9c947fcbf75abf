// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index lifecycle: `FT.CREATE`, `FT.ALTER`, `FT.DROPINDEX`, `FT.INFO`,
//! `FT._LIST`, `FT.TAGVALS`.

use semver::Version;

use super::{positional, Command, FtCommand};
use crate::client::Client;
use crate::error::Result;
use crate::option::schema::{SchemaField, VectorParams};
use crate::option::{Arg, GroupedOption, NumberedOption, OptionList, OptionNode, Validator};
use crate::response::{expect_ok, text_list, IndexInfo, Reply};
use crate::version::since;

/// Document type an index is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexOn {
    #[default]
    Hash,
    /// RedisJSON documents (engine 2.2.0 and later)
    Json,
}

impl IndexOn {
    fn as_str(self) -> &'static str {
        match self {
            IndexOn::Hash => "HASH",
            IndexOn::Json => "JSON",
        }
    }
}

fn schema_node(fields: &[SchemaField]) -> OptionNode {
    let mut list = OptionList::new();
    for field in fields {
        list.push(OptionNode::from(field.clone()));
    }
    GroupedOption::new()
        .member("keyword", OptionNode::flag_on("SCHEMA"))
        .member("fields", list.into())
        .require(&["fields"])
        .lock(&["keyword"])
        .into()
}

/// `FT.CREATE index [ON HASH|JSON] [PREFIX n p...] ... SCHEMA field...`
#[derive(Debug, Clone)]
pub struct Create {
    command: Command,
    fields: Vec<SchemaField>,
}

impl Create {
    pub fn new(index: impl Into<String>) -> Self {
        let command = Command::new("FT.CREATE")
            .option("index", positional(index.into()))
            .option("ON", OptionNode::positional())
            .option("PREFIX", OptionNode::numbered("PREFIX").not_empty())
            .option("FILTER", OptionNode::named("FILTER").not_empty())
            .option("LANGUAGE", OptionNode::named("LANGUAGE").not_empty())
            .option("LANGUAGE_FIELD", OptionNode::named("LANGUAGE_FIELD").not_empty())
            .option("SCORE", OptionNode::named("SCORE"))
            .option("SCORE_FIELD", OptionNode::named("SCORE_FIELD").not_empty())
            .option("PAYLOAD_FIELD", OptionNode::named("PAYLOAD_FIELD").not_empty())
            .option("MAXTEXTFIELDS", OptionNode::flag("MAXTEXTFIELDS"))
            .option("TEMPORARY", OptionNode::named("TEMPORARY"))
            .option("NOOFFSETS", OptionNode::flag("NOOFFSETS"))
            .option("NOHL", OptionNode::flag("NOHL"))
            .option("NOFIELDS", OptionNode::flag("NOFIELDS"))
            .option("NOFREQS", OptionNode::flag("NOFREQS"))
            .option("STOPWORDS", OptionNode::numbered("STOPWORDS"))
            .option("SKIPINITIALSCAN", OptionNode::flag("SKIPINITIALSCAN"))
            .option("SCHEMA", schema_node(&[]))
            .gate("SKIPINITIALSCAN", since(2, 0, 0))
            .require(&["index", "SCHEMA"]);
        Self {
            command,
            fields: Vec::new(),
        }
    }

    fn flag(mut self, name: &'static str) -> Self {
        self.command.set(name, OptionNode::flag_on(name));
        self
    }

    fn named(mut self, name: &'static str, value: impl Into<Arg>) -> Self {
        self.command.set(name, OptionNode::named_value(name, value).not_empty());
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.command.set_version(Some(version));
        self
    }

    /// `ON HASH|JSON`. JSON becomes a required option so older engines
    /// fail loudly instead of silently indexing hashes.
    #[must_use]
    pub fn on(mut self, on: IndexOn) -> Self {
        let mut group = GroupedOption::new()
            .member("keyword", OptionNode::flag_on("ON"))
            .member(
                "type",
                OptionNode::positional_value(on.as_str()).validated(Validator::one_of("index type", &["HASH", "JSON"])),
            )
            .require(&["type"])
            .lock(&["keyword"]);
        if on == IndexOn::Json {
            group = group.since(since(2, 2, 0));
            self.command = self.command.require(&["ON"]);
        }
        self.command.set("ON", group.into());
        self
    }

    #[must_use]
    pub fn prefix<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
        self.command
            .set("PREFIX", OptionNode::from(NumberedOption::with_items("PREFIX", prefixes)).not_empty());
        self
    }

    /// Document filter expression, e.g. `@indexName=="myindexname"`.
    #[must_use]
    pub fn filter(self, expression: impl Into<String>) -> Self {
        self.named("FILTER", expression.into())
    }

    #[must_use]
    pub fn language(self, language: impl Into<String>) -> Self {
        self.named("LANGUAGE", language.into())
    }

    #[must_use]
    pub fn language_field(self, field: impl Into<String>) -> Self {
        self.named("LANGUAGE_FIELD", field.into())
    }

    #[must_use]
    pub fn score(self, score: f64) -> Self {
        self.named("SCORE", score)
    }

    #[must_use]
    pub fn score_field(self, field: impl Into<String>) -> Self {
        self.named("SCORE_FIELD", field.into())
    }

    #[must_use]
    pub fn payload_field(self, field: impl Into<String>) -> Self {
        self.named("PAYLOAD_FIELD", field.into())
    }

    #[must_use]
    pub fn max_text_fields(self) -> Self {
        self.flag("MAXTEXTFIELDS")
    }

    /// Lightweight index that expires after `seconds` of inactivity.
    #[must_use]
    pub fn temporary(self, seconds: u64) -> Self {
        self.named("TEMPORARY", seconds)
    }

    #[must_use]
    pub fn no_offsets(self) -> Self {
        self.flag("NOOFFSETS")
    }

    #[must_use]
    pub fn no_highlight(self) -> Self {
        self.flag("NOHL")
    }

    #[must_use]
    pub fn no_fields(self) -> Self {
        self.flag("NOFIELDS")
    }

    #[must_use]
    pub fn no_freqs(self) -> Self {
        self.flag("NOFREQS")
    }

    /// Custom stop-word list; an empty list disables stop words (`STOPWORDS 0`).
    #[must_use]
    pub fn stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        self.command
            .set("STOPWORDS", NumberedOption::with_items("STOPWORDS", words).into());
        self
    }

    #[must_use]
    pub fn skip_initial_scan(self) -> Self {
        self.flag("SKIPINITIALSCAN")
    }

    #[must_use]
    pub fn field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self.command.set("SCHEMA", schema_node(&self.fields));
        self
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }
}

impl FtCommand for Create {
    type Output = ();

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<()> {
        expect_ok(reply, "FT.CREATE")
    }
}

/// Field-by-field definition of an index, producing a [`Create`].
///
/// ```
/// use redisearch_protocol::command::{FtCommand, IndexBuilder};
///
/// let create = IndexBuilder::new("products")
///     .on_json()
///     .prefix("product:")
///     .text_as("$.name", "name")
///     .numeric_sortable("$.price", "price")
///     .tag_as("$.tags", "tags")
///     .build();
///
/// let args: Vec<String> = create.arguments().unwrap().iter().map(ToString::to_string).collect();
/// assert_eq!(
///     args,
///     ["products", "ON", "JSON", "PREFIX", "1", "product:", "SCHEMA",
///      "$.name", "AS", "name", "TEXT",
///      "$.price", "AS", "price", "NUMERIC", "SORTABLE",
///      "$.tags", "AS", "tags", "TAG"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    create: Create,
    prefixes: Vec<String>,
}

impl IndexBuilder {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            create: Create::new(index),
            prefixes: Vec::new(),
        }
    }

    fn map(mut self, f: impl FnOnce(Create) -> Create) -> Self {
        self.create = f(self.create);
        self
    }

    #[must_use]
    pub fn on_hash(self) -> Self {
        self.map(|c| c.on(IndexOn::Hash))
    }

    #[must_use]
    pub fn on_json(self) -> Self {
        self.map(|c| c.on(IndexOn::Json))
    }

    /// Adds one key prefix; may be called repeatedly.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        let prefixes = self.prefixes.clone();
        self.map(|c| c.prefix(prefixes))
    }

    #[must_use]
    pub fn filter(self, expression: impl Into<String>) -> Self {
        self.map(|c| c.filter(expression))
    }

    #[must_use]
    pub fn language(self, language: impl Into<String>) -> Self {
        self.map(|c| c.language(language))
    }

    #[must_use]
    pub fn stop_words<I, S>(self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.map(|c| c.stop_words(words))
    }

    #[must_use]
    pub fn temporary(self, seconds: u64) -> Self {
        self.map(|c| c.temporary(seconds))
    }

    #[must_use]
    pub fn skip_initial_scan(self) -> Self {
        self.map(Create::skip_initial_scan)
    }

    #[must_use]
    pub fn field(self, field: SchemaField) -> Self {
        self.map(|c| c.field(field))
    }

    #[must_use]
    pub fn text(self, name: impl Into<String>) -> Self {
        self.field(SchemaField::text(name))
    }

    #[must_use]
    pub fn text_as(self, path: impl Into<String>, alias: impl Into<String>) -> Self {
        self.field(SchemaField::text(path).alias(alias))
    }

    #[must_use]
    pub fn text_sortable(self, name: impl Into<String>) -> Self {
        self.field(SchemaField::text(name).sortable())
    }

    #[must_use]
    pub fn text_weighted(self, name: impl Into<String>, weight: f64) -> Self {
        self.field(SchemaField::text(name).weight(weight))
    }

    #[must_use]
    pub fn numeric(self, name: impl Into<String>) -> Self {
        self.field(SchemaField::numeric(name))
    }

    #[must_use]
    pub fn numeric_sortable(self, path: impl Into<String>, alias: impl Into<String>) -> Self {
        self.field(SchemaField::numeric(path).alias(alias).sortable())
    }

    #[must_use]
    pub fn tag(self, name: impl Into<String>) -> Self {
        self.field(SchemaField::tag(name))
    }

    #[must_use]
    pub fn tag_as(self, path: impl Into<String>, alias: impl Into<String>) -> Self {
        self.field(SchemaField::tag(path).alias(alias))
    }

    #[must_use]
    pub fn tag_with_separator(self, name: impl Into<String>, separator: char) -> Self {
        self.field(SchemaField::tag(name).separator(separator))
    }

    #[must_use]
    pub fn geo(self, name: impl Into<String>) -> Self {
        self.field(SchemaField::geo(name))
    }

    #[must_use]
    pub fn vector(self, name: impl Into<String>, params: VectorParams) -> Self {
        self.field(SchemaField::vector(name, params))
    }

    pub fn build(self) -> Create {
        self.create
    }
}

impl From<IndexBuilder> for Create {
    fn from(builder: IndexBuilder) -> Self {
        builder.build()
    }
}

/// `FT.ALTER index [SKIPINITIALSCAN] SCHEMA ADD field`
#[derive(Debug, Clone)]
pub struct Alter {
    command: Command,
}

impl Alter {
    pub fn new(index: impl Into<String>, field: SchemaField) -> Self {
        let add = GroupedOption::new()
            .member("schema", OptionNode::flag_on("SCHEMA"))
            .member("add", OptionNode::flag_on("ADD"))
            .member("field", field.into())
            .require(&["field"])
            .lock(&["schema", "add"]);
        let command = Command::new("FT.ALTER")
            .option("index", positional(index.into()))
            .option("SKIPINITIALSCAN", OptionNode::flag("SKIPINITIALSCAN"))
            .option("SCHEMA", add.into())
            .gate("SKIPINITIALSCAN", since(2, 0, 0))
            .require(&["index", "SCHEMA"]);
        Self { command }
    }

    #[must_use]
    pub fn skip_initial_scan(mut self) -> Self {
        self.command
            .set("SKIPINITIALSCAN", OptionNode::flag_on("SKIPINITIALSCAN"));
        self
    }
}

impl FtCommand for Alter {
    type Output = ();

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<()> {
        expect_ok(reply, "FT.ALTER")
    }
}

/// `FT.DROPINDEX index [DD]`
#[derive(Debug, Clone)]
pub struct DropIndex {
    command: Command,
}

impl DropIndex {
    pub fn new(index: impl Into<String>) -> Self {
        let command = Command::new("FT.DROPINDEX")
            .option("index", positional(index.into()))
            .option("DD", OptionNode::flag("DD"))
            .require(&["index"]);
        Self { command }
    }

    /// Also delete the indexed documents.
    #[must_use]
    pub fn delete_documents(mut self) -> Self {
        self.command.set("DD", OptionNode::flag_on("DD"));
        self
    }
}

impl FtCommand for DropIndex {
    type Output = ();

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<()> {
        expect_ok(reply, "FT.DROPINDEX")
    }
}

/// `FT.INFO index`
#[derive(Debug, Clone)]
pub struct Info {
    command: Command,
}

impl Info {
    pub fn new(index: impl Into<String>) -> Self {
        let command = Command::new("FT.INFO")
            .option("index", positional(index.into()))
            .require(&["index"]);
        Self { command }
    }
}

impl FtCommand for Info {
    type Output = IndexInfo;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<IndexInfo> {
        IndexInfo::parse(reply)
    }
}

/// `FT._LIST`
#[derive(Debug, Clone)]
pub struct ListIndexes {
    command: Command,
}

impl ListIndexes {
    pub fn new() -> Self {
        Self {
            command: Command::new("FT._LIST"),
        }
    }
}

impl Default for ListIndexes {
    fn default() -> Self {
        Self::new()
    }
}

impl FtCommand for ListIndexes {
    type Output = Vec<String>;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<Vec<String>> {
        text_list(reply, "FT._LIST")
    }
}

/// `FT.TAGVALS index field`
#[derive(Debug, Clone)]
pub struct TagValues {
    command: Command,
}

impl TagValues {
    pub fn new(index: impl Into<String>, field: impl Into<String>) -> Self {
        let command = Command::new("FT.TAGVALS")
            .option("index", positional(index.into()))
            .option("field", positional(field.into()))
            .require(&["index", "field"]);
        Self { command }
    }
}

impl FtCommand for TagValues {
    type Output = Vec<String>;

    fn command(&self) -> &Command {
        &self.command
    }

    fn parse_response(&self, reply: Reply, _client: Option<&Client>) -> Result<Vec<String>> {
        text_list(reply, "FT.TAGVALS")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::option::schema::{DistanceMetric, VectorAlgorithm, VectorType};
    use crate::option::strings;

    fn args<C: FtCommand>(command: &C) -> Vec<String> {
        strings(&command.arguments().unwrap())
    }

    #[test]
    fn test_schema_is_required() {
        assert_eq!(
            Create::new("idx").arguments(),
            Err(Error::MissingOption {
                names: vec!["SCHEMA".to_string()]
            })
        );
    }

    #[test]
    fn test_create_hash_index() {
        let create = Create::new("idx")
            .field(SchemaField::text("title").weight(5.0))
            .stop_words(Vec::<String>::new())
            .prefix(["doc:", "post:"])
            .on(IndexOn::Hash)
            .field(SchemaField::numeric("price").sortable());
        assert_eq!(
            args(&create),
            vec![
                "idx", "ON", "HASH", "PREFIX", "2", "doc:", "post:", "STOPWORDS", "0", "SCHEMA", "title", "TEXT",
                "WEIGHT", "5", "price", "NUMERIC", "SORTABLE"
            ]
        );
    }

    #[test]
    fn test_json_requires_newer_engine() {
        let create = Create::new("idx")
            .on(IndexOn::Json)
            .field(SchemaField::text("$.t").alias("t"))
            .with_version(Version::new(2, 0, 0));
        assert!(matches!(
            create.arguments(),
            Err(Error::MissingOption { names }) if names == vec!["ON".to_string()]
        ));
        let create = create.with_version(Version::new(2, 2, 0));
        assert_eq!(args(&create)[1..3], ["ON".to_string(), "JSON".to_string()]);
    }

    #[test]
    fn test_builder_vector_field() {
        let params = VectorParams::new(VectorAlgorithm::Flat, VectorType::Float32, 4, DistanceMetric::L2);
        let create = IndexBuilder::new("vec")
            .vector("embedding", params)
            .temporary(60)
            .build();
        assert_eq!(
            args(&create),
            vec![
                "vec", "TEMPORARY", "60", "SCHEMA", "embedding", "VECTOR", "FLAT", "6", "TYPE", "FLOAT32", "DIM",
                "4", "DISTANCE_METRIC", "L2"
            ]
        );
    }

    #[test]
    fn test_alter_and_drop() {
        let alter = Alter::new("idx", SchemaField::tag("color")).skip_initial_scan();
        assert_eq!(
            args(&alter),
            vec!["idx", "SKIPINITIALSCAN", "SCHEMA", "ADD", "color", "TAG"]
        );
        assert_eq!(args(&DropIndex::new("idx").delete_documents()), vec!["idx", "DD"]);
        assert_eq!(args(&DropIndex::new("idx")), vec!["idx"]);
    }

    #[test]
    fn test_simple_replies() {
        let ok = Reply::Status("OK".into());
        assert!(DropIndex::new("idx").parse_response(ok, None).is_ok());
        let list = Reply::from(vec!["a", "b"]);
        assert_eq!(ListIndexes::new().parse_response(list, None).unwrap(), vec!["a", "b"]);
        assert!(ListIndexes::new().arguments().unwrap().is_empty());
        let tags = Reply::from(vec!["red"]);
        assert_eq!(TagValues::new("idx", "color").parse_response(tags, None).unwrap(), vec!["red"]);
    }
}
