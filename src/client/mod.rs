// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Client facade over an injected [`Transport`].
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐  arguments()   ┌──────────┐ execute/pipeline ┌───────────┐
//! │  FtCommand    │ ─────────────► │  Client  │ ───────────────► │ Transport │
//! │ (Search, ...) │ ◄───────────── │          │ ◄─────────────── │ (redis,   │
//! └───────────────┘ parse_response └──────────┘      Reply       │  memory)  │
//!                                                                 └───────────┘
//! ```
//!
//! The client is cheap to clone; paginated and cursor responses keep a
//! clone to issue their follow-up reads.

mod memory;
mod redis;
mod traits;

pub use memory::MemoryTransport;
pub use self::redis::RedisTransport;
pub use traits::{Call, Transport};

use std::fmt;
use std::sync::Arc;

use semver::Version;
use tracing::{debug, warn};

use crate::command::FtCommand;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::metrics::{self, LatencyTimer};
use crate::option::Arg;
use crate::response::{lookup, Reply};
use crate::version::from_module_version;

/// Entry point for executing commands.
///
/// ```
/// use redisearch_protocol::client::{Client, MemoryTransport};
/// use redisearch_protocol::command::DictAdd;
/// use redisearch_protocol::response::Reply;
/// use std::sync::Arc;
///
/// let transport = Arc::new(MemoryTransport::new());
/// transport.push_reply(Reply::Int(2));
/// let client = Client::new(transport.clone());
///
/// let added = client.execute(&DictAdd::new("colors", ["red", "blue"])).unwrap();
/// assert_eq!(added, 2);
/// assert_eq!(transport.last_call().unwrap().tokens(), ["colors", "red", "blue"]);
/// ```
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    version: Option<Version>,
    default_page_size: usize,
    cursor_read_size: Option<usize>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("version", &self.version)
            .field("default_page_size", &self.default_page_size)
            .field("cursor_read_size", &self.cursor_read_size)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client with no target version: every option is rendered.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let defaults = ClientConfig::default();
        Self {
            transport,
            version: None,
            default_page_size: defaults.default_page_size,
            cursor_read_size: defaults.cursor_read_size,
        }
    }

    /// Client configured from `config`, optionally checking the server version.
    pub fn from_config(transport: Arc<dyn Transport>, config: &ClientConfig) -> Result<Self> {
        let version = config.protocol_version()?;
        let client = Self {
            transport,
            version: Some(version.clone()),
            default_page_size: config.default_page_size,
            cursor_read_size: config.cursor_read_size,
        };
        if config.detect_version {
            let detected = client.detect_version()?;
            if version > detected && !config.suppress_version_warning {
                warn!(
                    configured = %version,
                    detected = %detected,
                    "Configured protocol version is newer than the server; options may be rejected"
                );
            }
        }
        Ok(client)
    }

    /// Open a redis connection from `config.redis_url`.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let transport = RedisTransport::connect(config.redis_url()?)?;
        Self::from_config(Arc::new(transport), config)
    }

    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    pub fn cursor_read_size(&self) -> Option<usize> {
        self.cursor_read_size
    }

    // A command's own target version wins over the client's.
    fn arguments_of<C: FtCommand>(&self, command: &C) -> Result<Vec<Arg>> {
        let inner = command.command_for(self);
        inner.arguments_at(inner.version().or(self.version.as_ref()))
    }

    /// Execute one command and parse its reply.
    pub fn execute<C: FtCommand>(&self, command: &C) -> Result<C::Output> {
        let reply = self.execute_raw(command)?;
        command.parse_response(reply, Some(self))
    }

    pub(crate) fn execute_raw<C: FtCommand>(&self, command: &C) -> Result<Reply> {
        let args = self.arguments_of(command)?;
        self.call(command.id(), &args)
    }

    /// Send a raw call, bypassing the option engine.
    pub fn call(&self, id: &str, args: &[Arg]) -> Result<Reply> {
        let _timer = LatencyTimer::new(id);
        debug!(command = id, args = args.len(), "Executing command");
        let result = self.transport.execute(id, args);
        metrics::record_command(id, if result.is_ok() { "success" } else { "error" });
        result
    }

    /// Start collecting commands for a single round trip.
    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline {
            client: self,
            calls: Vec::new(),
        }
    }

    /// Server module version from `MODULE LIST` (module `search`, key `ver`).
    pub fn detect_version(&self) -> Result<Version> {
        const CONTEXT: &str = "MODULE LIST";
        let reply = self.call("MODULE", &[Arg::from("LIST")])?;
        let modules = reply.as_array().ok_or_else(|| Error::unexpected(CONTEXT, &reply))?;
        let search = modules
            .iter()
            .filter_map(Reply::as_array)
            .find(|module| {
                lookup(module, "name")
                    .and_then(Reply::as_text)
                    .is_some_and(|name| name.eq_ignore_ascii_case("search") || name.eq_ignore_ascii_case("ft"))
            })
            .ok_or_else(|| Error::unexpected(CONTEXT, "search module is not loaded"))?;
        let encoded = lookup(search, "ver")
            .and_then(Reply::as_i64)
            .ok_or_else(|| Error::unexpected(CONTEXT, search))?;
        let version = from_module_version(encoded)?;
        debug!(version = %version, "Detected search module version");
        Ok(version)
    }
}

/// Commands collected for one round trip.
///
/// Arguments are rendered when a command is added, so composition errors
/// surface at the call that caused them.
pub struct Pipeline<'a> {
    client: &'a Client,
    calls: Vec<Call>,
}

/// Handle to the reply of one pipelined command.
#[derive(Debug)]
pub struct PipelineSlot<C> {
    index: usize,
    command: C,
}

impl<C> PipelineSlot<C> {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<'a> Pipeline<'a> {
    pub fn add<C: FtCommand>(&mut self, command: C) -> Result<PipelineSlot<C>> {
        let args = self.client.arguments_of(&command)?;
        self.calls.push(Call::new(command.id(), args));
        Ok(PipelineSlot {
            index: self.calls.len() - 1,
            command,
        })
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn execute(self) -> Result<PipelineReplies> {
        let count = self.calls.len();
        let _timer = LatencyTimer::new("PIPELINE");
        debug!(commands = count, "Executing pipeline");
        metrics::record_pipeline_size(count);

        let result = self.client.transport.pipeline(&self.calls);
        for call in &self.calls {
            metrics::record_command(&call.id, if result.is_ok() { "success" } else { "error" });
        }
        let replies = result?;
        if replies.len() != count {
            return Err(Error::unexpected(
                "pipeline",
                format!("{} replies for {} commands", replies.len(), count),
            ));
        }
        Ok(PipelineReplies {
            client: self.client.clone(),
            replies: replies.into_iter().map(Some).collect(),
        })
    }
}

/// Replies of an executed pipeline, claimed through their slots.
pub struct PipelineReplies {
    client: Client,
    replies: Vec<Option<Reply>>,
}

impl PipelineReplies {
    pub fn take<C: FtCommand>(&mut self, slot: PipelineSlot<C>) -> Result<C::Output> {
        let reply = self
            .replies
            .get_mut(slot.index)
            .and_then(Option::take)
            .ok_or_else(|| Error::unexpected("pipeline", format!("no reply at {}", slot.index)))?;
        slot.command.parse_response(reply, Some(&self.client))
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{DictAdd, Search, SugLen};

    fn module_list(ver: i64) -> Reply {
        Reply::Array(vec![
            Reply::from(vec![Reply::from("name"), Reply::from("ReJSON"), Reply::from("ver"), Reply::Int(20606)]),
            Reply::from(vec![Reply::from("name"), Reply::from("search"), Reply::from("ver"), Reply::Int(ver)]),
        ])
    }

    #[test]
    fn test_detect_version() {
        let transport = Arc::new(MemoryTransport::new());
        transport.push_reply(module_list(20403));
        let client = Client::new(transport.clone());
        assert_eq!(client.detect_version().unwrap(), Version::new(2, 4, 3));
        assert_eq!(transport.last_call().unwrap(), Call::new("MODULE", vec!["LIST".into()]));
    }

    #[test]
    fn test_detect_version_without_module() {
        let transport = Arc::new(MemoryTransport::new());
        transport.push_reply(Reply::Array(vec![]));
        let client = Client::new(transport);
        assert!(matches!(client.detect_version(), Err(Error::UnexpectedServerResponse { .. })));
    }

    #[test]
    fn test_from_config_detects() {
        let transport = Arc::new(MemoryTransport::new());
        transport.push_reply(module_list(20200));
        let config = ClientConfig {
            protocol_version: "2.4.3".into(),
            detect_version: true,
            ..Default::default()
        };
        let client = Client::from_config(transport.clone(), &config).unwrap();
        // the configured version stays the target
        assert_eq!(client.version(), Some(&Version::new(2, 4, 3)));
        assert_eq!(transport.calls().len(), 1);
    }

    #[test]
    fn test_client_version_gates_commands() {
        let transport = Arc::new(MemoryTransport::new());
        transport.push_reply(Reply::Array(vec![Reply::Int(0)]));
        let client = Client::new(transport.clone()).with_version(Version::new(2, 2, 0));
        client.execute(&Search::new("idx", "*").dialect(2)).unwrap();
        assert_eq!(transport.last_call().unwrap().tokens(), vec!["idx", "*"]);
    }

    #[test]
    fn test_pipeline_zips_replies() {
        let transport = Arc::new(MemoryTransport::new());
        transport.push_reply(Reply::Int(3));
        transport.push_reply(Reply::Int(12));
        let client = Client::new(transport.clone());

        let mut pipeline = client.pipeline();
        let added = pipeline.add(DictAdd::new("dict", ["a", "b", "c"])).unwrap();
        let length = pipeline.add(SugLen::new("autocomplete")).unwrap();
        assert_eq!(pipeline.len(), 2);

        let mut replies = pipeline.execute().unwrap();
        assert_eq!(replies.take(length).unwrap(), 12);
        assert_eq!(replies.take(added).unwrap(), 3);
        assert_eq!(transport.calls()[1].id, "FT.SUGLEN");
    }

    #[test]
    fn test_pipeline_rejects_incomplete_command() {
        let transport = Arc::new(MemoryTransport::new());
        let client = Client::new(transport);
        let mut pipeline = client.pipeline();
        assert!(matches!(
            pipeline.add(Search::new("", "*")),
            Err(Error::MissingOption { .. })
        ));
        assert!(pipeline.is_empty());
    }
}
