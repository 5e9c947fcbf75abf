// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Transport over a synchronous `redis` connection.
//!
//! ```rust,no_run
//! # use redisearch_protocol::client::RedisTransport;
//! # fn example() -> Result<(), redisearch_protocol::Error> {
//! let transport = RedisTransport::connect("redis://localhost:6379")?;
//! # Ok(())
//! # }
//! ```

use parking_lot::Mutex;
use redis::{RedisWrite, ToRedisArgs, Value};
use tracing::info;

use super::traits::{Call, Transport};
use crate::error::{Error, Result};
use crate::option::Arg;
use crate::response::Reply;

pub struct RedisTransport {
    connection: Mutex<redis::Connection>,
}

impl RedisTransport {
    pub fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let connection = client.get_connection()?;
        info!(url = %redact(url), "Connected to search engine");
        Ok(Self::from_connection(connection))
    }

    pub fn from_connection(connection: redis::Connection) -> Self {
        Self {
            connection: Mutex::new(connection),
        }
    }
}

// Never log credentials embedded in the URL.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => format!("{}://***{}", &url[..scheme], &url[at..]),
        _ => url.to_string(),
    }
}

impl ToRedisArgs for Arg {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        match self {
            Arg::Bytes(bytes) => out.write_arg(bytes),
            Arg::Int(i) => i.write_redis_args(out),
            // our Display spells infinities the way the engine parses them
            other => out.write_arg(other.to_string().as_bytes()),
        }
    }
}

impl Transport for RedisTransport {
    fn execute(&self, id: &str, args: &[Arg]) -> Result<Reply> {
        let mut cmd = redis::cmd(id);
        for arg in args {
            cmd.arg(arg);
        }
        let value: Value = cmd.query(&mut *self.connection.lock())?;
        to_reply(value)
    }

    fn pipeline(&self, calls: &[Call]) -> Result<Vec<Reply>> {
        let mut pipe = redis::pipe();
        for call in calls {
            pipe.cmd(&call.id);
            for arg in &call.args {
                pipe.arg(arg);
            }
        }
        let values: Vec<Value> = pipe.query(&mut *self.connection.lock())?;
        values.into_iter().map(to_reply).collect()
    }
}

/// Convert a `redis` value. RESP3 maps and sets are flattened to the
/// RESP2 shapes the parsers expect.
fn to_reply(value: Value) -> Result<Reply> {
    Ok(match value {
        Value::Nil => Reply::Nil,
        Value::Int(i) => Reply::Int(i),
        Value::Double(d) => Reply::Double(d),
        Value::Boolean(b) => Reply::Int(i64::from(b)),
        Value::BulkString(bytes) => Reply::Bulk(bytes),
        Value::SimpleString(s) => Reply::Status(s),
        Value::Okay => Reply::Status("OK".to_string()),
        Value::VerbatimString { text, .. } => Reply::Bulk(text.into_bytes()),
        Value::Array(items) | Value::Set(items) => {
            Reply::Array(items.into_iter().map(to_reply).collect::<Result<_>>()?)
        }
        Value::Map(pairs) => {
            let mut flat = Vec::with_capacity(pairs.len() * 2);
            for (key, value) in pairs {
                flat.push(to_reply(key)?);
                flat.push(to_reply(value)?);
            }
            Reply::Array(flat)
        }
        Value::Attribute { data, .. } => to_reply(*data)?,
        Value::ServerError(err) => return Err(Error::Server(format!("{:?}", err))),
        other => return Err(Error::unexpected("redis value", other)),
    })
}
