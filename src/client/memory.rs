// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::traits::{Call, Transport};
use crate::error::{Error, Result};
use crate::option::Arg;
use crate::response::Reply;

/// Scripted transport: replies are handed out in the order they were queued
/// and every call is recorded.
///
/// ```
/// use redisearch_protocol::client::{MemoryTransport, Transport};
/// use redisearch_protocol::response::Reply;
///
/// let transport = MemoryTransport::new();
/// transport.push_reply(Reply::Status("OK".into()));
/// let reply = transport.execute("FT.DICTADD", &["dict".into(), "foo".into()]).unwrap();
/// assert!(reply.is_ok());
/// assert_eq!(transport.calls()[0].tokens(), ["dict", "foo"]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryTransport {
    replies: Mutex<VecDeque<Result<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl MemoryTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: Reply) {
        self.replies.lock().push_back(Ok(reply));
    }

    /// Queue a failure, e.g. `Error::Server("Unknown Index name".into())`.
    pub fn push_error(&self, error: Error) {
        self.replies.lock().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().last().cloned()
    }

    /// Replies not consumed yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.replies.lock().len()
    }

    pub fn clear(&self) {
        self.replies.lock().clear();
        self.calls.lock().clear();
    }
}

impl Transport for MemoryTransport {
    fn execute(&self, id: &str, args: &[Arg]) -> Result<Reply> {
        self.calls.lock().push(Call::new(id, args.to_vec()));
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport(format!("no scripted reply for {}", id))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replies_in_order() {
        let transport = MemoryTransport::new();
        transport.push_reply(Reply::Int(1));
        transport.push_error(Error::Server("boom".into()));
        assert_eq!(transport.execute("A", &[]).unwrap(), Reply::Int(1));
        assert_eq!(transport.execute("B", &[]), Err(Error::Server("boom".into())));
        assert!(matches!(transport.execute("C", &[]), Err(Error::Transport(_))));
        assert_eq!(transport.calls().len(), 3);
        assert_eq!(transport.last_call().unwrap().id, "C");
    }

    #[test]
    fn test_default_pipeline_is_sequential() {
        let transport = MemoryTransport::new();
        transport.push_reply(Reply::Int(1));
        transport.push_reply(Reply::Int(2));
        let replies = transport
            .pipeline(&[Call::new("A", vec![]), Call::new("B", vec!["x".into()])])
            .unwrap();
        assert_eq!(replies, vec![Reply::Int(1), Reply::Int(2)]);
        assert_eq!(transport.pending(), 0);
        assert_eq!(transport.calls()[1].tokens(), vec!["x"]);
    }
}
