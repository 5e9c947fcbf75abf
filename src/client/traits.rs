// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use crate::error::Result;
use crate::option::Arg;
use crate::response::Reply;

/// One wire call: a protocol verb and its flat arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub id: String,
    pub args: Vec<Arg>,
}

impl Call {
    pub fn new(id: impl Into<String>, args: Vec<Arg>) -> Self {
        Self { id: id.into(), args }
    }

    /// Arguments as display strings (handy for assertions and logs).
    pub fn tokens(&self) -> Vec<String> {
        self.args.iter().map(ToString::to_string).collect()
    }
}

/// The only capability the command layer needs from a connection.
///
/// Both calls block until the reply is available. Timeouts, reconnects and
/// cancellation belong to the implementation.
pub trait Transport: Send + Sync {
    fn execute(&self, id: &str, args: &[Arg]) -> Result<Reply>;

    /// Send several calls, replies in call order.
    /// Default implementation falls back to sequential calls.
    fn pipeline(&self, calls: &[Call]) -> Result<Vec<Reply>> {
        calls.iter().map(|call| self.execute(&call.id, &call.args)).collect()
    }
}
