// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Crate-wide error type.
//!
//! Errors fall into four groups:
//! - **Construction**: raised by the call that violates an invariant
//!   (`NotEnoughFields`, `NotEnoughTerms`, `InvalidValue`, `OutOfRange`)
//! - **Composition**: raised while assembling arguments (`MissingOption`,
//!   `LockedOption`, `UnknownOption`)
//! - **Protocol shape**: the reply does not match the issuing command
//!   (`UnexpectedServerResponse`, `Server`)
//! - **Resource**: an iterator needs a round trip but has no transport
//!   (`MissingClient`), or the transport itself failed (`Transport`)
//!
//! Nothing here is retried internally.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("missing required option(s): {}", names.join(", "))]
    MissingOption { names: Vec<String> },

    #[error("option '{name}' is locked and cannot be modified")]
    LockedOption { name: String },

    #[error("unknown option '{name}'")]
    UnknownOption { name: String },

    #[error("at least one field is required")]
    NotEnoughFields,

    #[error("at least one term is required")]
    NotEnoughTerms,

    #[error("invalid {what}: '{value}'")]
    InvalidValue { what: &'static str, value: String },

    #[error("{what} out of range: {value}")]
    OutOfRange { what: &'static str, value: String },

    #[error("invalid protocol version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("unexpected server response for {context}: {reply}")]
    UnexpectedServerResponse { context: String, reply: String },

    #[error("no client attached to fetch more results")]
    MissingClient,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("server error: {0}")]
    Server(String),
}

impl Error {
    pub(crate) fn unexpected(context: impl Into<String>, reply: impl std::fmt::Debug) -> Self {
        Error::UnexpectedServerResponse {
            context: context.into(),
            reply: format!("{:?}", reply),
        }
    }

    pub(crate) fn invalid(what: &'static str, value: impl Into<String>) -> Self {
        Error::InvalidValue {
            what,
            value: value.into(),
        }
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        if err.kind() == redis::ErrorKind::ResponseError || err.kind() == redis::ErrorKind::ExtensionError {
            Error::Server(err.to_string())
        } else {
            Error::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
