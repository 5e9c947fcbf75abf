// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! # RediSearch Protocol
//!
//! Typed construction of RediSearch commands and interpretation of their
//! replies.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Query Language                         │
//! │  • QueryNode tree: words, phrases, facets, groups, KNN      │
//! │  • Escaping and priority ordering at render time            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ query string
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Commands + Option Algebra                   │
//! │  • Named slots in declaration order, required checks       │
//! │  • Version gates filter options for the target release     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ Vec<Arg>
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Client + Transport                       │
//! │  • Single calls and pipelines over redis or a script       │
//! │  • MODULE LIST version detection                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ Reply
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Responses                            │
//! │  • Documents, aggregate rows, info, suggestions            │
//! │  • LIMIT pagination and server-side cursors                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use redisearch_protocol::client::{Client, MemoryTransport};
//! use redisearch_protocol::command::Search;
//! use redisearch_protocol::query::QueryBuilder;
//! use redisearch_protocol::response::Reply;
//!
//! let transport = Arc::new(MemoryTransport::new());
//! transport.push_reply(Reply::Array(vec![
//!     Reply::Int(1),
//!     Reply::from("user:1"),
//!     Reply::from(vec!["name", "Alice"]),
//! ]));
//! let client = Client::new(transport.clone());
//!
//! let query = QueryBuilder::new().field_eq("name", "Alice").render();
//! let response = client.execute(&Search::new("users", query).limit(0, 10)).unwrap();
//!
//! assert_eq!(response.total(), 1);
//! assert_eq!(response.items()[0].get("name").as_deref(), Some("Alice"));
//! assert_eq!(
//!     transport.last_call().unwrap().tokens(),
//!     ["users", "@name:Alice", "LIMIT", "0", "10"]
//! );
//! ```
//!
//! ## Configuration
//!
//! See [`ClientConfig`] for all configuration options.
//!
//! ## Modules
//!
//! - [`option`]: The option algebra every command is assembled from
//! - [`command`]: Protocol commands (`FT.SEARCH`, `FT.AGGREGATE`, `FT.CREATE`, ...)
//! - [`query`]: Query language tree and escaping
//! - [`response`]: Reply shapes, pagination and cursors
//! - [`client`]: Client facade and transports
//! - [`version`]: Compatibility ranges over module versions

pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod metrics;
pub mod option;
pub mod query;
pub mod response;
pub mod version;

pub use client::{Client, MemoryTransport, RedisTransport, Transport};
pub use command::{Command, FtCommand, PaginatedCommand};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use query::{QueryBuilder, QueryNode};
pub use response::{CursorResponse, PaginatedResponse, Reply};
pub use version::{since, Compatibility};
pub use metrics::LatencyTimer;
