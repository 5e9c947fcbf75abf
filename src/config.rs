// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Configuration for the search client.
//!
//! # Example
//!
//! ```
//! use redisearch_protocol::ClientConfig;
//!
//! // Minimal config (uses defaults)
//! let config = ClientConfig::default();
//! assert_eq!(config.protocol_version, "2.0.0");
//! assert_eq!(config.default_page_size, 10);
//!
//! // Targeting a newer engine
//! let config = ClientConfig {
//!     redis_url: Some("redis://localhost:6379".into()),
//!     protocol_version: "2.4.3".into(),
//!     ..Default::default()
//! };
//! assert_eq!(config.protocol_version().unwrap().minor, 4);
//! ```

use semver::Version;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Configuration for [`Client`](crate::Client) and the redis transport.
///
/// Every field has a default, so a config can be deserialized from a
/// partial document.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Redis connection string (e.g., "redis://localhost:6379")
    #[serde(default)]
    pub redis_url: Option<String>,

    /// RediSearch version commands are built for (semver, default "2.0.0")
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,

    /// Ask the server for its module version on connect (`MODULE LIST`)
    #[serde(default)]
    pub detect_version: bool,

    /// Silence the warning emitted when `protocol_version` is newer than
    /// the version the server reports
    #[serde(default)]
    pub suppress_version_warning: bool,

    /// Page size assumed when a paginated command carries no LIMIT
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// COUNT sent with cursor reads when the originating aggregate did not set one
    #[serde(default)]
    pub cursor_read_size: Option<usize>,
}

fn default_protocol_version() -> String { "2.0.0".to_string() }
fn default_page_size() -> usize { 10 }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            protocol_version: default_protocol_version(),
            detect_version: false,
            suppress_version_warning: false,
            default_page_size: default_page_size(),
            cursor_read_size: None,
        }
    }
}

impl ClientConfig {
    /// Parse the configured protocol version.
    pub fn protocol_version(&self) -> Result<Version> {
        crate::version::parse_version(&self.protocol_version)
    }

    /// The redis URL, or an error naming the missing setting.
    pub fn redis_url(&self) -> Result<&str> {
        self.redis_url
            .as_deref()
            .ok_or_else(|| Error::Transport("redis_url is not configured".to_string()))
    }
}
