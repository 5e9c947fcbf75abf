// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for the protocol client.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The embedding application is responsible for choosing the exporter (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `redisearch_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `command`: protocol verb, e.g. `FT.SEARCH`
//! - `status`: success, error
//! - `kind`: paginated, cursor

use metrics::{counter, histogram};
use std::time::{Duration, Instant};

/// Record a command round trip outcome
pub fn record_command(command: &str, status: &str) {
    counter!(
        "redisearch_commands_total",
        "command" => command.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record command latency
pub fn record_latency(command: &str, duration: Duration) {
    histogram!(
        "redisearch_command_seconds",
        "command" => command.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record the number of commands sent in one pipeline
pub fn record_pipeline_size(count: usize) {
    histogram!("redisearch_pipeline_size").record(count as f64);
}

/// Record a page refetch issued by a result iterator
pub fn record_page_fetch(kind: &str) {
    counter!(
        "redisearch_page_fetches_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// A timing guard that records latency on drop
pub struct LatencyTimer {
    command: String,
    start: Instant,
}

impl LatencyTimer {
    /// Start a new latency timer
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_latency(&self.command, self.start.elapsed());
    }
}
