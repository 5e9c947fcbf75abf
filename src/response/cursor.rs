// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Server-side cursor iteration for `FT.AGGREGATE ... WITHCURSOR`.
//!
//! The first reply is `[[total, row...], cursor_id]`; each `FT.CURSOR READ`
//! returns the same shape with a new id. The engine reports 0 as the total
//! of cursor reads, so the total seen first is kept for the whole walk.
//! A cursor id of 0 means the server has nothing more.

use semver::Version;
use tracing::debug;

use super::{expect_array, expect_int, parse_aggregate_page, AggregateRow, Reply};
use crate::client::Client;
use crate::command::{CursorDelete, CursorRead};
use crate::error::{Error, Result};
use crate::metrics;

#[derive(Debug)]
pub struct CursorResponse {
    index: String,
    cursor_id: i64,
    items: Vec<AggregateRow>,
    total: usize,
    offset: usize,
    page_size: Option<usize>,
    version: Option<Version>,
    client: Option<Client>,
    pending: bool,
}

fn parse_cursor_reply(reply: Reply) -> Result<(usize, Vec<AggregateRow>, i64)> {
    const CONTEXT: &str = "FT.AGGREGATE WITHCURSOR";
    let mut parts = expect_array(reply, CONTEXT)?;
    if parts.len() != 2 {
        return Err(Error::unexpected(CONTEXT, parts));
    }
    let cursor_id = expect_int(&parts[1], CONTEXT)?;
    let page = parts.swap_remove(0);
    let (total, rows) = parse_aggregate_page(expect_array(page, CONTEXT)?)?;
    Ok((total, rows, cursor_id))
}

impl CursorResponse {
    pub(crate) fn from_reply(
        reply: Reply,
        index: String,
        page_size: Option<usize>,
        version: Option<Version>,
        client: Option<Client>,
    ) -> Result<Self> {
        let (total, items, cursor_id) = parse_cursor_reply(reply)?;
        Ok(Self {
            index,
            cursor_id,
            items,
            total,
            offset: 0,
            page_size,
            version,
            client,
            pending: false,
        })
    }

    pub fn cursor_id(&self) -> i64 {
        self.cursor_id
    }

    pub fn items(&self) -> &[AggregateRow] {
        &self.items
    }

    /// Total reported by the first reply.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Rows consumed before the current page.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    pub fn valid(&self) -> bool {
        self.cursor_id > 0 && self.offset + self.items.len() < self.total
    }

    /// Request the following page; read on the next [`Self::current`] call.
    pub fn next(&mut self) -> Result<()> {
        if self.client.is_none() {
            return Err(Error::MissingClient);
        }
        self.pending = true;
        Ok(())
    }

    pub fn current(&mut self) -> Result<&[AggregateRow]> {
        if self.pending {
            self.pending = false;
            if self.cursor_id > 0 {
                self.read()?;
            } else {
                self.offset += self.items.len();
                self.items.clear();
            }
        }
        Ok(&self.items)
    }

    fn read(&mut self) -> Result<()> {
        let client = self.client.as_ref().ok_or(Error::MissingClient)?;
        let command = CursorRead::new(self.index.as_str(), self.cursor_id)
            .count(self.page_size)
            .with_version(self.version.clone());
        debug!(index = %self.index, cursor = self.cursor_id, offset = self.offset, "Reading cursor");

        let (_, items, cursor_id) = parse_cursor_reply(client.execute_raw(&command)?)?;
        metrics::record_page_fetch("cursor");

        self.offset += self.items.len();
        self.items = items;
        self.cursor_id = cursor_id;
        Ok(())
    }

    /// Release the server-side cursor early. A no-op once exhausted.
    pub fn close(self) -> Result<()> {
        if self.cursor_id <= 0 {
            return Ok(());
        }
        let client = self.client.as_ref().ok_or(Error::MissingClient)?;
        client.execute(&CursorDelete::new(self.index.as_str(), self.cursor_id))
    }

    /// Iterate page by page, starting with the page already held.
    pub fn pages(self) -> CursorPages {
        CursorPages {
            response: self,
            started: false,
            done: false,
        }
    }
}

/// Iterator returned by [`CursorResponse::pages`].
pub struct CursorPages {
    response: CursorResponse,
    started: bool,
    done: bool,
}

impl Iterator for CursorPages {
    type Item = Result<Vec<AggregateRow>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.started {
            if !self.response.valid() {
                self.done = true;
                return None;
            }
            if let Err(e) = self.response.next() {
                self.done = true;
                return Some(Err(e));
            }
        }
        self.started = true;
        match self.response.current() {
            Ok(rows) if rows.is_empty() => {
                self.done = true;
                None
            }
            Ok(_) => {
                // Keep the count so offsets stay right after the items move out.
                let rows = std::mem::take(&mut self.response.items);
                self.response.offset += rows.len();
                Some(Ok(rows))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
