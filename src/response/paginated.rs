// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! LIMIT-based pagination over a re-issuable command.
//!
//! ```text
//!            next()                    current()
//! fresh ──────────────► advance ─────────────────► refetched
//!   ▲    offset += size  requested   reissue with       │
//!   └──────────────────────────────  LIMIT offset size ◄┘
//! ```
//!
//! The response is exhausted once the requested offset reaches the total
//! reported by the last reply, or when the page size is zero.

use tracing::debug;

use crate::client::Client;
use crate::command::PaginatedCommand;
use crate::error::{Error, Result};
use crate::metrics;

/// Engine default when a command carries no LIMIT.
pub(crate) const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug)]
pub struct PaginatedResponse<C: PaginatedCommand> {
    command: C,
    items: Vec<C::Item>,
    total: usize,
    offset: usize,
    page_size: usize,
    client: Option<Client>,
    stale: bool,
}

impl<C: PaginatedCommand> PaginatedResponse<C> {
    pub fn new(command: C, total: usize, items: Vec<C::Item>, client: Option<Client>) -> Self {
        let default_size = client.as_ref().map_or(DEFAULT_PAGE_SIZE, Client::default_page_size);
        let (offset, page_size) = command.page().unwrap_or((0, default_size));
        Self {
            command,
            items,
            total,
            offset,
            page_size,
            client,
            stale: false,
        }
    }

    /// Items of the last fetched page. Does not refetch; see [`Self::current`].
    pub fn items(&self) -> &[C::Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<C::Item> {
        self.items
    }

    /// Total reported by the last reply.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Offset of the current (or requested) page.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        if self.page_size == 0 {
            0
        } else {
            self.total.div_ceil(self.page_size)
        }
    }

    /// Zero-based index of the current page.
    pub fn current_page(&self) -> usize {
        if self.page_size == 0 {
            0
        } else {
            self.offset / self.page_size
        }
    }

    pub fn valid(&self) -> bool {
        self.page_size > 0 && self.offset < self.total
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Request the following page. The round trip happens on the next
    /// [`Self::current`] call.
    pub fn next(&mut self) -> Result<()> {
        if self.client.is_none() {
            return Err(Error::MissingClient);
        }
        self.offset = self.offset.saturating_add(self.page_size);
        self.stale = true;
        Ok(())
    }

    /// Items of the current page, fetching them first if [`Self::next`]
    /// was called since the last fetch.
    pub fn current(&mut self) -> Result<&[C::Item]> {
        if self.stale {
            if self.valid() {
                self.refetch()?;
            } else {
                self.items.clear();
            }
            self.stale = false;
        }
        Ok(&self.items)
    }

    fn refetch(&mut self) -> Result<()> {
        let client = self.client.as_ref().ok_or(Error::MissingClient)?;
        let mut command = self.command.clone();
        command.set_page(self.offset, self.page_size);
        debug!(command = command.id(), offset = self.offset, size = self.page_size, "Fetching page");

        let reply = client.execute_raw(&command)?;
        let (total, items) = command.parse_page(reply)?;
        metrics::record_page_fetch("paginated");

        self.command = command;
        self.total = total;
        self.items = items;
        Ok(())
    }

    /// Iterate page by page, starting with the page already held.
    pub fn pages(self) -> PaginatedPages<C> {
        PaginatedPages {
            response: self,
            started: false,
            done: false,
        }
    }
}

/// Iterator returned by [`PaginatedResponse::pages`].
pub struct PaginatedPages<C: PaginatedCommand> {
    response: PaginatedResponse<C>,
    started: bool,
    done: bool,
}

impl<C: PaginatedCommand> Iterator for PaginatedPages<C> {
    type Item = Result<Vec<C::Item>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.started {
            let response = &self.response;
            // Avoid asking for a client when there is nothing left anyway.
            if response.page_size == 0 || response.offset + response.page_size >= response.total {
                self.done = true;
                return None;
            }
            if let Err(e) = self.response.next() {
                self.done = true;
                return Some(Err(e));
            }
        }
        self.started = true;
        if !self.response.valid() && self.response.items.is_empty() {
            self.done = true;
            return None;
        }
        match self.response.current() {
            Ok(_) => Some(Ok(std::mem::take(&mut self.response.items))),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
