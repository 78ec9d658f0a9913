use log::debug;

use super::cursor::{Cursor, EventPage, TimeRange};
use crate::error::Result;
use crate::model::{Event, RootRef};
use crate::query::Query;
use crate::store::RemoteStore;

/// Default cap on pages scanned in [`PageMode::FirstMatch`].
pub const DEFAULT_FIRST_MATCH_PAGE_LIMIT: u32 = 1000;

/// How many pages a fetch may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// Fetch at most this many pages (a value of 0 behaves as 1).
    Pages(u32),
    /// Keep fetching until a page yields at least one match or the log ends.
    FirstMatch,
}

impl Default for PageMode {
    fn default() -> Self {
        PageMode::Pages(1)
    }
}

impl From<u32> for PageMode {
    /// `0` selects [`PageMode::FirstMatch`], anything else is a page count.
    fn from(count: u32) -> Self {
        match count {
            0 => PageMode::FirstMatch,
            n => PageMode::Pages(n),
        }
    }
}

/// Parameters of a paged event fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    pub filter: Query,
    pub time: TimeRange,
    pub pages: PageMode,
    pub cursor: Cursor,
}

impl EventQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Query) -> Self {
        self.filter = filter;
        self
    }

    pub fn time(mut self, time: TimeRange) -> Self {
        self.time = time;
        self
    }

    pub fn pages(mut self, pages: impl Into<PageMode>) -> Self {
        self.pages = pages.into();
        self
    }

    /// Continue from a cursor returned by an earlier fetch.
    pub fn resume(mut self, cursor: Cursor) -> Self {
        self.cursor = cursor;
        self
    }

    /// Attribute filter first, then the time window.
    fn narrow(&self, events: Vec<Event>) -> Vec<Event> {
        self.filter
            .filter(events)
            .into_iter()
            .filter(|e| self.time.contains(e.timestamp))
            .collect()
    }
}

/// Reads a root's event log page by page.
pub struct EventPager<'a, S: RemoteStore + ?Sized> {
    store: &'a S,
    first_match_page_limit: u32,
}

impl<'a, S: RemoteStore + ?Sized> EventPager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            first_match_page_limit: DEFAULT_FIRST_MATCH_PAGE_LIMIT,
        }
    }

    pub fn with_first_match_limit(mut self, limit: u32) -> Self {
        self.first_match_page_limit = limit.max(1);
        self
    }

    /// Fetch, narrow and concatenate pages.
    ///
    /// Pages are requested strictly in order and merged in fetch order; the
    /// service's newest-first ordering is never re-sorted. The returned cursor
    /// is the last one observed, so a later call can resume from it.
    pub fn fetch(&self, root: &RootRef, query: &EventQuery) -> Result<EventPage> {
        let budget = match query.pages {
            PageMode::Pages(n) => n.max(1),
            PageMode::FirstMatch => self.first_match_page_limit,
        };
        let first_match = query.pages == PageMode::FirstMatch;

        let mut cursor = query.cursor.clone();
        let mut events = Vec::new();
        let mut fetched = 0u32;

        while !cursor.is_end() && fetched < budget && !(first_match && !events.is_empty()) {
            let page = self.store.fetch_event_page(root, &cursor)?;
            fetched += 1;

            let raw = page.events.len();
            let kept = query.narrow(page.events);
            debug!(
                "Event page {} for root {}: {} of {} events kept",
                fetched,
                root.id,
                kept.len(),
                raw
            );

            events.extend(kept);
            cursor = page.cursor;
        }

        if first_match && events.is_empty() && !cursor.is_end() {
            debug!(
                "Stopped scanning root {} after {} pages without a match",
                root.id, fetched
            );
        }

        Ok(EventPage::new(events, cursor))
    }
}
