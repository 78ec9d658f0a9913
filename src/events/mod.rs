//! Paged access to a storage root's operation history.
//!
//! The service hands out history newest-first in pages bounded by an opaque
//! marker. [`EventPager`] walks those pages in order, narrows each one with a
//! [`Query`](crate::query::Query) and a [`TimeRange`], and stops either after
//! a fixed number of pages or, in [`PageMode::FirstMatch`], at the first page
//! that yields a match.

mod cursor;
mod pager;

pub use cursor::{Cursor, EventPage, TimeRange};
pub use pager::{EventPager, EventQuery, PageMode, DEFAULT_FIRST_MATCH_PAGE_LIMIT};
