//! # jianguo-client
//!
//! A client library for a remote hierarchical file-storage service organised
//! into named storage roots.
//!
//! ## Overview
//!
//! Callers address everything through virtual paths such as
//! `"Shared/docs/report.txt"`, where the first segment names a storage root.
//! The library resolves the root, filters listings with declarative
//! attribute queries, pages through the per-root event history, and undoes
//! recorded operations in bulk.
//!
//! ## Architecture
//!
//! - Attribute matching over any record type ([`query`])
//! - Virtual path to root resolution ([`resolver`])
//! - Cursor-based history paging ([`events`])
//! - Best-effort bulk undo ([`undo`])
//! - Service access behind a trait, with the HTTP implementation ([`store`])
//! - Path-addressed operations on roots, entries and shares ([`client`])
//! - Configuration, errors and logging ([`config`], [`error`], [`logger`])

/// Path-addressed façade combining the resolver, pager and undo engine.
///
/// Every operation accepts either a virtual path or an already resolved
/// location, re-reads revision tokens before writing, and reports a stale
/// token instead of overwriting newer state.
pub mod client;

/// Platform-aware config directory and the persisted client settings.
pub mod config;

/// Error type shared by every operation.
pub mod error;

/// Cursor-based paging through a root's event history.
///
/// Supports fixed page counts and find-first-match scans, filtering each
/// page by attribute query and time window while preserving service order.
pub mod events;

/// Console and file logging.
pub mod logger;

/// Records returned by the service: roots, entries, events and shares.
pub mod model;

/// Declarative attribute queries with conjunctive and disjunctive modes.
pub mod query;

/// Maps virtual paths to a storage root and a root-relative path.
pub mod resolver;

/// The [`store::RemoteStore`] seam and its HTTP implementation.
pub mod store;

/// Replays history events as undo directives and reports per-event outcomes.
pub mod undo;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{JianguoError, Result};
pub use events::{Cursor, EventPage, EventQuery, PageMode, TimeRange};
pub use query::{Attr, AttrValue, MatchMode, Query, Record};
pub use resolver::{Location, Resolved};
pub use store::{HttpStore, RemoteStore};
pub use undo::{UndoReport, UndoStatus};
