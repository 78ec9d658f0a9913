//! High-level operations addressed by virtual path.
//!
//! [`Client`] owns a [`RemoteStore`] and routes every call through the path
//! resolver first. Passing a [`Resolved`] location instead of a string skips
//! the root listing, which saves a round trip when chaining calls on the same
//! root.

mod account;
mod bookmarks;
mod entries;
mod roots;
mod shares;

use crate::config::ClientConfig;
use crate::error::{JianguoError, Result};
use crate::events::{EventPage, EventPager, EventQuery, PageMode, TimeRange};
use crate::query::{Attr, Query};
use crate::resolver::{Location, PathResolver, Resolved};
use crate::store::{HttpStore, RemoteStore};
use crate::undo::{UndoEngine, UndoReport};

/// Path-addressed façade over a [`RemoteStore`].
pub struct Client<S: RemoteStore> {
    store: S,
    default_root_name: String,
    first_match_page_limit: u32,
}

impl Client<HttpStore> {
    /// Connect with the session cookie from `config`.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_config(HttpStore::from_config(config)?, config))
    }

    /// Log out and drop the session.
    pub fn logout(self) -> Result<()> {
        self.store.logout()
    }
}

impl<S: RemoteStore> Client<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, &ClientConfig::default())
    }

    pub fn with_config(store: S, config: &ClientConfig) -> Self {
        Self {
            store,
            default_root_name: config.default_root_name.clone(),
            first_match_page_limit: config.first_match_page_limit,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn resolver(&self) -> PathResolver<'_, S> {
        PathResolver::new(&self.store).with_default_root_name(&self.default_root_name)
    }

    pub fn pager(&self) -> EventPager<'_, S> {
        EventPager::new(&self.store).with_first_match_limit(self.first_match_page_limit)
    }

    /// Resolve a virtual path against the live roots.
    pub fn resolve(&self, virtual_path: &str) -> Result<Resolved> {
        self.resolver().resolve(virtual_path, false)
    }

    pub fn locate<'a>(&self, location: impl Into<Location<'a>>) -> Result<Resolved> {
        self.resolver().locate(location.into(), false)
    }

    /// Filtered, paged history of the location's root.
    ///
    /// Unless `query` already mentions [`Attr::Path`], only events on the
    /// location's own path are kept (no restriction for a bare root).
    pub fn events<'a>(
        &self,
        location: impl Into<Location<'a>>,
        query: EventQuery,
    ) -> Result<EventPage> {
        let resolved = self.locate(location)?;
        let query = scoped_to(query, &resolved);
        self.pager().fetch(&resolved.root, &query)
    }

    /// Undo the newest page window with any event matching `filter` and `time`.
    pub fn undo<'a>(
        &self,
        location: impl Into<Location<'a>>,
        filter: Query,
        time: TimeRange,
    ) -> Result<UndoReport> {
        let query = EventQuery::new()
            .filter(filter)
            .time(time)
            .pages(PageMode::FirstMatch);
        self.undo_with(location, query)
    }

    /// Undo every event `query` selects.
    pub fn undo_with<'a>(
        &self,
        location: impl Into<Location<'a>>,
        query: EventQuery,
    ) -> Result<UndoReport> {
        let resolved = self.locate(location)?;
        let query = scoped_to(query, &resolved);
        UndoEngine::with_pager(&self.store, self.pager()).undo_with(&resolved.root, &query)
    }
}

fn scoped_to(mut query: EventQuery, resolved: &Resolved) -> EventQuery {
    if !resolved.path.is_empty() {
        query.filter.default_to(Attr::Path, resolved.path.as_str());
    }
    query
}

/// Refuse a write when the caller's token differs from the current one.
fn ensure_current(path: &str, expected: Option<&str>, current: &str) -> Result<()> {
    match expected {
        Some(expected) if expected != current => Err(JianguoError::StaleRevision {
            path: path.to_string(),
            expected: expected.to_string(),
            current: Some(current.to_string()),
        }),
        _ => Ok(()),
    }
}
