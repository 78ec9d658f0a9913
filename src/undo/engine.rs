use log::{info, warn};

use super::report::{UndoOutcome, UndoReport};
use crate::error::Result;
use crate::events::{EventPager, EventQuery, PageMode, TimeRange};
use crate::model::RootRef;
use crate::query::Query;
use crate::store::{RemoteStore, UndoDirective, WriteOp};

/// Replays historical events as compensating writes.
pub struct UndoEngine<'a, S: RemoteStore + ?Sized> {
    store: &'a S,
    pager: EventPager<'a, S>,
}

impl<'a, S: RemoteStore + ?Sized> UndoEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            pager: EventPager::new(store),
        }
    }

    pub fn with_pager(store: &'a S, pager: EventPager<'a, S>) -> Self {
        Self { store, pager }
    }

    /// Undo the events of the most recent page window that has any match.
    pub fn undo(&self, root: &RootRef, filter: Query, time: TimeRange) -> Result<UndoReport> {
        let query = EventQuery::new()
            .filter(filter)
            .time(time)
            .pages(PageMode::FirstMatch);
        self.undo_with(root, &query)
    }

    /// Undo every event `query` selects.
    ///
    /// Events are replayed in the order the pager returns them (newest
    /// first). A failed compensating write is recorded and the batch moves on
    /// to the next event; only failing to fetch the events fails the call.
    pub fn undo_with(&self, root: &RootRef, query: &EventQuery) -> Result<UndoReport> {
        let page = self.pager.fetch(root, query)?;
        info!(
            "Undoing {} events on root {}",
            page.events.len(),
            root.id
        );

        let mut outcomes = Vec::with_capacity(page.events.len());
        for event in page.events {
            let op = WriteOp::Undo(UndoDirective::from(&event));
            let error = match self.store.submit_write(root, &op) {
                Ok(()) => None,
                Err(e) => {
                    warn!(
                        "Failed to undo {} {}: {}",
                        event.op_type.as_str(),
                        event.path,
                        e
                    );
                    Some(e.to_string())
                }
            };
            outcomes.push(UndoOutcome { event, error });
        }

        Ok(UndoReport {
            outcomes,
            cursor: page.cursor,
        })
    }
}
