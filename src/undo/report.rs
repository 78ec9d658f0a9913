use std::fmt;

use crate::events::Cursor;
use crate::model::Event;

/// Overall result of an undo batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoStatus {
    Success,
    PartialFailure,
}

/// What happened to one replayed event.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoOutcome {
    pub event: Event,
    /// `None` when the compensating write was accepted.
    pub error: Option<String>,
}

impl UndoOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-event outcomes of an undo batch, in replay order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UndoReport {
    pub outcomes: Vec<UndoOutcome>,
    /// Event-log cursor after the window was fetched.
    pub cursor: Cursor,
}

impl UndoReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &UndoOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    pub fn status(&self) -> UndoStatus {
        if self.failures().next().is_some() {
            UndoStatus::PartialFailure
        } else {
            UndoStatus::Success
        }
    }
}

impl fmt::Display for UndoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Undid {} of {} events",
            self.succeeded(),
            self.attempted()
        )?;
        for failure in self.failures() {
            write!(
                f,
                "\n  {} {}: {}",
                failure.event.op_type.as_str(),
                failure.event.path,
                failure.error.as_deref().unwrap_or_default()
            )?;
        }
        Ok(())
    }
}
