//! Best-effort undo of recorded operations.
//!
//! An undo replays each selected history event back to the service as a
//! directive. Individual failures do not stop the batch; they are collected
//! in the [`UndoReport`] so the caller can see exactly which events were not
//! undone.

mod engine;
mod report;

pub use engine::UndoEngine;
pub use report::{UndoOutcome, UndoReport, UndoStatus};
