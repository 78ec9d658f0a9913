//! Error types for storage-root operations.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, JianguoError>;

/// Errors that can occur while talking to the remote store.
#[derive(Debug, Error)]
pub enum JianguoError {
    /// Zero or several storage roots carry the requested display name.
    #[error("no unique storage root named {name:?} ({matches} candidates)")]
    AmbiguousOrMissingRoot { name: String, matches: usize },

    /// A write was attempted with an out-of-date revision token.
    #[error("stale revision for {path}: {expected} is no longer current{}", .current.as_deref().map_or(String::new(), |c| format!(" (now {c})")))]
    StaleRevision {
        path: String,
        expected: String,
        current: Option<String>,
    },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    /// The service accepted an asynchronous job but reported a non-success state.
    #[error("{operation} did not succeed (state: {state})")]
    OperationFailed { operation: String, state: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl JianguoError {
    /// Returns true if the remote call did not complete at the network/HTTP level.
    pub fn is_transport(&self) -> bool {
        matches!(self, JianguoError::Transport(_) | JianguoError::Http(_))
    }

    /// Returns true if this error reports a revision conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, JianguoError::StaleRevision { .. })
    }
}
