use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::model::Event;

/// Position in a root's paged event log.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Newest page; no marker is sent.
    #[default]
    Start,
    /// Opaque marker issued by the service for the next page.
    At(String),
    /// Terminal marker (`1`): no further pages exist.
    End,
}

impl Cursor {
    const TERMINAL: &'static str = "1";
    const INITIAL: &'static str = "0";

    /// Interpret a `marker` value from an events response.
    ///
    /// A missing, null or empty marker is taken as terminal so a malformed
    /// page can never restart or prolong a scan.
    pub fn from_marker(value: Option<&Value>) -> Self {
        let raw = match value {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Cursor::End,
        };
        Self::from_token(raw)
    }

    pub fn from_token(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match raw.as_str() {
            Self::TERMINAL | "" => Cursor::End,
            Self::INITIAL => Cursor::Start,
            _ => Cursor::At(raw),
        }
    }

    /// The `marker` query parameter to send, if any.
    pub fn marker(&self) -> Option<&str> {
        match self {
            Cursor::Start => None,
            Cursor::At(token) => Some(token),
            Cursor::End => Some(Self::TERMINAL),
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Cursor::End)
    }
}

/// Events plus the cursor to resume from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub cursor: Cursor,
}

impl EventPage {
    pub fn new(events: Vec<Event>, cursor: Cursor) -> Self {
        Self { events, cursor }
    }

    /// True when the log has been read to its end. Not an error: an exhausted
    /// page with no events is a valid "nothing matched" answer.
    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_end()
    }
}

/// Half-open timestamp window `from <= t < to`, in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeRange {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl TimeRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn millis(from: Option<i64>, to: Option<i64>) -> Self {
        Self { from, to }
    }

    pub fn since(from: DateTime<Utc>) -> Self {
        Self {
            from: Some(from.timestamp_millis()),
            to: None,
        }
    }

    pub fn until(to: DateTime<Utc>) -> Self {
        Self {
            from: None,
            to: Some(to.timestamp_millis()),
        }
    }

    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from.timestamp_millis()),
            to: Some(to.timestamp_millis()),
        }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.from.map_or(true, |from| timestamp >= from) && self.to.map_or(true, |to| timestamp < to)
    }
}
