use std::fmt;

/// The authenticated session: a pre-established cookie string.
///
/// Exactly one `Session` exists per [`HttpStore`](super::HttpStore); it is not
/// `Clone` so cookie state cannot diverge between copies.
pub struct Session {
    cookie: String,
}

impl Session {
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
        }
    }

    pub(crate) fn cookie(&self) -> &str {
        &self.cookie
    }

    pub fn is_empty(&self) -> bool {
        self.cookie.trim().is_empty()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("cookie", &"<redacted>")
            .finish()
    }
}
