//! Records returned by the remote store.
//!
//! Field names follow the service's JSON; anything the client does not model
//! explicitly is kept in an `extra` map so callers can still reach it.

mod account;
mod entry;
mod event;
mod root;
mod share;
mod version;

pub use account::AppPassword;
pub use entry::Entry;
pub use event::{Event, OpType};
pub use root::{AclRule, NewRoot, RootAcl, RootMetadata, RootRef, RootUpdate, StorageRoot};
pub use share::{ShareInfo, ShareListing, ShareUpdate};
pub use version::FileVersion;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept tokens the service sends either as strings or as bare numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}
