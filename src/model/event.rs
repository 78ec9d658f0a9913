use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::string_or_number;
use crate::query::{Attr, AttrValue, Record};

/// Kind of change recorded in the operation history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OpType {
    Add,
    Delete,
    Edit,
    Rename,
    Restore,
    Move,
    /// Any op type this client does not know by name.
    Other(String),
}

impl OpType {
    pub fn as_str(&self) -> &str {
        match self {
            OpType::Add => "ADD",
            OpType::Delete => "DELETE",
            OpType::Edit => "EDIT",
            OpType::Rename => "RENAME",
            OpType::Restore => "RESTORE",
            OpType::Move => "MOVE",
            OpType::Other(s) => s,
        }
    }
}

impl From<String> for OpType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ADD" => OpType::Add,
            "DELETE" => OpType::Delete,
            "EDIT" => OpType::Edit,
            "RENAME" => OpType::Rename,
            "RESTORE" => OpType::Restore,
            "MOVE" => OpType::Move,
            _ => OpType::Other(value),
        }
    }
}

impl From<OpType> for String {
    fn from(value: OpType) -> Self {
        value.as_str().to_string()
    }
}

impl From<OpType> for AttrValue {
    fn from(value: OpType) -> Self {
        AttrValue::Text(value.as_str().to_string())
    }
}

/// One entry of a storage root's operation history.
///
/// Events are immutable and only ever obtained through paged queries; pages
/// arrive newest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,

    pub op_type: OpType,

    #[serde(default)]
    pub path: String,

    #[serde(default, rename = "isdir")]
    pub is_dir: bool,

    #[serde(default, rename = "isdel")]
    pub is_deleted: bool,

    #[serde(default)]
    pub size: u64,

    #[serde(default, deserialize_with = "string_or_number")]
    pub version: String,

    #[serde(default)]
    pub device_name: String,

    #[serde(default)]
    pub editor: String,

    /// Epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,

    #[serde(default)]
    pub virus_scan: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

impl Record for Event {
    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        Some(match attr {
            Attr::Id => self.id.as_str().into(),
            Attr::OpType => self.op_type.clone().into(),
            Attr::Path => self.path.as_str().into(),
            Attr::IsDir => self.is_dir.into(),
            Attr::IsDeleted => self.is_deleted.into(),
            Attr::Size => self.size.into(),
            Attr::Version => self.version.as_str().into(),
            Attr::Device => self.device_name.as_str().into(),
            Attr::Editor => self.editor.as_str().into(),
            Attr::Timestamp => self.timestamp.into(),
            _ => return None,
        })
    }
}
