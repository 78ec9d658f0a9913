use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::string_or_number;
use crate::query::{Attr, AttrValue, Record};

/// A file or directory inside a storage root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub name: String,

    /// Path relative to the root, with a leading `/`.
    #[serde(default)]
    pub path: String,

    /// Revision token; changes on every content or metadata mutation.
    #[serde(default, deserialize_with = "string_or_number")]
    pub rev: String,

    #[serde(default)]
    pub is_dir: bool,

    #[serde(default)]
    pub is_deleted: bool,

    /// Modification time in epoch milliseconds.
    #[serde(default)]
    pub mtime: i64,

    #[serde(default)]
    pub size: u64,

    #[serde(default)]
    pub content_uri: Option<String>,

    /// Version number; present on trash listings and required to purge.
    #[serde(default, deserialize_with = "string_or_number")]
    pub version: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Entry {
    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        Some(match attr {
            Attr::Name => self.name.as_str().into(),
            Attr::Path => self.path.as_str().into(),
            Attr::Rev => self.rev.as_str().into(),
            Attr::Version => self.version.as_str().into(),
            Attr::IsDir => self.is_dir.into(),
            Attr::IsDeleted => self.is_deleted.into(),
            Attr::Timestamp => self.mtime.into(),
            Attr::Size => self.size.into(),
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_browse_entry() {
        let json = r#"{
            "name": "report.pdf",
            "path": "/docs/report.pdf",
            "rev": "r-19",
            "isDir": false,
            "mtime": 1700000000000,
            "size": 512,
            "contentUri": "/c/xyz",
            "thumbnail": "t.png"
        }"#;

        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.name, "report.pdf");
        assert_eq!(entry.rev, "r-19");
        assert!(!entry.is_dir);
        assert!(!entry.is_deleted);
        assert_eq!(entry.content_uri.as_deref(), Some("/c/xyz"));
        assert_eq!(entry.version, "");
        assert!(entry.extra.contains_key("thumbnail"));
    }

    #[test]
    fn test_trash_entry_version() {
        let entry: Entry = serde_json::from_str(
            r#"{"name": "old.txt", "isDeleted": true, "version": 7}"#,
        )
        .unwrap();
        assert!(entry.is_deleted);
        assert_eq!(entry.version, "7");
        assert_eq!(entry.attr(Attr::Version), Some("7".into()));
        assert_eq!(entry.attr(Attr::Owner), None);
    }
}
