use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::string_or_number;
use crate::query::{Attr, AttrValue, Record};

/// One historical version of a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileVersion {
    /// Token accepted by `restore_version` and versioned download links.
    #[serde(default, deserialize_with = "string_or_number")]
    pub version: String,

    #[serde(default)]
    pub size: u64,

    /// Epoch milliseconds.
    #[serde(default)]
    pub mtime: i64,

    #[serde(default)]
    pub editor: String,

    #[serde(default)]
    pub device_name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for FileVersion {
    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        Some(match attr {
            Attr::Version => self.version.as_str().into(),
            Attr::Size => self.size.into(),
            Attr::Timestamp => self.mtime.into(),
            Attr::Editor => self.editor.as_str().into(),
            Attr::Device => self.device_name.as_str().into(),
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_version_token() {
        let v: FileVersion =
            serde_json::from_str(r#"{"version": 12, "size": 40, "mtime": 1700000000000, "editor": "me"}"#)
                .unwrap();
        assert_eq!(v.version, "12");
        assert_eq!(v.attr(Attr::Size), Some(AttrValue::Int(40)));
    }
}
