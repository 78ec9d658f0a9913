use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::string_or_number;
use crate::query::{Attr, AttrValue, Record};

/// Sharing settings of a single path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareInfo {
    #[serde(default)]
    pub path: String,

    #[serde(default, rename = "aclist")]
    pub acl_list: String,

    #[serde(default = "default_acl")]
    pub acl: i64,

    #[serde(default)]
    pub download_disabled: bool,

    #[serde(default)]
    pub enable_upload: bool,

    #[serde(default)]
    pub enable_watermark: bool,

    #[serde(default)]
    pub enable_comment: bool,

    /// Revision token required when updating the share.
    #[serde(default = "default_version", deserialize_with = "version_or_default")]
    pub version: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_acl() -> i64 {
    1
}

fn default_version() -> String {
    "1".to_string()
}

/// A null or empty version reads as the initial one.
fn version_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let version = string_or_number(deserializer)?;
    Ok(if version.is_empty() {
        default_version()
    } else {
        version
    })
}

impl ShareInfo {
    /// Settings used when a path has never been shared.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            acl_list: String::new(),
            acl: default_acl(),
            download_disabled: false,
            enable_upload: false,
            enable_watermark: false,
            enable_comment: false,
            version: default_version(),
            extra: Map::new(),
        }
    }

    /// Overlay the fields set in `update`.
    pub fn apply(&mut self, update: &ShareUpdate) {
        if let Some(acl_list) = &update.acl_list {
            self.acl_list = acl_list.clone();
        }
        if let Some(acl) = update.acl {
            self.acl = acl;
        }
        if let Some(v) = update.download_disabled {
            self.download_disabled = v;
        }
        if let Some(v) = update.enable_upload {
            self.enable_upload = v;
        }
        if let Some(v) = update.enable_watermark {
            self.enable_watermark = v;
        }
        if let Some(v) = update.enable_comment {
            self.enable_comment = v;
        }
    }
}

impl Record for ShareInfo {
    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        Some(match attr {
            Attr::Path => self.path.as_str().into(),
            Attr::AclList => self.acl_list.as_str().into(),
            Attr::Acl => self.acl.into(),
            Attr::DownloadDisabled => self.download_disabled.into(),
            Attr::UploadEnabled => self.enable_upload.into(),
            Attr::Watermark => self.enable_watermark.into(),
            Attr::Comment => self.enable_comment.into(),
            Attr::Version => self.version.as_str().into(),
            _ => return None,
        })
    }
}

/// Partial share settings; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareUpdate {
    pub acl_list: Option<String>,
    pub acl: Option<i64>,
    pub download_disabled: Option<bool>,
    pub enable_upload: Option<bool>,
    pub enable_watermark: Option<bool>,
    pub enable_comment: Option<bool>,
    /// If set, the update is refused unless the share's current version equals it.
    pub expected_version: Option<String>,
}

/// One row of a root's share listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareListing {
    pub path: String,

    /// `"directory"` or `"file"`.
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ShareListing {
    pub fn is_dir(&self) -> bool {
        self.kind == "directory"
    }
}

impl Record for ShareListing {
    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        Some(match attr {
            Attr::Path => self.path.as_str().into(),
            Attr::Kind => self.kind.as_str().into(),
            Attr::IsDir => self.is_dir().into(),
            _ => return None,
        })
    }
}
