use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::string_or_number;
use crate::query::{Attr, AttrValue, Record};

/// The `(sndId, sndMagic)` pair that addresses a storage root on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RootRef {
    pub id: String,
    pub magic: String,
}

impl RootRef {
    pub fn new(id: impl Into<String>, magic: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            magic: magic.into(),
        }
    }
}

/// A storage root ("sandbox").
///
/// The primary root has an empty `name`; every other root is addressed by its
/// display name as the first segment of a virtual path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageRoot {
    #[serde(rename = "sandboxId", deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(deserialize_with = "string_or_number")]
    pub magic: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub owner: String,

    #[serde(default, deserialize_with = "string_or_number")]
    pub permission: String,

    /// Capability flags as reported by the service.
    #[serde(default)]
    pub caps: Vec<String>,

    #[serde(default)]
    pub exclusive: bool,

    #[serde(default)]
    pub is_default: bool,

    #[serde(default, rename = "desc")]
    pub description: String,

    #[serde(default)]
    pub used_space: u64,

    /// Set for roots that came from the trash listing.
    #[serde(default)]
    pub deleted: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StorageRoot {
    pub fn root_ref(&self) -> RootRef {
        RootRef::new(&self.id, &self.magic)
    }
}

impl Record for StorageRoot {
    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        Some(match attr {
            Attr::Name => self.name.as_str().into(),
            Attr::Id => self.id.as_str().into(),
            Attr::Magic => self.magic.as_str().into(),
            Attr::Owner => self.owner.as_str().into(),
            Attr::Permission => self.permission.as_str().into(),
            Attr::Description => self.description.as_str().into(),
            Attr::IsDefault => self.is_default.into(),
            Attr::IsExclusive => self.exclusive.into(),
            Attr::IsDeleted => self.deleted.into(),
            Attr::Size => self.used_space.into(),
            _ => return None,
        })
    }
}

/// Parameters for creating a storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoot {
    pub name: String,
    pub description: String,
    pub acl_anonymous: bool,
    pub acl_signed: bool,
    pub do_not_sync: bool,
}

impl NewRoot {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            acl_anonymous: false,
            acl_signed: false,
            do_not_sync: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Access rule attached to a path of a storage root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclRule {
    #[serde(default)]
    pub anonymous: i64,
    #[serde(default)]
    pub signed: i64,
    /// Member address to permission level.
    #[serde(default)]
    pub users: Map<String, Value>,
    #[serde(default)]
    pub user_nicks: Map<String, Value>,
    #[serde(default)]
    pub groups: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootAcl {
    #[serde(default = "root_acl_path")]
    pub path: String,
    #[serde(default)]
    pub acl: AclRule,
}

fn root_acl_path() -> String {
    "/".to_string()
}

impl Default for RootAcl {
    fn default() -> Self {
        Self {
            path: root_acl_path(),
            acl: AclRule::default(),
        }
    }
}

/// Editable settings of a storage root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootMetadata {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(deserialize_with = "string_or_number")]
    pub magic: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, rename = "desc")]
    pub description: String,

    #[serde(default)]
    pub do_not_sync: bool,

    #[serde(default)]
    pub acls: Vec<RootAcl>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RootMetadata {
    pub fn root_ref(&self) -> RootRef {
        RootRef::new(&self.id, &self.magic)
    }

    /// The rule updates are written against; a root without rules gets a
    /// closed one on `/`.
    pub fn primary_acl(&mut self) -> &mut RootAcl {
        if self.acls.is_empty() {
            self.acls.push(RootAcl::default());
        }
        &mut self.acls[0]
    }

    /// Overlay the fields set in `update`.
    pub fn apply(&mut self, update: &RootUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(do_not_sync) = update.do_not_sync {
            self.do_not_sync = do_not_sync;
        }
        let acl = self.primary_acl();
        if let Some(signed) = update.acl_signed {
            acl.acl.signed = signed;
        }
        if let Some(users) = &update.acl_users {
            acl.acl.users = users.clone();
        }
    }
}

impl Record for RootMetadata {
    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        Some(match attr {
            Attr::Name => self.name.as_str().into(),
            Attr::Id => self.id.as_str().into(),
            Attr::Magic => self.magic.as_str().into(),
            Attr::Description => self.description.as_str().into(),
            _ => return None,
        })
    }
}

/// Partial root settings; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub do_not_sync: Option<bool>,
    /// Permission level for any signed-in user.
    pub acl_signed: Option<i64>,
    pub acl_users: Option<Map<String, Value>>,
}
