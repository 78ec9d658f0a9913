use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::query::{Attr, AttrValue, Record};

/// An application password (ASP) for third-party WebDAV clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPassword {
    #[serde(default, alias = "aspName", alias = "asp_name")]
    pub name: String,

    /// Only present in the response that generated it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for AppPassword {
    fn attr(&self, attr: Attr) -> Option<AttrValue> {
        match attr {
            Attr::Name => Some(self.name.as_str().into()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_aliases() {
        let a: AppPassword = serde_json::from_str(r#"{"asp_name": "dav"}"#).unwrap();
        let b: AppPassword = serde_json::from_str(r#"{"aspName": "dav", "password": "x1"}"#).unwrap();
        assert_eq!(a.name, "dav");
        assert_eq!(b.password.as_deref(), Some("x1"));
    }
}
