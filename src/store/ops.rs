use crate::model::{Event, OpType, RootMetadata, RootRef, ShareInfo};

/// Whether a transfer keeps the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Move,
    Copy,
}

/// A historical event replayed as a directive to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoDirective {
    pub op_type: OpType,
    pub path: String,
    pub deleted: bool,
    pub dir: bool,
    pub version: String,
}

impl From<&Event> for UndoDirective {
    fn from(event: &Event) -> Self {
        Self {
            op_type: event.op_type.clone(),
            path: event.path.clone(),
            deleted: event.is_deleted,
            dir: event.is_dir,
            version: event.version.clone(),
        }
    }
}

/// A mutation submitted through [`RemoteStore::submit_write`](super::RemoteStore::submit_write).
///
/// Paths are relative to the root the write is submitted against. For
/// [`WriteOp::Transfer`] that is the destination root.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    CreateFile {
        path: String,
    },
    CreateDir {
        path: String,
    },
    Delete {
        path: String,
        rev: String,
        is_dir: bool,
    },
    /// Permanently remove a trashed entry.
    Purge {
        path: String,
        version: String,
    },
    /// Bring a trashed entry back.
    Restore {
        path: String,
    },
    Rename {
        path: String,
        new_name: String,
        is_dir: bool,
        rev: String,
    },
    Transfer {
        mode: Transfer,
        source: RootRef,
        source_path: String,
        dest_dir: String,
    },
    RestoreVersion {
        path: String,
        version: String,
    },
    /// Create or update the share of `share.path`.
    Publish {
        share: ShareInfo,
    },
    RevokeShare {
        path: String,
        is_dir: bool,
    },
    DeleteRoot,
    RestoreRoot,
    /// Replace the root's settings with `metadata`.
    UpdateRoot {
        metadata: RootMetadata,
    },
    /// Create a bookmark pointing at `dest_path`.
    CreateShortcut {
        dest_path: String,
    },
    Undo(UndoDirective),
}

impl WriteOp {
    /// Short label used in logs and errors.
    pub fn label(&self) -> &'static str {
        match self {
            WriteOp::CreateFile { .. } => "create file",
            WriteOp::CreateDir { .. } => "create directory",
            WriteOp::Delete { .. } => "delete",
            WriteOp::Purge { .. } => "purge",
            WriteOp::Restore { .. } => "restore",
            WriteOp::Rename { .. } => "rename",
            WriteOp::Transfer {
                mode: Transfer::Move,
                ..
            } => "move",
            WriteOp::Transfer {
                mode: Transfer::Copy,
                ..
            } => "copy",
            WriteOp::RestoreVersion { .. } => "restore version",
            WriteOp::Publish { .. } => "share",
            WriteOp::RevokeShare { .. } => "revoke share",
            WriteOp::DeleteRoot => "delete root",
            WriteOp::RestoreRoot => "restore root",
            WriteOp::UpdateRoot { .. } => "update root",
            WriteOp::CreateShortcut { .. } => "create bookmark",
            WriteOp::Undo(_) => "undo event",
        }
    }

    /// Path the write targets, if it targets one.
    pub fn path(&self) -> Option<&str> {
        match self {
            WriteOp::CreateFile { path }
            | WriteOp::CreateDir { path }
            | WriteOp::Delete { path, .. }
            | WriteOp::Purge { path, .. }
            | WriteOp::Restore { path }
            | WriteOp::Rename { path, .. }
            | WriteOp::RestoreVersion { path, .. }
            | WriteOp::RevokeShare { path, .. } => Some(path.as_str()),
            WriteOp::Transfer { source_path, .. } => Some(source_path.as_str()),
            WriteOp::Publish { share } => Some(share.path.as_str()),
            WriteOp::Undo(directive) => Some(directive.path.as_str()),
            WriteOp::CreateShortcut { dest_path } => Some(dest_path.as_str()),
            WriteOp::DeleteRoot | WriteOp::RestoreRoot | WriteOp::UpdateRoot { .. } => None,
        }
    }

    /// Revision/version token the write is conditioned on, if any.
    pub fn revision(&self) -> Option<&str> {
        match self {
            WriteOp::Delete { rev, .. } | WriteOp::Rename { rev, .. } => Some(rev.as_str()),
            WriteOp::Purge { version, .. } => Some(version.as_str()),
            WriteOp::Publish { share } => Some(share.version.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_directive_mirrors_event() {
        let event: Event = serde_json::from_str(
            r#"{"opType": "DELETE", "path": "/a.txt", "isdir": false, "isdel": true, "version": 3}"#,
        )
        .unwrap();

        let directive = UndoDirective::from(&event);
        assert_eq!(directive.op_type, OpType::Delete);
        assert_eq!(directive.path, "/a.txt");
        assert!(directive.deleted);
        assert!(!directive.dir);
        assert_eq!(directive.version, "3");
    }

    #[test]
    fn test_labels_paths_and_revisions() {
        let op = WriteOp::Delete {
            path: "/a".into(),
            rev: "r1".into(),
            is_dir: false,
        };
        assert_eq!(op.label(), "delete");
        assert_eq!(op.path(), Some("/a"));
        assert_eq!(op.revision(), Some("r1"));

        let op = WriteOp::Transfer {
            mode: Transfer::Copy,
            source: RootRef::new("A", "m"),
            source_path: "/src".into(),
            dest_dir: "/dst".into(),
        };
        assert_eq!(op.label(), "copy");
        assert_eq!(op.path(), Some("/src"));
        assert_eq!(op.revision(), None);

        assert_eq!(WriteOp::DeleteRoot.path(), None);
    }
}
