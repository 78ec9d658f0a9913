use log::info;
use serde_json::Value;

use super::Client;
use crate::error::Result;
use crate::model::Entry;
use crate::query::Query;
use crate::resolver::Location;
use crate::store::{RemoteStore, WriteOp};

/// Directory of the primary root holding bookmark files.
const BOOKMARK_DIR: &str = "书签";
const BOOKMARK_EXT: &str = ".nslnk";

impl<S: RemoteStore> Client<S> {
    fn bookmark_dir(&self) -> String {
        format!("{}/{}", self.default_root_name, BOOKMARK_DIR)
    }

    fn bookmark_path(&self, name: &str) -> String {
        format!("{}/{}{}", self.bookmark_dir(), name, BOOKMARK_EXT)
    }

    /// Bookmark files matching `query`.
    pub fn bookmarks(&self, query: &Query) -> Result<Vec<Entry>> {
        let entries = self.entries(&self.bookmark_dir(), false)?;
        Ok(query.filter(entries))
    }

    /// Bookmark the location; the service names the bookmark file.
    pub fn create_bookmark<'a>(&self, location: impl Into<Location<'a>>) -> Result<()> {
        let resolved = self.locate(location)?;
        self.store.submit_write(
            &resolved.root,
            &WriteOp::CreateShortcut {
                dest_path: resolved.path.clone(),
            },
        )?;
        info!("Bookmarked {}", resolved.path);
        Ok(())
    }

    /// Where the bookmark `name` points, as stored in its file.
    pub fn bookmark_target(&self, name: &str) -> Result<Value> {
        let resolved = self.resolve(&self.bookmark_path(name))?;
        let content = self.store.read_file(&resolved.root, &resolved.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn rename_bookmark(&self, name: &str, new_name: &str) -> Result<()> {
        self.rename(&self.bookmark_path(name), &format!("{new_name}{BOOKMARK_EXT}"), None)
    }

    pub fn delete_bookmark(&self, name: &str) -> Result<()> {
        self.delete(&self.bookmark_path(name), None)
    }
}
