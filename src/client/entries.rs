use log::info;

use super::{ensure_current, Client};
use crate::error::{JianguoError, Result};
use crate::model::{Entry, FileVersion};
use crate::query::{Attr, Query};
use crate::resolver::{Location, Resolved};
use crate::store::{RemoteStore, Transfer, WriteOp};

impl<S: RemoteStore> Client<S> {
    /// Entries directly under the location (or under its trash).
    pub fn entries<'a>(
        &self,
        location: impl Into<Location<'a>>,
        include_deleted: bool,
    ) -> Result<Vec<Entry>> {
        let resolved = self.locate(location)?;
        self.store
            .list_entries(&resolved.root, &resolved.path, include_deleted)
    }

    /// Entries of the location's parent directory matching `query`.
    ///
    /// The last path segment becomes a `name` constraint unless `query`
    /// already mentions [`Attr::Name`].
    pub fn entry_info<'a>(
        &self,
        location: impl Into<Location<'a>>,
        query: Query,
        include_deleted: bool,
    ) -> Result<Vec<Entry>> {
        let resolved = self.locate(location)?;
        self.lookup(&resolved, query, include_deleted)
    }

    fn lookup(&self, resolved: &Resolved, mut query: Query, include_deleted: bool) -> Result<Vec<Entry>> {
        let (parent, name) = resolved.parent_and_name();
        if !name.is_empty() {
            query.default_to(Attr::Name, name);
        }
        let entries = self
            .store
            .list_entries(&resolved.root, parent, include_deleted)?;
        Ok(query.filter(entries))
    }

    /// Freshly read entry at `resolved`.
    fn current_entry(&self, resolved: &Resolved, include_deleted: bool) -> Result<Entry> {
        if resolved.path.is_empty() {
            return Err(JianguoError::NotFound("root has no entry of its own".to_string()));
        }
        self.lookup(resolved, Query::all(), include_deleted)?
            .into_iter()
            .next()
            .ok_or_else(|| JianguoError::NotFound(resolved.path.clone()))
    }

    /// Create an empty file.
    pub fn create_file<'a>(&self, location: impl Into<Location<'a>>) -> Result<()> {
        let resolved = self.locate(location)?;
        self.store.submit_write(
            &resolved.root,
            &WriteOp::CreateFile {
                path: resolved.path.clone(),
            },
        )?;
        info!("Created file {}", resolved.path);
        Ok(())
    }

    pub fn create_dir<'a>(&self, location: impl Into<Location<'a>>) -> Result<()> {
        let resolved = self.locate(location)?;
        self.store.submit_write(
            &resolved.root,
            &WriteOp::CreateDir {
                path: resolved.path.clone(),
            },
        )?;
        info!("Created directory {}", resolved.path);
        Ok(())
    }

    /// Move an entry to the trash.
    ///
    /// The current revision is re-read first. If `expected_rev` is given and
    /// no longer current, the delete is refused with `StaleRevision`.
    pub fn delete<'a>(
        &self,
        location: impl Into<Location<'a>>,
        expected_rev: Option<&str>,
    ) -> Result<()> {
        let resolved = self.locate(location)?;
        let entry = self.current_entry(&resolved, false)?;
        ensure_current(&resolved.path, expected_rev, &entry.rev)?;

        self.store.submit_write(
            &resolved.root,
            &WriteOp::Delete {
                path: resolved.path.clone(),
                rev: entry.rev,
                is_dir: entry.is_dir,
            },
        )?;
        info!("Deleted {}", resolved.path);
        Ok(())
    }

    /// Rename an entry in place. Revision handling as for [`Client::delete`].
    pub fn rename<'a>(
        &self,
        location: impl Into<Location<'a>>,
        new_name: &str,
        expected_rev: Option<&str>,
    ) -> Result<()> {
        let resolved = self.locate(location)?;
        let entry = self.current_entry(&resolved, false)?;
        ensure_current(&resolved.path, expected_rev, &entry.rev)?;

        self.store.submit_write(
            &resolved.root,
            &WriteOp::Rename {
                path: resolved.path.clone(),
                new_name: new_name.to_string(),
                is_dir: entry.is_dir,
                rev: entry.rev,
            },
        )?;
        info!("Renamed {} to {}", resolved.path, new_name);
        Ok(())
    }

    /// Move or copy `source` into the directory `dest_dir`, possibly on another root.
    pub fn transfer<'a, 'b>(
        &self,
        source: impl Into<Location<'a>>,
        dest_dir: impl Into<Location<'b>>,
        mode: Transfer,
    ) -> Result<()> {
        let source = self.locate(source)?;
        let dest = self.locate(dest_dir)?;

        self.store.submit_write(
            &dest.root,
            &WriteOp::Transfer {
                mode,
                source: source.root.clone(),
                source_path: source.path.clone(),
                dest_dir: dest.path.clone(),
            },
        )?;
        info!("Transferred {} to {} ({:?})", source.path, dest.path, mode);
        Ok(())
    }

    /// Permanently delete a trashed entry.
    pub fn purge<'a>(&self, location: impl Into<Location<'a>>) -> Result<()> {
        let resolved = self.locate(location)?;
        let entry = self.current_entry(&resolved, true)?;

        self.store.submit_write(
            &resolved.root,
            &WriteOp::Purge {
                path: resolved.path.clone(),
                version: entry.version,
            },
        )?;
        info!("Purged {}", resolved.path);
        Ok(())
    }

    /// Restore a trashed entry.
    pub fn restore<'a>(&self, location: impl Into<Location<'a>>) -> Result<()> {
        let resolved = self.locate(location)?;
        self.store.submit_write(
            &resolved.root,
            &WriteOp::Restore {
                path: resolved.path.clone(),
            },
        )?;
        info!("Restored {}", resolved.path);
        Ok(())
    }

    /// Historical versions of a file matching `query`, newest first as listed.
    pub fn versions<'a>(
        &self,
        location: impl Into<Location<'a>>,
        query: &Query,
    ) -> Result<Vec<FileVersion>> {
        let resolved = self.locate(location)?;
        if resolved.path.is_empty() {
            return Err(JianguoError::NotFound("root has no versions of its own".to_string()));
        }
        let versions = self.store.list_versions(&resolved.root, &resolved.path)?;
        Ok(query.filter(versions))
    }

    /// Make a historical version the current content.
    pub fn restore_version<'a>(
        &self,
        location: impl Into<Location<'a>>,
        version: &str,
    ) -> Result<()> {
        let resolved = self.locate(location)?;
        self.store.submit_write(
            &resolved.root,
            &WriteOp::RestoreVersion {
                path: resolved.path.clone(),
                version: version.to_string(),
            },
        )
    }

    pub fn download_link<'a>(
        &self,
        location: impl Into<Location<'a>>,
        version: Option<&str>,
    ) -> Result<String> {
        let resolved = self.locate(location)?;
        self.store
            .download_link(&resolved.root, &resolved.path, version)
    }
}
