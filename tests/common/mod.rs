//! Scripted in-memory store shared by the integration tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use jianguo_client::model::{
    AppPassword, Entry, Event, FileVersion, NewRoot, RootMetadata, RootRef, ShareInfo,
    ShareListing, StorageRoot,
};
use jianguo_client::store::{RemoteStore, WriteOp};
use jianguo_client::{Cursor, EventPage, JianguoError, Result};
use serde_json::json;

pub fn root(id: &str, magic: &str, name: &str) -> StorageRoot {
    serde_json::from_value(json!({
        "sandboxId": id,
        "magic": magic,
        "name": name,
        "isDefault": name.is_empty(),
    }))
    .unwrap()
}

pub fn file(path: &str, rev: &str) -> Entry {
    entry(path, rev, false)
}

pub fn dir(path: &str, rev: &str) -> Entry {
    entry(path, rev, true)
}

fn entry(path: &str, rev: &str, is_dir: bool) -> Entry {
    let name = path.rsplit('/').next().unwrap_or_default();
    serde_json::from_value(json!({
        "name": name,
        "path": path,
        "rev": rev,
        "isDir": is_dir,
        "version": 1,
    }))
    .unwrap()
}

pub fn event(id: &str, op_type: &str, path: &str, timestamp: i64) -> Event {
    serde_json::from_value(json!({
        "id": id,
        "opType": op_type,
        "path": path,
        "timestamp": timestamp,
        "version": 1,
    }))
    .unwrap()
}

pub fn at(marker: &str) -> Cursor {
    Cursor::from_token(marker)
}

/// A [`RemoteStore`] answering from fixed data and recording every call.
#[derive(Default)]
pub struct MemoryStore {
    roots: Vec<StorageRoot>,
    trashed_roots: Vec<StorageRoot>,
    entries: HashMap<(String, String, bool), Vec<Entry>>,
    pages: HashMap<Option<String>, EventPage>,
    shares: HashMap<(String, String), ShareInfo>,
    listings: HashMap<String, Vec<ShareListing>>,
    failing_paths: HashSet<String>,
    versions: HashMap<(String, String), Vec<FileVersion>>,
    metadata: HashMap<String, RootMetadata>,
    files: HashMap<(String, String), String>,
    pub app_passwords: RefCell<Vec<AppPassword>>,

    pub root_listings: Cell<usize>,
    pub page_requests: RefCell<Vec<Cursor>>,
    pub writes: RefCell<Vec<(RootRef, WriteOp)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: StorageRoot) -> Self {
        self.roots.push(root);
        self
    }

    pub fn with_trashed_root(mut self, root: StorageRoot) -> Self {
        self.trashed_roots.push(root);
        self
    }

    /// Entries listed under `dir` of root `root_id` (trash when `deleted`).
    pub fn with_entries(mut self, root_id: &str, dir: &str, deleted: bool, entries: Vec<Entry>) -> Self {
        self.entries
            .insert((root_id.to_string(), dir.to_string(), deleted), entries);
        self
    }

    /// Page answered for `cursor`, pointing at `next`.
    pub fn with_page(mut self, cursor: Cursor, events: Vec<Event>, next: Cursor) -> Self {
        let key = cursor.marker().map(str::to_string);
        self.pages.insert(key, EventPage::new(events, next));
        self
    }

    pub fn with_share(mut self, root_id: &str, share: ShareInfo) -> Self {
        self.shares
            .insert((root_id.to_string(), share.path.clone()), share);
        self
    }

    pub fn with_listing(mut self, root_id: &str, path: &str, kind: &str) -> Self {
        let listing: ShareListing =
            serde_json::from_value(json!({ "path": path, "type": kind })).unwrap();
        self.listings
            .entry(root_id.to_string())
            .or_default()
            .push(listing);
        self
    }

    /// Make every write targeting `path` fail at the transport level.
    pub fn failing_writes_on(mut self, path: &str) -> Self {
        self.failing_paths.insert(path.to_string());
        self
    }

    pub fn with_version(mut self, root_id: &str, path: &str, version: &str, size: u64) -> Self {
        let version: FileVersion =
            serde_json::from_value(json!({ "version": version, "size": size })).unwrap();
        self.versions
            .entry((root_id.to_string(), path.to_string()))
            .or_default()
            .push(version);
        self
    }

    /// Metadata answered for the root, given as service JSON.
    pub fn with_metadata(mut self, root_id: &str, metadata: serde_json::Value) -> Self {
        self.metadata
            .insert(root_id.to_string(), serde_json::from_value(metadata).unwrap());
        self
    }

    pub fn with_file(mut self, root_id: &str, path: &str, content: &str) -> Self {
        self.files
            .insert((root_id.to_string(), path.to_string()), content.to_string());
        self
    }

    pub fn with_app_password(self, name: &str) -> Self {
        self.app_passwords
            .borrow_mut()
            .push(serde_json::from_value(json!({ "name": name })).unwrap());
        self
    }

    pub fn written(&self) -> Vec<WriteOp> {
        self.writes.borrow().iter().map(|(_, op)| op.clone()).collect()
    }

    pub fn pages_requested(&self) -> usize {
        self.page_requests.borrow().len()
    }

    fn current_rev(&self, root: &RootRef, path: &str) -> Option<String> {
        self.entries
            .iter()
            .filter(|((id, _, deleted), _)| *id == root.id && !*deleted)
            .flat_map(|(_, entries)| entries.iter())
            .find(|e| e.path == path)
            .map(|e| e.rev.clone())
    }
}

impl RemoteStore for MemoryStore {
    fn list_storage_roots(&self, include_deleted: bool) -> Result<Vec<StorageRoot>> {
        self.root_listings.set(self.root_listings.get() + 1);
        Ok(if include_deleted {
            self.trashed_roots.clone()
        } else {
            self.roots.clone()
        })
    }

    fn list_entries(
        &self,
        root: &RootRef,
        sub_path: &str,
        include_deleted: bool,
    ) -> Result<Vec<Entry>> {
        let key = (root.id.clone(), sub_path.to_string(), include_deleted);
        Ok(self.entries.get(&key).cloned().unwrap_or_default())
    }

    fn fetch_event_page(&self, _root: &RootRef, cursor: &Cursor) -> Result<EventPage> {
        self.page_requests.borrow_mut().push(cursor.clone());
        if cursor.is_end() {
            return Ok(EventPage::new(Vec::new(), Cursor::End));
        }
        let key = cursor.marker().map(str::to_string);
        self.pages
            .get(&key)
            .cloned()
            .ok_or_else(|| JianguoError::Transport(format!("no page scripted for {cursor:?}")))
    }

    fn submit_write(&self, root: &RootRef, op: &WriteOp) -> Result<()> {
        self.writes.borrow_mut().push((root.clone(), op.clone()));

        if let Some(path) = op.path() {
            if self.failing_paths.contains(path) {
                return Err(JianguoError::Transport(format!("{} rejected", op.label())));
            }
        }

        if let (WriteOp::Delete { path, rev, .. } | WriteOp::Rename { path, rev, .. }) = op {
            let current = self.current_rev(root, path);
            if current.as_deref() != Some(rev.as_str()) {
                return Err(JianguoError::StaleRevision {
                    path: path.clone(),
                    expected: rev.clone(),
                    current,
                });
            }
        }
        Ok(())
    }

    fn get_share(&self, root: &RootRef, path: &str) -> Result<Option<ShareInfo>> {
        Ok(self
            .shares
            .get(&(root.id.clone(), path.to_string()))
            .cloned())
    }

    fn list_shares(&self, root: &RootRef) -> Result<Vec<ShareListing>> {
        Ok(self.listings.get(&root.id).cloned().unwrap_or_default())
    }

    fn create_storage_root(&self, new_root: &NewRoot) -> Result<StorageRoot> {
        Ok(root(&format!("new-{}", new_root.name), "fresh", &new_root.name))
    }

    fn download_link(&self, root: &RootRef, path: &str, version: Option<&str>) -> Result<String> {
        Ok(match version {
            Some(v) => format!("https://files.example/{}{}?ver={}", root.id, path, v),
            None => format!("https://files.example/{}{}", root.id, path),
        })
    }

    fn read_file(&self, root: &RootRef, path: &str) -> Result<String> {
        self.files
            .get(&(root.id.clone(), path.to_string()))
            .cloned()
            .ok_or_else(|| JianguoError::Transport(format!("{path} returned HTTP 404 Not Found")))
    }

    fn list_versions(&self, root: &RootRef, path: &str) -> Result<Vec<FileVersion>> {
        Ok(self
            .versions
            .get(&(root.id.clone(), path.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn root_metadata(&self, root: &RootRef) -> Result<RootMetadata> {
        self.metadata
            .get(&root.id)
            .cloned()
            .ok_or_else(|| JianguoError::NotFound(format!("metadata of {}", root.id)))
    }

    fn list_app_passwords(&self) -> Result<Vec<AppPassword>> {
        Ok(self.app_passwords.borrow().clone())
    }

    fn generate_app_password(&self, name: &str) -> Result<AppPassword> {
        let generated: AppPassword =
            serde_json::from_value(json!({ "name": name, "password": format!("pw-{name}") }))?;
        self.app_passwords.borrow_mut().push(generated.clone());
        Ok(generated)
    }

    fn revoke_app_password(&self, name: &str) -> Result<()> {
        let mut passwords = self.app_passwords.borrow_mut();
        let before = passwords.len();
        passwords.retain(|p| p.name != name);
        if passwords.len() == before {
            return Err(JianguoError::NotFound(format!("application password {name}")));
        }
        Ok(())
    }
}
