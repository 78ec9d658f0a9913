//! Remote store abstraction.
//!
//! The resolution, query and history logic only talk to a [`RemoteStore`].
//! [`HttpStore`] implements it against the service's JSON endpoints; tests
//! supply scripted in-memory stores.

mod http;
mod ops;
mod session;

pub use http::HttpStore;
pub use ops::{Transfer, UndoDirective, WriteOp};
pub use session::Session;

use crate::error::Result;
use crate::events::{Cursor, EventPage};
use crate::model::{
    AppPassword, Entry, FileVersion, NewRoot, RootMetadata, RootRef, ShareInfo, ShareListing,
    StorageRoot,
};

/// Operations the remote service must provide.
///
/// Every call blocks until the service answers. Implementations own the
/// session state; callers never see it.
pub trait RemoteStore {
    /// Live storage roots, or the trashed ones when `include_deleted` is set.
    fn list_storage_roots(&self, include_deleted: bool) -> Result<Vec<StorageRoot>>;

    /// Entries directly under `sub_path` (`""` is the root itself).
    fn list_entries(&self, root: &RootRef, sub_path: &str, include_deleted: bool)
        -> Result<Vec<Entry>>;

    /// One page of the root's event log, starting at `cursor`.
    fn fetch_event_page(&self, root: &RootRef, cursor: &Cursor) -> Result<EventPage>;

    /// Apply a mutation. Fails with `StaleRevision` when the service rejects
    /// the write's revision token.
    fn submit_write(&self, root: &RootRef, op: &WriteOp) -> Result<()>;

    /// Share settings of `path`, or `None` when it is not shared.
    fn get_share(&self, root: &RootRef, path: &str) -> Result<Option<ShareInfo>>;

    /// Every share under the root.
    fn list_shares(&self, root: &RootRef) -> Result<Vec<ShareListing>>;

    fn create_storage_root(&self, new_root: &NewRoot) -> Result<StorageRoot>;

    /// Absolute download URL for `path`, optionally at a historical version.
    fn download_link(&self, root: &RootRef, path: &str, version: Option<&str>) -> Result<String>;

    /// Current content of a (small) file as text.
    fn read_file(&self, root: &RootRef, path: &str) -> Result<String>;

    /// Historical versions of a file, newest first.
    fn list_versions(&self, root: &RootRef, path: &str) -> Result<Vec<FileVersion>>;

    fn root_metadata(&self, root: &RootRef) -> Result<RootMetadata>;

    /// Application passwords of the signed-in account.
    fn list_app_passwords(&self) -> Result<Vec<AppPassword>>;

    /// Create an application password; the result carries the secret.
    fn generate_app_password(&self, name: &str) -> Result<AppPassword>;

    fn revoke_app_password(&self, name: &str) -> Result<()>;
}
