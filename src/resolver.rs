//! Virtual path resolution.
//!
//! A virtual path names its storage root by display name in the first
//! segment, e.g. `Shared/docs/file.txt`. The primary root has an empty name
//! on the wire and is addressed by a reserved name instead.

use log::debug;

use crate::config::DEFAULT_ROOT_NAME;
use crate::error::{JianguoError, Result};
use crate::model::RootRef;
use crate::query::{Attr, Query};
use crate::store::RemoteStore;

/// A root plus a path relative to it (`""` for the root itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub root: RootRef,
    pub path: String,
}

impl Resolved {
    pub fn new(root: RootRef, path: impl Into<String>) -> Self {
        Self {
            root,
            path: path.into(),
        }
    }

    /// The same root with a different relative path.
    pub fn at(&self, path: impl Into<String>) -> Self {
        Self::new(self.root.clone(), path)
    }

    /// Split into parent directory and last segment.
    pub fn parent_and_name(&self) -> (&str, &str) {
        match self.path.rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", self.path.as_str()),
        }
    }
}

/// Where an operation applies: a virtual path still to be resolved, or an
/// already resolved root and path (skips the root listing).
#[derive(Debug, Clone, Copy)]
pub enum Location<'a> {
    Path(&'a str),
    Resolved(&'a Resolved),
}

impl<'a> From<&'a str> for Location<'a> {
    fn from(path: &'a str) -> Self {
        Location::Path(path)
    }
}

impl<'a> From<&'a String> for Location<'a> {
    fn from(path: &'a String) -> Self {
        Location::Path(path.as_str())
    }
}

impl<'a> From<&'a Resolved> for Location<'a> {
    fn from(resolved: &'a Resolved) -> Self {
        Location::Resolved(resolved)
    }
}

/// Split `path` into the root name to look up and the remaining path.
///
/// `default_root_name` maps to the empty name of the primary root. The
/// remainder keeps a leading `/` per segment, so a bare root name gives `""`.
pub fn split_virtual_path(path: &str, default_root_name: &str) -> (String, String) {
    let mut segments = path.split('/');
    let first = segments.next().unwrap_or_default();
    let root_name = if first == default_root_name { "" } else { first };

    let remaining: String = segments.map(|segment| format!("/{segment}")).collect();
    (root_name.to_string(), remaining)
}

/// Maps virtual paths to `(root, remaining path)` through a [`RemoteStore`].
pub struct PathResolver<'a, S: RemoteStore + ?Sized> {
    store: &'a S,
    default_root_name: &'a str,
}

impl<'a, S: RemoteStore + ?Sized> PathResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            default_root_name: DEFAULT_ROOT_NAME,
        }
    }

    pub fn with_default_root_name(mut self, name: &'a str) -> Self {
        self.default_root_name = name;
        self
    }

    /// Resolve a virtual path against the live roots, or the trashed ones
    /// when `include_deleted` is set.
    ///
    /// # Errors
    /// `AmbiguousOrMissingRoot` unless exactly one root carries the name.
    pub fn resolve(&self, virtual_path: &str, include_deleted: bool) -> Result<Resolved> {
        let (name, remaining) = split_virtual_path(virtual_path, self.default_root_name);

        let roots = self.store.list_storage_roots(include_deleted)?;
        let mut matches = Query::all().eq(Attr::Name, name.as_str()).filter(roots);

        if matches.len() != 1 {
            return Err(JianguoError::AmbiguousOrMissingRoot {
                name,
                matches: matches.len(),
            });
        }
        let root = matches.remove(0);

        debug!(
            "Resolved {:?} to root {} path {:?}",
            virtual_path, root.id, remaining
        );
        Ok(Resolved::new(root.root_ref(), remaining))
    }

    /// Resolve only when the location is not already resolved.
    pub fn locate(&self, location: Location<'_>, include_deleted: bool) -> Result<Resolved> {
        match location {
            Location::Path(path) => self.resolve(path, include_deleted),
            Location::Resolved(resolved) => Ok(resolved.clone()),
        }
    }
}
