use log::info;

use super::Client;
use crate::error::{JianguoError, Result};
use crate::model::{ShareInfo, ShareListing, ShareUpdate};
use crate::query::{Attr, Query};
use crate::resolver::Location;
use crate::store::{RemoteStore, WriteOp};

impl<S: RemoteStore> Client<S> {
    /// Share settings of the location, or `None` if it is not shared.
    pub fn share_info<'a>(&self, location: impl Into<Location<'a>>) -> Result<Option<ShareInfo>> {
        let resolved = self.locate(location)?;
        self.store.get_share(&resolved.root, &resolved.path)
    }

    /// Shares under the location's root matching `query`. A non-root location
    /// adds a `path` constraint unless `query` already mentions one.
    pub fn shares<'a>(
        &self,
        location: impl Into<Location<'a>>,
        mut query: Query,
    ) -> Result<Vec<ShareListing>> {
        let resolved = self.locate(location)?;
        if !resolved.path.is_empty() {
            query.default_to(Attr::Path, resolved.path.as_str());
        }
        Ok(query.filter(self.store.list_shares(&resolved.root)?))
    }

    /// Create or update the share of the location and return what was sent.
    ///
    /// Unset fields of `update` keep the current share's values, or the
    /// defaults for a path that is not shared yet. The share's version is
    /// re-read first; `update.expected_version` must match it if set.
    pub fn share<'a>(
        &self,
        location: impl Into<Location<'a>>,
        update: &ShareUpdate,
    ) -> Result<ShareInfo> {
        let resolved = self.locate(location)?;
        let current = self.store.get_share(&resolved.root, &resolved.path)?;

        if let Some(expected) = &update.expected_version {
            let current_version = current.as_ref().map(|s| s.version.as_str());
            if current_version != Some(expected.as_str()) {
                return Err(JianguoError::StaleRevision {
                    path: resolved.path.clone(),
                    expected: expected.clone(),
                    current: current_version.map(str::to_string),
                });
            }
        }

        let mut share = current.unwrap_or_else(|| ShareInfo::new(resolved.path.as_str()));
        share.apply(update);

        self.store.submit_write(
            &resolved.root,
            &WriteOp::Publish {
                share: share.clone(),
            },
        )?;
        info!("Shared {}", resolved.path);
        Ok(share)
    }

    /// Stop sharing the location.
    pub fn revoke_share<'a>(&self, location: impl Into<Location<'a>>) -> Result<()> {
        let resolved = self.locate(location)?;
        let listing = Query::all()
            .eq(Attr::Path, resolved.path.as_str())
            .filter(self.store.list_shares(&resolved.root)?)
            .into_iter()
            .next()
            .ok_or_else(|| JianguoError::NotFound(format!("no share at {}", resolved.path)))?;

        self.store.submit_write(
            &resolved.root,
            &WriteOp::RevokeShare {
                path: listing.path.clone(),
                is_dir: listing.is_dir(),
            },
        )?;
        info!("Revoked share of {}", resolved.path);
        Ok(())
    }
}
