use log::info;

use super::Client;
use crate::error::Result;
use crate::model::{NewRoot, RootMetadata, RootUpdate, StorageRoot};
use crate::query::Query;
use crate::resolver::Location;
use crate::store::{RemoteStore, WriteOp};

impl<S: RemoteStore> Client<S> {
    /// Storage roots matching `query`.
    pub fn roots(&self, query: &Query, include_deleted: bool) -> Result<Vec<StorageRoot>> {
        Ok(query.filter(self.store.list_storage_roots(include_deleted)?))
    }

    pub fn create_root(&self, new_root: &NewRoot) -> Result<StorageRoot> {
        self.store.create_storage_root(new_root)
    }

    /// Move a live root to the trash.
    pub fn delete_root<'a>(&self, location: impl Into<Location<'a>>) -> Result<()> {
        let resolved = self.locate(location)?;
        self.store.submit_write(&resolved.root, &WriteOp::DeleteRoot)?;
        info!("Deleted storage root {}", resolved.root.id);
        Ok(())
    }

    /// Bring a trashed root back; path names are looked up in the trash.
    pub fn restore_root<'a>(&self, location: impl Into<Location<'a>>) -> Result<()> {
        let resolved = self.resolver().locate(location.into(), true)?;
        self.store.submit_write(&resolved.root, &WriteOp::RestoreRoot)?;
        info!("Restored storage root {}", resolved.root.id);
        Ok(())
    }

    /// Editable settings of the location's root.
    pub fn root_metadata<'a>(&self, location: impl Into<Location<'a>>) -> Result<RootMetadata> {
        let resolved = self.locate(location)?;
        self.store.root_metadata(&resolved.root)
    }

    /// Merge `update` onto freshly read settings and write them back.
    ///
    /// A root without access rules gets a closed rule on `/` to carry the update.
    pub fn update_root<'a>(
        &self,
        location: impl Into<Location<'a>>,
        update: &RootUpdate,
    ) -> Result<RootMetadata> {
        let resolved = self.locate(location)?;
        let mut metadata = self.store.root_metadata(&resolved.root)?;
        metadata.apply(update);

        self.store.submit_write(
            &resolved.root,
            &WriteOp::UpdateRoot {
                metadata: metadata.clone(),
            },
        )?;
        info!("Updated settings of storage root {}", resolved.root.id);
        Ok(metadata)
    }
}
