use super::Client;
use crate::error::Result;
use crate::model::AppPassword;
use crate::query::Query;
use crate::store::RemoteStore;

impl<S: RemoteStore> Client<S> {
    /// Application passwords matching `query`.
    pub fn app_passwords(&self, query: &Query) -> Result<Vec<AppPassword>> {
        Ok(query.filter(self.store.list_app_passwords()?))
    }

    /// Create an application password; the secret is only returned here.
    pub fn generate_app_password(&self, name: &str) -> Result<AppPassword> {
        self.store.generate_app_password(name)
    }

    pub fn revoke_app_password(&self, name: &str) -> Result<()> {
        self.store.revoke_app_password(name)
    }
}
