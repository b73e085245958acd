use crate::areas::repository::Repository;
use crate::artifacts::core::error::UserError;

impl Repository {
    /// Forget a remote along with its tracking refs and fetch logs
    pub async fn rm_remote(&mut self, name: &str) -> anyhow::Result<()> {
        self.require_initialized()?;

        if !self.config().remove_remote(name)? {
            return Err(UserError::RemoteNotFound.into());
        }

        self.refs().delete_remote_namespace(name)?;
        self.logs().delete_remote(name)?;

        Ok(())
    }
}
