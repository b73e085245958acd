use crate::areas::repository::Repository;
use crate::artifacts::core::error::UserError;
use crate::artifacts::remote::remote::Remote;

impl Repository {
    pub async fn add_remote(&mut self, name: &str, path: &str) -> anyhow::Result<()> {
        self.require_initialized()?;

        let remote = Remote::try_parse(name, path)?;
        if self.config().find_remote(remote.name())?.is_some() {
            return Err(UserError::RemoteAlreadyExists.into());
        }

        self.config().add_remote(&remote)?;
        self.refs().create_remote_namespace(remote.name())?;
        tracing::info!(remote = remote.name(), path = ?remote.path(), "added remote");

        Ok(())
    }
}
