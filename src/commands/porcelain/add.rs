use crate::areas::repository::Repository;
use crate::artifacts::core::error::UserError;
use crate::artifacts::index::entry::Entry;

impl Repository {
    pub async fn add(&mut self, file: &str) -> anyhow::Result<()> {
        self.require_initialized()?;

        let path = self.workspace().relative_path(file);
        let Some(blob) = self.workspace().parse_blob(&path)? else {
            return Err(UserError::FileNotFound.into());
        };

        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;

        let blob_id = self.database().store(&blob)?;
        let staged = Entry::present(path.clone(), blob_id);

        if Entry::same_state(index.entry_by_path(&path), Some(&staged)) {
            return Ok(());
        }

        index.add(staged);
        index.write_updates()?;
        tracing::debug!(path = ?path, "staged file");

        Ok(())
    }
}
