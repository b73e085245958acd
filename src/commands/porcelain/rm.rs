use crate::areas::repository::Repository;
use crate::artifacts::core::error::UserError;
use crate::artifacts::index::entry::{Entry, EntryStatus};

impl Repository {
    /// Unstage a file, or stage a tracked file for removal and delete it
    pub async fn rm(&mut self, file: &str) -> anyhow::Result<()> {
        self.require_initialized()?;

        let path = self.workspace().relative_path(file);
        let head_tree = self.head_tree()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if let Some(tracked) = head_tree.get(&path) {
            if !index.mark_removed(&path) {
                index.add(Entry::new(path.clone(), tracked.oid.clone(), EntryStatus::Removed));
            }
            self.workspace().remove_file(&path)?;
        } else if index.entry_by_path(&path).is_some_and(|entry| entry.is_present()) {
            index.remove(&path);
        } else {
            return Err(UserError::NoReasonToRemove.into());
        }

        index.write_updates()?;
        tracing::debug!(path = ?path, "removed file from the index");

        Ok(())
    }
}
