use crate::areas::repository::Repository;
use crate::artifacts::core::error::UserError;
use crate::artifacts::log::log_record::LogRecord;
use crate::artifacts::objects::commit::{Commit, commit_timestamp};
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        self.require_initialized()?;

        if message.trim().is_empty() {
            return Err(UserError::EmptyCommitMessage.into());
        }

        let (parent, head_commit) = self.head_commit()?;
        let head_tree = self.database().load_commit_tree(&head_commit)?;

        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;

        let tree = index.snapshot().committed();
        if tree.same_snapshot(&head_tree) {
            return Err(UserError::NothingToCommit.into());
        }

        let tree_id = self.database().store(&tree)?;
        let commit = Commit::new(
            Some(tree_id),
            Some(parent),
            None,
            commit_timestamp(),
            message.to_string(),
        );
        let commit_id = self.record_commit(&commit)?;

        index.replace(tree);
        index.write_updates()?;
        tracing::info!(commit = %commit_id, "created commit");

        Ok(())
    }

    /// Store a commit, advance the checked-out branch to it and log it
    pub(crate) fn record_commit(&self, commit: &Commit) -> anyhow::Result<ObjectId> {
        let commit_id = self.database().store(commit)?;
        let current_ref = self.refs().current_ref()?;

        self.refs().update_ref(&current_ref, &commit_id)?;
        self.logs()
            .append_both(&current_ref, &LogRecord::for_commit(&commit_id, commit))?;

        Ok(commit_id)
    }
}
