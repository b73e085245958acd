use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::core::error::UserError;
use crate::artifacts::log::log_record::LogRecord;
use crate::artifacts::merge::ancestor::AncestorFinder;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::remote::object_sync::ObjectSync;

impl Repository {
    /// Publish the checked-out branch's history to a remote branch
    pub async fn push(&mut self, remote_name: &str, branch_name: &str) -> anyhow::Result<()> {
        self.require_initialized()?;

        let remote = self.open_remote(remote_name)?;
        let branch_ref = SymRefName::for_branch(&BranchName::try_parse(branch_name.to_string())?);
        let remote_head = remote.refs().read_ref(&branch_ref)?;
        let (local_head, _) = self.head_commit()?;

        if let Some(remote_head) = &remote_head
            && !self.has_in_history(&local_head, remote_head)?
        {
            return Err(UserError::PullBeforePushing.into());
        }

        let copied = ObjectSync::new(self.database(), remote.database())
            .copy_history(&local_head, remote_head.as_ref())?;
        remote.refs().update_ref(&branch_ref, &local_head)?;

        for (commit_id, commit) in &copied {
            remote
                .logs()
                .append(&branch_ref, &LogRecord::for_commit(commit_id, commit))?;
        }
        tracing::info!(remote = remote_name, branch = branch_name, commits = copied.len(), "pushed");

        Ok(())
    }

    /// Whether `commit_id` is `head` or one of its ancestors, merge parents included
    fn has_in_history(&self, head: &ObjectId, commit_id: &ObjectId) -> anyhow::Result<bool> {
        let history =
            AncestorFinder::new(|oid| self.database().load_commit(oid)).reachable_from(head)?;

        Ok(history.contains(commit_id))
    }
}
