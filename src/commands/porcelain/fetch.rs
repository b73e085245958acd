use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::core::error::UserError;
use crate::artifacts::log::log_record::LogRecord;
use crate::artifacts::remote::object_sync::ObjectSync;

impl Repository {
    /// Copy a remote branch into `refs/remotes/<remote>/<branch>`
    ///
    /// Neither HEAD nor the working tree are touched.
    pub async fn fetch(&mut self, remote_name: &str, branch_name: &str) -> anyhow::Result<()> {
        self.require_initialized()?;

        let remote = self.open_remote(remote_name)?;
        let branch_name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| UserError::RemoteBranchNotFound)?;
        let remote_head = remote
            .refs()
            .read_ref(&SymRefName::for_branch(&branch_name))?
            .ok_or(UserError::RemoteBranchNotFound)?;

        let tracking_ref = SymRefName::for_remote_branch(remote_name, &branch_name);
        let tracking_head = self.refs().read_ref(&tracking_ref)?;

        let copied = ObjectSync::new(remote.database(), self.database())
            .copy_history(&remote_head, tracking_head.as_ref())?;
        self.refs().update_ref(&tracking_ref, &remote_head)?;

        for (commit_id, commit) in &copied {
            self.logs()
                .append(&tracking_ref, &LogRecord::for_commit(commit_id, commit))?;
        }
        tracing::info!(remote = remote_name, branch = %branch_name, commits = copied.len(), "fetched");

        Ok(())
    }
}
