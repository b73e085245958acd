use crate::areas::repository::Repository;
use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::core::error::UserError;
use crate::artifacts::log::log_record::LogRecord;
use crate::artifacts::objects::commit::Commit;
use anyhow::Context;
use std::fs;

impl Repository {
    pub async fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(UserError::AlreadyInitialized.into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .gitlet/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .gitlet/refs/heads directory")?;

        fs::create_dir_all(self.refs().remotes_path())
            .context("Failed to create .gitlet/refs/remotes directory")?;

        fs::create_dir_all(self.logs().heads_log_path())
            .context("Failed to create .gitlet/logs directory")?;

        let initial_commit = Commit::initial();
        let initial_oid = self.database().store(&initial_commit)?;

        let master = SymRefName::for_branch(&BranchName::try_parse(DEFAULT_BRANCH.to_string())?);
        self.refs()
            .update_ref(&master, &initial_oid)
            .context("Failed to create the default branch")?;
        self.refs()
            .set_head(&master)
            .context("Failed to create initial HEAD reference")?;

        let index = self.index();
        let mut index = index.lock().await;
        index.write_updates().context("Failed to create .gitlet/index file")?;

        self.logs()
            .append_both(&master, &LogRecord::for_commit(&initial_oid, &initial_commit))?;

        tracing::info!(path = ?self.path(), "initialized repository");

        Ok(())
    }
}
