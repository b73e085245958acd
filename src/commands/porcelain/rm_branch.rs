use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::core::error::UserError;

impl Repository {
    /// Delete a branch pointer; its commits stay in the object store
    pub async fn rm_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        self.require_initialized()?;

        let branch_name =
            BranchName::try_parse(branch_name.to_string()).map_err(|_| UserError::BranchNotFound)?;
        let branch_ref = SymRefName::for_branch(&branch_name);

        if self.refs().is_current_ref(&branch_ref)? {
            return Err(UserError::CannotRemoveCurrentBranch.into());
        }
        if self.refs().read_ref(&branch_ref)?.is_none() {
            return Err(UserError::BranchNotFound.into());
        }

        self.refs().delete_ref(&branch_ref)?;
        self.logs().delete(&branch_ref)?;

        Ok(())
    }
}
