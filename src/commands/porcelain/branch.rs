use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::{BranchName, SymRefName};

impl Repository {
    /// Create a branch pointing at HEAD
    pub async fn branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        self.require_initialized()?;

        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let (head_oid, _) = self.head_commit()?;

        self.refs().create_branch(&branch_name, &head_oid)?;

        let current = self.refs().current_ref()?.branch_name()?;
        let message = format!("branch: Created from {current}");
        self.logs().append(
            &SymRefName::for_branch(&branch_name),
            &self.reference_record(None, &head_oid, &message),
        )?;

        Ok(())
    }
}
