use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::StatusInfo;
use std::io::Write;

impl Repository {
    pub async fn status(&mut self) -> anyhow::Result<()> {
        self.require_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let head_tree = self.head_tree()?;
        let working = self.workspace().snapshot()?;
        let status = StatusInfo::collect(&head_tree, index.snapshot(), &working);

        let branches = self
            .refs()
            .list_branches()?
            .iter()
            .map(|branch| branch.branch_name())
            .collect::<anyhow::Result<Vec<_>>>()?;
        let current = self.refs().current_branch()?;

        write!(self.writer(), "{}", status.report(&branches, &current))?;

        Ok(())
    }
}
