use crate::areas::repository::Repository;

impl Repository {
    /// Move the current branch to any commit, rewriting the working tree and index
    pub async fn reset(&mut self, commit_id: &str) -> anyhow::Result<()> {
        self.require_initialized()?;

        let target_oid = self.resolve_commit_id(commit_id)?;
        let target_tree = self.commit_tree(&target_oid)?;
        let (current_oid, _) = self.head_commit()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        self.migrate_to(&mut index, target_tree)?;

        let current_ref = self.refs().current_ref()?;
        self.refs().update_ref(&current_ref, &target_oid)?;

        let message = format!("reset: moving to {target_oid}");
        self.logs().append_both(
            &current_ref,
            &self.reference_record(Some(&current_oid), &target_oid, &message),
        )?;

        Ok(())
    }
}
