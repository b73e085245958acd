use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::error::UserError;
use crate::artifacts::objects::tree::Tree;

impl Repository {
    /// Switch to another branch, local or remote-tracking
    pub async fn checkout(&mut self, target: &str) -> anyhow::Result<()> {
        self.require_initialized()?;

        let branch_name =
            BranchName::try_parse(target.to_string()).map_err(|_| UserError::NoSuchBranch)?;
        let target_ref = self
            .refs()
            .find_branch(&branch_name)
            .ok_or(UserError::NoSuchBranch)?;

        let current_ref = self.refs().current_ref()?;
        if current_ref == target_ref {
            return Err(UserError::AlreadyOnBranch.into());
        }

        let (current_oid, _) = self.head_commit()?;
        let target_oid = self
            .refs()
            .read_ref(&target_ref)?
            .ok_or(UserError::NoSuchBranch)?;
        let target_tree = self.commit_tree(&target_oid)?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        self.migrate_to(&mut index, target_tree)?;
        self.refs().set_head(&target_ref)?;

        let message = format!(
            "checkout: moving from {} to {}",
            current_ref.branch_name()?,
            branch_name
        );
        self.logs()
            .append_head(&self.reference_record(Some(&current_oid), &target_oid, &message))?;

        Ok(())
    }

    /// Rewrite the working tree and the index from HEAD's tree to `target_tree`
    ///
    /// Refuses before touching anything when an untracked file is in the way.
    pub(crate) fn migrate_to(&self, index: &mut Index, target_tree: Tree) -> anyhow::Result<()> {
        let current_tree = self.head_tree()?;
        let working = self.workspace().snapshot()?;

        let migration = Migration::plan(&current_tree, &target_tree, &working)?;
        self.workspace().apply_migration(&migration, self.database())?;

        index.replace(target_tree);
        index.write_updates()?;

        Ok(())
    }

    /// Restore one file from HEAD or from the given commit
    pub async fn checkout_file(&mut self, commit_id: Option<&str>, file: &str) -> anyhow::Result<()> {
        self.require_initialized()?;

        let source_oid = match commit_id {
            Some(commit_id) => self.resolve_commit_id(commit_id)?,
            None => self.head_commit()?.0,
        };
        let source_tree = self.commit_tree(&source_oid)?;

        let path = self.workspace().relative_path(file);
        let entry = source_tree
            .get(&path)
            .filter(|entry| entry.is_present())
            .ok_or(UserError::FileNotInCommit)?;
        let blob = self.database().load_blob(&entry.oid)?;

        let head_tree = self.head_tree()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        self.workspace().write_file(&path, blob.content())?;

        match head_tree.get(&path) {
            Some(head_entry) => index.add(head_entry.clone()),
            None => {
                index.remove(&path);
            }
        }
        index.write_updates()?;
        tracing::debug!(path = ?path, commit = %source_oid, "restored file");

        Ok(())
    }
}
