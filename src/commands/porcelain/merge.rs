use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::error::UserError;
use crate::artifacts::merge::ancestor::AncestorFinder;
use crate::artifacts::merge::resolution::resolve;
use crate::artifacts::objects::commit::{Commit, commit_timestamp};
use anyhow::Context;
use std::io::Write;

const FAST_FORWARD_NOTICE: &str = "Current branch fast-forwarded.";
const CONFLICT_NOTICE: &str = "Encountered a merge conflict.";

impl Repository {
    /// Merge another branch, local or remote-tracking, into the current one
    pub async fn merge(&mut self, given: &str) -> anyhow::Result<()> {
        self.require_initialized()?;

        let given_name =
            BranchName::try_parse(given.to_string()).map_err(|_| UserError::BranchNotFound)?;
        let given_ref = self
            .refs()
            .find_branch(&given_name)
            .ok_or(UserError::BranchNotFound)?;

        let current_ref = self.refs().current_ref()?;
        if current_ref == given_ref {
            return Err(UserError::MergeWithItself.into());
        }
        let current_name = current_ref.branch_name()?;

        let (current_oid, current_commit) = self.head_commit()?;
        let current_tree = self.database().load_commit_tree(&current_commit)?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if !index.snapshot().same_snapshot(&current_tree) {
            return Err(UserError::UncommittedChanges.into());
        }

        let given_oid = self
            .refs()
            .read_ref(&given_ref)?
            .ok_or(UserError::BranchNotFound)?;

        let split_point = AncestorFinder::new(|oid| self.database().load_commit(oid))
            .find(&current_oid, &given_oid)?
            .with_context(|| format!("{current_oid} and {given_oid} share no history"))?;

        if split_point == given_oid {
            return Err(UserError::GivenBranchIsAncestor.into());
        }

        if split_point == current_oid {
            let given_tree = self.commit_tree(&given_oid)?;
            self.migrate_to(&mut index, given_tree)?;
            self.refs().update_ref(&current_ref, &given_oid)?;

            let message = format!("merge {given_name}: Fast-forward");
            self.logs().append_both(
                &current_ref,
                &self.reference_record(Some(&current_oid), &given_oid, &message),
            )?;

            tracing::info!(from = %current_oid, to = %given_oid, "fast-forwarded");
            writeln!(self.writer(), "{FAST_FORWARD_NOTICE}")?;
            return Ok(());
        }

        let ancestor_tree = self.commit_tree(&split_point)?;
        let given_tree = self.commit_tree(&given_oid)?;
        let resolution = resolve(&ancestor_tree, &current_tree, &given_tree, |oid| {
            self.database().load_blob(oid)
        })?;

        let working = self.workspace().snapshot()?;
        let migration = Migration::plan(&current_tree, resolution.tree(), &working)?;

        for blob in resolution.blobs() {
            self.database().store(blob)?;
        }
        let tree_id = self.database().store(resolution.tree())?;
        self.workspace().apply_migration(&migration, self.database())?;

        let commit = Commit::new(
            Some(tree_id),
            Some(current_oid.clone()),
            Some((current_oid, given_oid)),
            commit_timestamp(),
            format!("Merged {given_name} into {current_name}."),
        );
        let commit_id = self.record_commit(&commit)?;

        index.replace(resolution.tree().clone());
        index.write_updates()?;
        tracing::info!(commit = %commit_id, conflicted = resolution.is_conflicted(), "merged");

        if resolution.is_conflicted() {
            writeln!(self.writer(), "{CONFLICT_NOTICE}")?;
        }

        Ok(())
    }
}
