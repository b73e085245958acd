//! Checkout migration planning
//!
//! A migration is the set of file system changes that take the working tree
//! from the current commit's tree `C` to a target tree `T`, given the working
//! tree `W` as it is now:
//!
//! - delete `p` when `W[p] == C[p]` and `T` does not track `p`
//! - write `T[p]` when `W[p] != T[p]`
//!
//! Files the user changed without committing are left alone when the target
//! drops them. Planning refuses with [`UserError::UntrackedFileInTheWay`] when a
//! write would clobber a file `C` does not track as-is.

use crate::areas::workspace::WorkspaceSnapshot;
use crate::artifacts::checkout::conflict::untracked_in_the_way;
use crate::artifacts::core::error::UserError;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Migration {
    deletes: BTreeSet<PathBuf>,
    writes: BTreeMap<PathBuf, ObjectId>,
}

impl Migration {
    pub fn plan(current: &Tree, target: &Tree, working: &WorkspaceSnapshot) -> anyhow::Result<Self> {
        let in_the_way = untracked_in_the_way(current, target, working);
        if !in_the_way.is_empty() {
            tracing::info!(paths = ?in_the_way, "untracked files block the migration");
            return Err(UserError::UntrackedFileInTheWay.into());
        }

        let deletes = current
            .present_entries()
            .filter(|entry| !target.get(&entry.path).is_some_and(|t| t.is_present()))
            .filter(|entry| working.get(&entry.path) == Some(&entry.oid))
            .map(|entry| entry.path.clone())
            .collect();

        let writes = target
            .present_entries()
            .filter(|entry| working.get(&entry.path) != Some(&entry.oid))
            .map(|entry| (entry.path.clone(), entry.oid.clone()))
            .collect();

        Ok(Migration { deletes, writes })
    }

    pub fn deletes(&self) -> &BTreeSet<PathBuf> {
        &self.deletes
    }

    pub fn writes(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.writes
    }

    pub fn is_empty(&self) -> bool {
        self.deletes.is_empty() && self.writes.is_empty()
    }
}
