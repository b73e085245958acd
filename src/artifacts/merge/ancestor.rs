//! Split-point discovery for merges
//!
//! ## Algorithm
//!
//! 1. Collect every commit reachable from the current head, following both the
//!    primary parent and the merge parents.
//! 2. Walk the given head along its primary-parent chain. At each step, check
//!    the commit itself, then its parent, then its merged parent against the
//!    reachable set, and return the first hit.
//!
//! This is a reachability approximation, not a lowest-common-ancestor search:
//! with several crossing merges the result is the first shared commit seen from
//! the given side, which need not be the nearest one.

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashSet, VecDeque};

/// Finds the split point of two heads
///
/// ```rust,ignore
/// let finder = AncestorFinder::new(|oid| database.load_commit(oid));
/// let split_point = finder.find(&current_head, &given_head)?;
/// ```
pub struct AncestorFinder<F>
where
    F: Fn(&ObjectId) -> anyhow::Result<Commit>,
{
    load: F,
}

impl<F> AncestorFinder<F>
where
    F: Fn(&ObjectId) -> anyhow::Result<Commit>,
{
    pub fn new(load: F) -> Self {
        AncestorFinder { load }
    }

    /// Every commit reachable from `head`, `head` included
    pub fn reachable_from(&self, head: &ObjectId) -> anyhow::Result<HashSet<ObjectId>> {
        let mut reachable = HashSet::from([head.clone()]);
        let mut queue = VecDeque::from([head.clone()]);

        while let Some(oid) = queue.pop_front() {
            let commit = (self.load)(&oid)?;

            for parent in commit.parents() {
                if reachable.insert(parent.clone()) {
                    queue.push_back(parent.clone());
                }
            }
        }

        Ok(reachable)
    }

    pub fn find(&self, current: &ObjectId, given: &ObjectId) -> anyhow::Result<Option<ObjectId>> {
        let reachable = self.reachable_from(current)?;
        let mut cursor = Some(given.clone());

        while let Some(oid) = cursor {
            if reachable.contains(&oid) {
                tracing::debug!(split_point = %oid, "found split point");
                return Ok(Some(oid));
            }

            let commit = (self.load)(&oid)?;
            let candidates = commit.parent().into_iter().chain(commit.merged_parent());
            for candidate in candidates {
                if reachable.contains(candidate) {
                    tracing::debug!(split_point = %candidate, "found split point");
                    return Ok(Some(candidate.clone()));
                }
            }

            cursor = commit.parent().cloned();
        }

        Ok(None)
    }
}
