//! Whole-object transfer between two object stores
//!
//! Commits are discovered breadth-first from a head over primary and merge
//! parents. The walk stops at commits reachable from the destination's recorded
//! head and at commits the destination already holds. The missing commits are
//! then copied parents first, each after its tree and the tree's blobs, so a
//! commit present in the destination always has its whole history there too,
//! even when an earlier transfer was cut short.

use crate::areas::database::Database;
use crate::artifacts::merge::ancestor::AncestorFinder;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(new)]
pub struct ObjectSync<'d> {
    source: &'d Database,
    destination: &'d Database,
}

impl ObjectSync<'_> {
    /// Copy the history of `head` the destination lacks
    ///
    /// Returns the copied commits, oldest first.
    pub fn copy_history(
        &self,
        head: &ObjectId,
        stop_at: Option<&ObjectId>,
    ) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        let missing = self.missing_commits(head, stop_at)?;
        let order = parents_first(head, &missing);
        let mut copied = Vec::with_capacity(order.len());

        for oid in order {
            if let Some(commit) = missing.get(&oid) {
                self.copy_commit(&oid, commit)?;
                copied.push((oid, commit.clone()));
            }
        }

        tracing::info!(commits = copied.len(), head = %head, "synchronized history");

        Ok(copied)
    }

    fn missing_commits(
        &self,
        head: &ObjectId,
        stop_at: Option<&ObjectId>,
    ) -> anyhow::Result<HashMap<ObjectId, Commit>> {
        let boundary = self.boundary(stop_at)?;
        let mut seen = HashSet::from([head.clone()]);
        let mut queue = VecDeque::from([head.clone()]);
        let mut missing = HashMap::new();

        while let Some(oid) = queue.pop_front() {
            if boundary.contains(&oid) || self.destination.contains(&oid) {
                continue;
            }

            let commit = self.source.load_commit(&oid)?;
            for parent in commit.parents() {
                if seen.insert(parent.clone()) {
                    queue.push_back(parent.clone());
                }
            }
            missing.insert(oid, commit);
        }

        Ok(missing)
    }

    fn boundary(&self, stop_at: Option<&ObjectId>) -> anyhow::Result<HashSet<ObjectId>> {
        match stop_at {
            Some(stop_at) if self.destination.contains(stop_at) => {
                AncestorFinder::new(|oid| self.destination.load_commit(oid)).reachable_from(stop_at)
            }
            _ => Ok(HashSet::new()),
        }
    }

    fn copy_commit(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        if let Some(tree_oid) = commit.tree_oid() {
            let tree = self.source.load_commit_tree(commit)?;
            for entry in tree.present_entries() {
                self.source.copy_object_to(&entry.oid, self.destination)?;
            }
            self.source.copy_object_to(tree_oid, self.destination)?;
        }
        self.source.copy_object_to(oid, self.destination)?;

        Ok(())
    }
}

// Post-order walk over the missing commits, so every commit follows its parents
fn parents_first(head: &ObjectId, missing: &HashMap<ObjectId, Commit>) -> Vec<ObjectId> {
    let mut order = Vec::with_capacity(missing.len());
    let mut visited = HashSet::new();
    let mut stack = vec![(head.clone(), false)];

    while let Some((oid, parents_done)) = stack.pop() {
        let Some(commit) = missing.get(&oid) else {
            continue;
        };

        if parents_done {
            order.push(oid);
            continue;
        }
        if !visited.insert(oid.clone()) {
            continue;
        }

        stack.push((oid, true));
        for parent in commit.parents().into_iter().rev() {
            if !visited.contains(parent) {
                stack.push((parent.clone(), false));
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::entry::Entry;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::tree::Tree;
    use assert_fs::TempDir;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().join("objects").into_boxed_path())
    }

    fn commit_file(
        database: &Database,
        parent: Option<&ObjectId>,
        path: &str,
        content: &str,
    ) -> ObjectId {
        let blob_oid = database.store(&Blob::new(path, content.to_string())).unwrap();
        let tree_oid = database
            .store(&Tree::from_entries([Entry::present(path, blob_oid)]))
            .unwrap();
        let commit = Commit::new(
            Some(tree_oid),
            parent.cloned(),
            None,
            DateTime::<chrono::Utc>::UNIX_EPOCH.fixed_offset(),
            content.to_string(),
        );

        database.store(&commit).unwrap()
    }

    #[test]
    fn full_history_is_copied_to_an_empty_store() {
        let (source_dir, destination_dir) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let (source, destination) = (database(&source_dir), database(&destination_dir));
        let root = source.store(&Commit::initial()).unwrap();
        let first = commit_file(&source, Some(&root), "a.txt", "one");
        let second = commit_file(&source, Some(&first), "a.txt", "two");

        let copied = ObjectSync::new(&source, &destination)
            .copy_history(&second, None)
            .unwrap();

        let ids = copied.into_iter().map(|(oid, _)| oid).collect::<Vec<_>>();
        assert_eq!(ids, vec![root, first, second.clone()]);

        let commit = destination.load_commit(&second).unwrap();
        let tree = destination.load_commit_tree(&commit).unwrap();
        assert_eq!(tree.len(), 1);
        for entry in tree.present_entries() {
            assert_eq!(destination.load_blob(&entry.oid).unwrap().text(), "two");
        }
    }

    #[test]
    fn copy_stops_at_the_recorded_head() {
        let (source_dir, destination_dir) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let (source, destination) = (database(&source_dir), database(&destination_dir));
        let root = source.store(&Commit::initial()).unwrap();
        let first = commit_file(&source, Some(&root), "a.txt", "one");
        let sync = ObjectSync::new(&source, &destination);
        sync.copy_history(&first, None).unwrap();

        let second = commit_file(&source, Some(&first), "b.txt", "two");
        let copied = sync.copy_history(&second, Some(&first)).unwrap();

        assert_eq!(copied.len(), 1);
        assert_eq!(copied[0].0, second);
        assert_eq!(copied[0].1.message(), "two");
    }

    #[test]
    fn syncing_an_up_to_date_head_copies_nothing() {
        let (source_dir, destination_dir) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let (source, destination) = (database(&source_dir), database(&destination_dir));
        let root = source.store(&Commit::initial()).unwrap();
        let sync = ObjectSync::new(&source, &destination);
        sync.copy_history(&root, None).unwrap();

        assert!(sync.copy_history(&root, Some(&root)).unwrap().is_empty());
    }

    #[test]
    fn interrupted_copy_is_completed_by_a_retry() {
        let (source_dir, destination_dir) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let (source, destination) = (database(&source_dir), database(&destination_dir));
        let root = source.store(&Commit::initial()).unwrap();
        let first = commit_file(&source, Some(&root), "a.txt", "one");
        let second = commit_file(&source, Some(&first), "b.txt", "two");

        let first_tree = source.load_commit_tree(&source.load_commit(&first).unwrap()).unwrap();
        let blob_oid = first_tree.present_entries().next().unwrap().oid.clone();
        let blob_path = source.objects_path().join(blob_oid.to_path());
        let blob_bytes = std::fs::read(&blob_path).unwrap();
        std::fs::remove_file(&blob_path).unwrap();

        let sync = ObjectSync::new(&source, &destination);
        assert!(sync.copy_history(&second, None).is_err());
        assert!(!destination.contains(&second));

        std::fs::write(&blob_path, blob_bytes).unwrap();
        let copied = sync.copy_history(&second, None).unwrap();

        let ids = copied.into_iter().map(|(oid, _)| oid).collect::<Vec<_>>();
        assert_eq!(ids, vec![first.clone(), second]);
        assert!(destination.contains(&first));
    }

    /// History:
    ///       root
    ///      /    \
    ///    left  right
    ///      \    /
    ///      merge
    #[test]
    fn merge_commits_are_copied_after_both_parents() {
        let (source_dir, destination_dir) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let (source, destination) = (database(&source_dir), database(&destination_dir));
        let root = source.store(&Commit::initial()).unwrap();
        let left = commit_file(&source, Some(&root), "a.txt", "left");
        let right = commit_file(&source, Some(&root), "b.txt", "right");
        let merge = source
            .store(&Commit::new(
                None,
                Some(left.clone()),
                Some((left.clone(), right.clone())),
                DateTime::<chrono::Utc>::UNIX_EPOCH.fixed_offset(),
                "merge".to_string(),
            ))
            .unwrap();

        let copied = ObjectSync::new(&source, &destination)
            .copy_history(&merge, None)
            .unwrap();

        let ids = copied.into_iter().map(|(oid, _)| oid).collect::<Vec<_>>();
        let position = |oid: &ObjectId| ids.iter().position(|id| id == oid).unwrap();
        assert_eq!(ids.len(), 4);
        assert_eq!(position(&root), 0);
        assert!(position(&left) < position(&merge));
        assert!(position(&right) < position(&merge));
    }
}
