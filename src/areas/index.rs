//! Staging area
//!
//! The index is the one mutable snapshot in the repository: a [`Tree`] of every
//! tracked path, where a path staged for removal stays in the snapshot with a
//! `removed` status until the next commit drops it.
//!
//! ## Index File Format
//!
//! The index file is a serialized tree object, header included:
//! `tree <size>\0` followed by one `<status> <blob-id> <path>` line per entry.

use crate::artifacts::index::entry::{Entry, EntryStatus};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use std::io::{Cursor, Read, Write};
use std::ops::DerefMut;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (`.gitlet/index`)
    path: Box<Path>,
    snapshot: Tree,
    /// Flag indicating if the index has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            snapshot: Tree::default(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Load the index from disk
    ///
    /// A missing or empty index file is an empty snapshot.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the index file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.snapshot = Tree::default();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(self.path())
            .with_context(|| format!("failed to open index file at {:?}", self.path))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        let mut content = Vec::new();
        lock.deref_mut().read_to_end(&mut content)?;

        if content.is_empty() {
            return Ok(());
        }

        let mut reader = Cursor::new(content);
        let object_type = ObjectType::parse_object_type(&mut reader)?;
        if object_type != ObjectType::Tree {
            anyhow::bail!("Invalid index file: expected a tree, found a {object_type}");
        }
        self.snapshot = Tree::deserialize(reader).context("Invalid index file")?;

        Ok(())
    }

    /// Persist the snapshot
    ///
    /// # Locking
    ///
    /// Acquires an exclusive lock on the index file during writing.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())
            .with_context(|| format!("failed to open index file at {:?}", self.path))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        lock.deref_mut().write_all(&self.snapshot.serialize()?)?;
        self.changed = false;
        tracing::debug!(entries = self.snapshot.len(), "wrote index");

        Ok(())
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&Entry> {
        self.snapshot.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.snapshot.entries()
    }

    pub fn snapshot(&self) -> &Tree {
        &self.snapshot
    }

    /// Upsert an entry, replacing any prior entry for its path
    pub fn add(&mut self, entry: Entry) {
        self.snapshot.insert(entry);
        self.changed = true;
    }

    /// Mark a path as staged for removal; returns false if it has no present entry
    pub fn mark_removed(&mut self, path: &Path) -> bool {
        match self.snapshot.get_mut(path) {
            Some(entry) if entry.is_present() => {
                entry.status = EntryStatus::Removed;
                self.changed = true;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, path: &Path) -> Option<Entry> {
        let removed = self.snapshot.remove(path);
        self.changed |= removed.is_some();
        removed
    }

    /// Replace the whole snapshot, e.g. with the tree of a newly checked-out commit
    pub fn replace(&mut self, snapshot: Tree) {
        self.snapshot = snapshot;
        self.changed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_id::ObjectId;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    fn oid(c: char) -> ObjectId {
        ObjectId::try_parse(c.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn missing_index_file_is_an_empty_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut index = Index::new(dir.path().join("index").into_boxed_path());

        index.rehydrate().unwrap();

        assert!(index.snapshot().is_empty());
    }

    #[test]
    fn removed_entries_survive_a_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index").into_boxed_path();
        let mut index = Index::new(path.clone());
        index.add(Entry::present("kept.txt", oid('1')));
        index.add(Entry::present("gone.txt", oid('2')));
        assert!(index.mark_removed(Path::new("gone.txt")));
        index.write_updates().unwrap();

        let mut reloaded = Index::new(path);
        reloaded.rehydrate().unwrap();

        assert_eq!(reloaded.snapshot(), index.snapshot());
        assert!(reloaded.entry_by_path(Path::new("gone.txt")).unwrap().is_removed());
    }

    #[test]
    fn marking_an_unknown_path_does_nothing() {
        let dir = TempDir::new().unwrap();
        let mut index = Index::new(dir.path().join("index").into_boxed_path());

        assert!(!index.mark_removed(Path::new("nope.txt")));
        assert!(!index.is_changed());
    }
}
