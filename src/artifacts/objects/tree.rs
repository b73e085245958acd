//! Tree object
//!
//! A tree is one full snapshot of tracked paths: a flat set of entries, at most
//! one per path. Entries are kept sorted by path so that serialization, and
//! with it the tree id, does not depend on insertion order.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<status> <blob-id> <path>\n`

use crate::artifacts::core::error::ObjectError;
use crate::artifacts::index::entry::{Entry, EntryStatus};
use crate::artifacts::objects::blob::path_key;
use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<PathBuf, Entry>,
}

impl Tree {
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut tree = Self::default();
        for entry in entries {
            tree.insert(entry);
        }
        tree
    }

    /// Insert an entry, replacing any previous entry for the same path
    pub fn insert(&mut self, entry: Entry) -> Option<Entry> {
        self.entries.insert(entry.path.clone(), entry)
    }

    pub fn remove(&mut self, path: &Path) -> Option<Entry> {
        self.entries.remove(path)
    }

    pub fn get(&self, path: &Path) -> Option<&Entry> {
        self.entries.get(path)
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut Entry> {
        self.entries.get_mut(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.keys()
    }

    pub fn present_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values().filter(|entry| entry.is_present())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The snapshot a commit would record: removed entries stripped
    pub fn committed(&self) -> Tree {
        Tree::from_entries(self.present_entries().cloned())
    }

    /// Whether both trees record the same present path-to-blob mapping
    pub fn same_snapshot(&self, other: &Tree) -> bool {
        self.present_entries()
            .map(|entry| (&entry.path, &entry.oid))
            .eq(other.present_entries().map(|entry| (&entry.path, &entry.oid)))
    }

    fn payload(&self) -> String {
        self.entries
            .values()
            .map(|entry| {
                format!(
                    "{} {} {}\n",
                    entry.status.as_str(),
                    entry.oid,
                    path_key(&entry.path)
                )
            })
            .collect()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        frame(ObjectType::Tree, self.payload().as_bytes())
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut tree = Tree::default();

        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let malformed = || ObjectError::Malformed {
                oid: String::from("tree"),
                reason: format!("invalid entry line {line:?}"),
            };
            let mut parts = line.splitn(3, ' ');
            let (Some(status), Some(oid), Some(path)) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(malformed().into());
            };

            let status = EntryStatus::try_from(status)?;
            let oid = ObjectId::try_parse(oid.to_string())?;
            tree.insert(Entry::new(PathBuf::from(path), oid, status));
        }

        Ok(tree)
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.payload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn oid(c: char) -> ObjectId {
        ObjectId::try_parse(c.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn id_does_not_depend_on_insertion_order() {
        let forward = Tree::from_entries([Entry::present("a.txt", oid('1')), Entry::present("b.txt", oid('2'))]);
        let backward = Tree::from_entries([Entry::present("b.txt", oid('2')), Entry::present("a.txt", oid('1'))]);

        assert_eq!(forward.object_id().unwrap(), backward.object_id().unwrap());
    }

    #[test]
    fn one_entry_per_path() {
        let mut tree = Tree::default();
        tree.insert(Entry::present("a.txt", oid('1')));
        let previous = tree.insert(Entry::present("a.txt", oid('2')));

        assert_eq!(tree.len(), 1);
        assert_eq!(previous.map(|entry| entry.oid), Some(oid('1')));
        assert_eq!(tree.get(Path::new("a.txt")).map(|entry| &entry.oid), Some(&oid('2')));
    }

    #[test]
    fn committed_snapshot_drops_removed_entries() {
        let tree = Tree::from_entries([
            Entry::present("keep.txt", oid('1')),
            Entry::new("gone.txt".into(), oid('2'), EntryStatus::Removed),
        ]);

        let committed = tree.committed();

        assert_eq!(committed.len(), 1);
        assert!(committed.contains(Path::new("keep.txt")));
        assert!(committed.same_snapshot(&tree));
    }

    #[test]
    fn deserialize_reads_entries_with_spaces_in_paths() {
        let tree = Tree::from_entries([
            Entry::present("notes/my file.txt", oid('a')),
            Entry::new("old.txt".into(), oid('b'), EntryStatus::Removed),
        ]);
        let mut reader = Cursor::new(tree.serialize().unwrap());
        ObjectType::parse_object_type(&mut reader).unwrap();

        let parsed = Tree::deserialize(reader).unwrap();

        assert_eq!(parsed, tree);
    }

    #[test]
    fn malformed_line_is_an_error() {
        let reader = Cursor::new("0 not-an-entry");

        assert!(Tree::deserialize(reader).is_err());
    }
}
