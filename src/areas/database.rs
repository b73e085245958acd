//! Object store
//!
//! Write-once, content-addressed storage under `.gitlet/objects`. Each object
//! lives in `objects/<first-2-hex>/<remaining-38-hex>` and is stored
//! uncompressed as `<type> <size>\0<payload>`.
//!
//! Absence is not an error: lookups of unknown ids return `Ok(None)`.

use crate::artifacts::core::error::ObjectError;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use bytes::Bytes;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Raw object bytes, header included
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Option<Bytes>> {
        let object_path = self.path.join(object_id.to_path());

        if !object_path.is_file() {
            return Ok(None);
        }

        self.read_object(object_path).map(Some)
    }

    /// Store an object unless it is already present, returning its id
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(&object_id, object_path, object.serialize()?)?;
            tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");
        }

        Ok(object_id)
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<Option<ObjectBox>> {
        let Some((object_type, object_reader)) = self.parse_object_as_bytes(object_id)? else {
            return Ok(None);
        };

        let object = match object_type {
            ObjectType::Blob => ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?)),
            ObjectType::Tree => ObjectBox::Tree(Box::new(
                Tree::deserialize(object_reader).with_context(|| malformed(object_id))?,
            )),
            ObjectType::Commit => ObjectBox::Commit(Box::new(
                Commit::deserialize(object_reader).with_context(|| malformed(object_id))?,
            )),
        };

        Ok(Some(object))
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        match self.parse_object_as_bytes(object_id)? {
            Some((ObjectType::Blob, object_reader)) => Ok(Some(Blob::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Option<Tree>> {
        match self.parse_object_as_bytes(object_id)? {
            Some((ObjectType::Tree, object_reader)) => Ok(Some(
                Tree::deserialize(object_reader).with_context(|| malformed(object_id))?,
            )),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        match self.parse_object_as_bytes(object_id)? {
            Some((ObjectType::Commit, object_reader)) => Ok(Some(
                Commit::deserialize(object_reader).with_context(|| malformed(object_id))?,
            )),
            _ => Ok(None),
        }
    }

    /// Load a commit that history says must exist
    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        self.parse_object_as_commit(object_id)?
            .with_context(|| format!("commit {object_id} is missing from the object store"))
    }

    /// Load the tree of a commit, treating a tree-less commit as the empty tree
    pub fn load_commit_tree(&self, commit: &Commit) -> anyhow::Result<Tree> {
        match commit.tree_oid() {
            Some(tree_oid) => self
                .parse_object_as_tree(tree_oid)?
                .with_context(|| format!("tree {tree_oid} is missing from the object store")),
            None => Ok(Tree::default()),
        }
    }

    /// Load the content of a blob that a tree refers to
    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        self.parse_object_as_blob(object_id)?
            .with_context(|| format!("blob {object_id} is missing from the object store"))
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<Option<(ObjectType, Cursor<Bytes>)>> {
        let Some(object_content) = self.load(object_id)? else {
            return Ok(None);
        };
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)
            .with_context(|| malformed(object_id))?;

        Ok(Some((object_type, object_reader)))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Ok(object_content.into())
    }

    fn write_object(
        &self,
        object_id: &ObjectId,
        object_path: PathBuf,
        object_content: Bytes,
    ) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name(object_id));

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn generate_temp_name(object_id: &ObjectId) -> String {
        format!("tmp-obj-{}-{}", std::process::id(), object_id)
    }

    /// Find all objects whose id starts with the given prefix
    ///
    /// Only the shard directory named by the first two characters is scanned,
    /// so the prefix must be at least two characters long.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let mut matches = Vec::new();

        if prefix.len() < 2 || !prefix.is_ascii() {
            return Ok(matches);
        }

        let prefix = prefix.to_ascii_lowercase();
        let (dir_name, file_prefix) = prefix.split_at(2);
        let dir_path = self.path.join(dir_name);

        if dir_path.is_dir() {
            for entry in std::fs::read_dir(&dir_path)? {
                let entry = entry?;
                let file_name = entry.file_name();
                let file_name = file_name.to_string_lossy();

                if file_name.starts_with(file_prefix) {
                    // temp files and strays fail to parse and are skipped
                    if let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}")) {
                        matches.push(oid);
                    }
                }
            }
        }

        matches.sort();
        Ok(matches)
    }

    /// Copy one object's bytes into another store; returns whether a copy happened
    pub fn copy_object_to(&self, object_id: &ObjectId, other: &Database) -> anyhow::Result<bool> {
        if other.contains(object_id) {
            return Ok(false);
        }

        let object_content = self
            .load(object_id)?
            .with_context(|| format!("object {object_id} is missing from the source store"))?;
        let object_path = other.path.join(object_id.to_path());
        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?,
        )?;
        other.write_object(object_id, object_path, object_content)?;
        tracing::debug!(oid = %object_id, "copied object");

        Ok(true)
    }
}

fn malformed(object_id: &ObjectId) -> ObjectError {
    ObjectError::Malformed {
        oid: object_id.to_string(),
        reason: String::from("unable to parse stored object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::entry::Entry;
    use crate::artifacts::objects::object::Packable;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().join("objects").into_boxed_path())
    }

    #[test]
    fn stored_objects_load_back_byte_for_byte() {
        let dir = TempDir::new().unwrap();
        let database = database(&dir);
        let blob = Blob::new("a.txt", "hello\n");

        let oid = database.store(&blob).unwrap();

        assert_eq!(database.load(&oid).unwrap(), Some(blob.serialize().unwrap()));
        assert_eq!(
            database.parse_object_as_blob(&oid).unwrap().map(|b| b.content().clone()),
            Some(blob.content().clone())
        );
    }

    #[test]
    fn blobs_read_back_need_their_path_to_reproduce_the_id() {
        let dir = TempDir::new().unwrap();
        let database = database(&dir);
        let oid = database.store(&Blob::new("a.txt", "hello\n")).unwrap();

        let loaded = database.load_blob(&oid).unwrap();

        assert_eq!(loaded.path(), Path::new(""));
        assert_ne!(loaded.object_id().unwrap(), oid);
        assert_eq!(
            Blob::new("a.txt", loaded.content().clone()).object_id().unwrap(),
            oid
        );
    }

    #[test]
    fn storing_twice_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let database = database(&dir);
        let blob = Blob::new("a.txt", "same");

        let first = database.store(&blob).unwrap();
        let second = database.store(&blob).unwrap();
        let shard = database.objects_path().join(&first.as_ref()[..2]);

        assert_eq!(first, second);
        assert_eq!(std::fs::read_dir(shard).unwrap().count(), 1);
    }

    #[test]
    fn unknown_ids_are_absent_not_errors() {
        let dir = TempDir::new().unwrap();
        let database = database(&dir);

        assert_eq!(database.load(&ObjectId::zero()).unwrap(), None);
        assert!(database.parse_object_as_commit(&ObjectId::zero()).unwrap().is_none());
    }

    #[test]
    fn typed_accessors_reject_other_types() {
        let dir = TempDir::new().unwrap();
        let database = database(&dir);
        let tree = Tree::from_entries([Entry::present("a.txt", ObjectId::zero())]);

        let oid = database.store(&tree).unwrap();

        assert!(database.parse_object_as_commit(&oid).unwrap().is_none());
        assert_eq!(database.parse_object_as_tree(&oid).unwrap(), Some(tree));
    }

    #[test]
    fn prefix_search_scans_one_shard() {
        let dir = TempDir::new().unwrap();
        let database = database(&dir);
        let oid = database.store(&Commit::initial()).unwrap();

        let found = database.find_objects_by_prefix(&oid.as_ref()[..6]).unwrap();

        assert_eq!(found, vec![oid]);
        assert!(database.find_objects_by_prefix("zz").unwrap().is_empty());
    }

    #[test]
    fn objects_copy_between_stores() {
        let source_dir = TempDir::new().unwrap();
        let target_dir = TempDir::new().unwrap();
        let source = database(&source_dir);
        let target = database(&target_dir);
        let oid = source.store(&Blob::new("a.txt", "payload")).unwrap();

        assert!(source.copy_object_to(&oid, &target).unwrap());
        assert!(!source.copy_object_to(&oid, &target).unwrap());
        assert_eq!(target.load(&oid).unwrap(), source.load(&oid).unwrap());
    }
}
