use crate::areas::database::Database;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 2] = [".gitlet", ".git"];

/// Blob id of every file in the working tree, keyed by repository-relative path
pub type WorkspaceSnapshot = BTreeMap<PathBuf, ObjectId>;

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Turn a user-supplied path into a repository-relative one
    pub fn relative_path(&self, file_path: &str) -> PathBuf {
        let file_path = Path::new(file_path);

        match file_path.strip_prefix(self.path.as_ref()) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => file_path
                .components()
                .filter(|component| !matches!(component, std::path::Component::CurDir))
                .collect(),
        }
    }

    /// All files of the working tree, sorted, relative to its root
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = WalkDir::new(&self.path)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.path()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(Path::to_path_buf)
            })
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    fn is_ignored(path: &Path) -> bool {
        path.file_name()
            .map(|name| IGNORED_PATHS.contains(&name.to_string_lossy().as_ref()))
            .unwrap_or(false)
    }

    pub fn file_exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Option<Bytes>> {
        let full_path = self.path.join(file_path);

        if !full_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read(&full_path)
            .with_context(|| format!("Failed to read file: {file_path:?}"))?;

        Ok(Some(content.into()))
    }

    /// The file as a blob, or `None` if it does not exist
    pub fn parse_blob(&self, file_path: &Path) -> anyhow::Result<Option<Blob>> {
        Ok(self
            .read_file(file_path)?
            .map(|content| Blob::new(file_path, content)))
    }

    /// Blob ids of the whole working tree
    pub fn snapshot(&self) -> anyhow::Result<WorkspaceSnapshot> {
        self.list_files()?
            .into_iter()
            .filter_map(|path| match self.parse_blob(&path) {
                Ok(Some(blob)) => Some(blob.object_id().map(|oid| (path, oid))),
                Ok(None) => None,
                Err(error) => Some(Err(error)),
            })
            .collect()
    }

    pub fn write_file(&self, file_path: &Path, content: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for: {file_path:?}"))?;
        }
        if full_path.is_dir() {
            std::fs::remove_dir_all(&full_path)
                .with_context(|| format!("Failed to remove existing directory: {file_path:?}"))?;
        }

        std::fs::write(&full_path, content)
            .with_context(|| format!("Failed to write to file: {file_path:?}"))
    }

    /// Delete a file and any directories it leaves empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_file() {
            std::fs::remove_file(&full_path)
                .with_context(|| format!("Failed to remove file: {file_path:?}"))?;
        }
        self.prune_empty_dirs(&full_path)
    }

    fn prune_empty_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.starts_with(self.path.as_ref())
            && parent.is_dir()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("Failed to remove empty directory: {parent:?}"))?;
            self.prune_empty_dirs(parent)?;
        }

        Ok(())
    }

    // Deletions run first so a file can replace a directory it used to live in.
    pub fn apply_migration(&self, migration: &Migration, database: &Database) -> anyhow::Result<()> {
        for file_path in migration.deletes() {
            self.remove_file(file_path)?;
        }

        for (file_path, oid) in migration.writes() {
            let blob = database.load_blob(oid)?;
            self.write_file(file_path, blob.content())?;
        }

        tracing::debug!(
            deleted = migration.deletes().len(),
            written = migration.writes().len(),
            "applied migration"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    #[test]
    fn metadata_directory_is_not_listed() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());
        workspace.write_file(Path::new("a.txt"), b"a").unwrap();
        workspace.write_file(Path::new("nested/b.txt"), b"b").unwrap();
        workspace.write_file(Path::new(".gitlet/HEAD"), b"refs/heads/master").unwrap();

        let files = workspace.list_files().unwrap();

        assert_eq!(files, vec![PathBuf::from("a.txt"), PathBuf::from("nested/b.txt")]);
    }

    #[test]
    fn removing_the_last_file_prunes_its_directory() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());
        workspace.write_file(Path::new("deep/er/c.txt"), b"c").unwrap();

        workspace.remove_file(Path::new("deep/er/c.txt")).unwrap();

        assert!(!dir.path().join("deep").exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn snapshot_uses_path_salted_ids() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());
        workspace.write_file(Path::new("a.txt"), b"same").unwrap();
        workspace.write_file(Path::new("b.txt"), b"same").unwrap();

        let snapshot = workspace.snapshot().unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_ne!(snapshot[Path::new("a.txt")], snapshot[Path::new("b.txt")]);
    }

    #[test]
    fn user_paths_become_repository_relative() {
        let workspace = Workspace::new(PathBuf::from("/work").into_boxed_path());

        assert_eq!(workspace.relative_path("./notes/a.txt"), PathBuf::from("notes/a.txt"));
        assert_eq!(workspace.relative_path("/work/b.txt"), PathBuf::from("b.txt"));
    }
}
