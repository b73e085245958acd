//! References (branches, remote-tracking branches, HEAD)
//!
//! References are human-readable names pointing to commits. Each one is a small
//! text file holding a 40-character commit id:
//!
//! - Branches: `refs/heads/<branch>`
//! - Remote-tracking branches: `refs/remotes/<remote>/<branch>`
//!
//! `HEAD` holds the path of the checked-out reference relative to the metadata
//! root, e.g. `refs/heads/master`.

use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::core::error::UserError;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reference manager rooted at the metadata directory (`.gitlet`)
#[derive(Debug, new)]
pub struct Refs {
    path: Box<Path>,
}

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

impl Refs {
    /// The reference HEAD points at
    pub fn current_ref(&self) -> anyhow::Result<SymRefName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {head_path:?}"))?;
        let content = content.trim();

        if content.is_empty() {
            anyhow::bail!("HEAD at {head_path:?} is empty");
        }

        Ok(SymRefName::new(content.to_string()))
    }

    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        self.current_ref()?.branch_name()
    }

    pub fn is_current_ref(&self, sym_ref_name: &SymRefName) -> anyhow::Result<bool> {
        Ok(&self.current_ref()? == sym_ref_name)
    }

    /// Point HEAD at another reference
    pub fn set_head(&self, sym_ref_name: &SymRefName) -> anyhow::Result<()> {
        self.update_ref_file(&self.head_path(), sym_ref_name.as_ref_path())?;
        tracing::debug!(target_ref = %sym_ref_name, "moved HEAD");

        Ok(())
    }

    /// Commit id of the checked-out reference
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_ref(&self.current_ref()?)
    }

    /// Advance the checked-out reference
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref(&self.current_ref()?, oid)
    }

    pub fn read_ref(&self, sym_ref_name: &SymRefName) -> anyhow::Result<Option<ObjectId>> {
        let path = self.ref_path(sym_ref_name);

        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read ref file at {path:?}"))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectId::try_parse(content.to_string()).with_context(
            || format!("ref file at {path:?} does not hold a commit id"),
        )?))
    }

    pub fn update_ref(&self, sym_ref_name: &SymRefName, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(&self.ref_path(sym_ref_name), oid.as_ref())?;
        tracing::debug!(reference = %sym_ref_name, oid = %oid, "updated ref");

        Ok(())
    }

    fn update_ref_file(&self, path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("failed to create parent directories for ref file at {path:?}")
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {path:?}"))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    pub fn create_branch(&self, name: &BranchName, source_oid: &ObjectId) -> anyhow::Result<()> {
        let sym_ref_name = SymRefName::for_branch(name);

        if self.ref_path(&sym_ref_name).exists() {
            return Err(UserError::BranchAlreadyExists.into());
        }

        self.update_ref(&sym_ref_name, source_oid)
    }

    /// Resolve a branch name: local branches first, then remote-tracking ones
    pub fn find_branch(&self, name: &BranchName) -> Option<SymRefName> {
        let local = SymRefName::for_branch(name);
        if self.ref_path(&local).is_file() {
            return Some(local);
        }

        let remote = SymRefName::new(format!(
            "{}{}",
            crate::artifacts::branch::branch_name::REMOTES_PREFIX,
            name
        ));
        self.ref_path(&remote).is_file().then_some(remote)
    }

    /// Delete a reference file, returning the commit it pointed at
    pub fn delete_ref(&self, sym_ref_name: &SymRefName) -> anyhow::Result<Option<ObjectId>> {
        let path = self.ref_path(sym_ref_name);
        let oid = self.read_ref(sym_ref_name)?;

        if path.is_file() {
            std::fs::remove_file(&path)
                .with_context(|| format!("failed to delete ref file at {path:?}"))?;
            self.prune_empty_parent_dirs(&path)?;
            tracing::debug!(reference = %sym_ref_name, "deleted ref");
        }

        Ok(oid)
    }

    pub fn list_branches(&self) -> anyhow::Result<Vec<SymRefName>> {
        self.list_refs(&self.heads_path())
    }

    pub fn list_remote_branches(&self, remote: &str) -> anyhow::Result<Vec<SymRefName>> {
        self.list_refs(&self.remotes_path().join(remote))
    }

    /// Create the directory that will hold a remote's tracking refs
    pub fn create_remote_namespace(&self, remote: &str) -> anyhow::Result<()> {
        let path = self.remotes_path().join(remote);
        std::fs::create_dir_all(&path)
            .with_context(|| format!("failed to create remote ref directory at {path:?}"))
    }

    /// Remove every tracking ref of a remote
    pub fn delete_remote_namespace(&self, remote: &str) -> anyhow::Result<()> {
        let path = self.remotes_path().join(remote);

        if path.exists() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("failed to remove remote ref directory at {path:?}"))?;
        }

        Ok(())
    }

    fn list_refs(&self, path: &Path) -> anyhow::Result<Vec<SymRefName>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut refs = WalkDir::new(path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                if entry.path().is_file() {
                    let relative_path = entry.path().strip_prefix(self.path.as_ref()).ok()?;
                    let components = relative_path
                        .components()
                        .map(|component| component.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>();
                    Some(SymRefName::new(components.join("/")))
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();
        refs.sort();

        Ok(refs)
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path()
            && parent != self.remotes_path()
            && parent.starts_with(self.refs_path())
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("failed to remove empty ref directory at {parent:?}"))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    pub fn ref_path(&self, sym_ref_name: &SymRefName) -> PathBuf {
        self.path.join(sym_ref_name.as_ref_path())
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }

    pub fn remotes_path(&self) -> PathBuf {
        self.refs_path().join("remotes")
    }
}
