//! History log files
//!
//! Append-only text files under `.gitlet/logs`:
//!
//! - `logs/HEAD`: every commit made in this repository and every HEAD move
//! - `logs/heads/<branch>`: events on one local branch
//! - `logs/refs/<remote>/<branch>`: commits fetched into a remote-tracking branch

use crate::artifacts::branch::branch_name::{HEADS_PREFIX, REMOTES_PREFIX, SymRefName};
use crate::artifacts::log::log_record::LogRecord;
use anyhow::Context;
use derive_new::new;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, new)]
pub struct Logs {
    /// Path to the logs directory (`.gitlet/logs`)
    path: Box<Path>,
}

impl Logs {
    pub fn logs_path(&self) -> &Path {
        &self.path
    }

    pub fn head_log_path(&self) -> PathBuf {
        self.path.join("HEAD")
    }

    pub fn heads_log_path(&self) -> PathBuf {
        self.path.join("heads")
    }

    /// Log file of a reference
    pub fn ref_log_path(&self, sym_ref_name: &SymRefName) -> anyhow::Result<PathBuf> {
        let ref_path = sym_ref_name.as_ref_path();

        if let Some(branch) = ref_path.strip_prefix(HEADS_PREFIX) {
            Ok(self.heads_log_path().join(branch))
        } else if let Some(tracking) = ref_path.strip_prefix(REMOTES_PREFIX) {
            Ok(self.path.join("refs").join(tracking))
        } else {
            anyhow::bail!("'{ref_path}' has no history log")
        }
    }

    pub fn append_head(&self, record: &LogRecord) -> anyhow::Result<()> {
        self.append_to(&self.head_log_path(), record)
    }

    pub fn append(&self, sym_ref_name: &SymRefName, record: &LogRecord) -> anyhow::Result<()> {
        self.append_to(&self.ref_log_path(sym_ref_name)?, record)
    }

    /// Append to both the reference's log and the HEAD log
    pub fn append_both(&self, sym_ref_name: &SymRefName, record: &LogRecord) -> anyhow::Result<()> {
        self.append(sym_ref_name, record)?;
        self.append_head(record)
    }

    fn append_to(&self, path: &Path, record: &LogRecord) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create log directory at {parent:?}"))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file at {path:?}"))?;
        writeln!(file, "{record}")?;
        tracing::debug!(log = ?path, commit = %record.commit, "appended log record");

        Ok(())
    }

    pub fn read_head(&self) -> anyhow::Result<Vec<LogRecord>> {
        Self::read_file(&self.head_log_path())
    }

    pub fn read(&self, sym_ref_name: &SymRefName) -> anyhow::Result<Vec<LogRecord>> {
        Self::read_file(&self.ref_log_path(sym_ref_name)?)
    }

    /// Records of every local branch log, one list per branch, ordered by file path
    pub fn read_branch_logs(&self) -> anyhow::Result<Vec<Vec<LogRecord>>> {
        let heads = self.heads_log_path();
        if !heads.exists() {
            return Ok(Vec::new());
        }

        let mut files = WalkDir::new(&heads)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.into_path())
            .collect::<Vec<_>>();
        files.sort();

        files.iter().map(|file| Self::read_file(file)).collect()
    }

    pub fn delete(&self, sym_ref_name: &SymRefName) -> anyhow::Result<()> {
        let path = self.ref_log_path(sym_ref_name)?;

        if path.is_file() {
            std::fs::remove_file(&path)
                .with_context(|| format!("failed to delete log file at {path:?}"))?;
        }

        Ok(())
    }

    /// Remove the fetch logs of a remote
    pub fn delete_remote(&self, remote: &str) -> anyhow::Result<()> {
        let path = self.path.join("refs").join(remote);

        if path.exists() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("failed to remove log directory at {path:?}"))?;
        }

        Ok(())
    }

    fn read_file(path: &Path) -> anyhow::Result<Vec<LogRecord>> {
        if !path.is_file() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read log file at {path:?}"))?;

        content
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| {
                LogRecord::parse(line).with_context(|| format!("corrupt log file at {path:?}"))
            })
            .collect()
    }
}
