use crate::areas::workspace::WorkspaceSnapshot;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::index::entry::Entry;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use std::path::PathBuf;

pub type FileSet = BTreeSet<PathBuf>;
pub type ChangeSet = BTreeMap<PathBuf, WorkspaceChangeType>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    /// Present index entries that differ from HEAD
    pub(crate) staged: FileSet,
    /// Index entries marked for removal
    pub(crate) removed: FileSet,
    /// Present index entries whose working file changed or vanished
    pub(crate) unstaged: ChangeSet,
    /// Working files with no present index entry
    pub(crate) untracked: FileSet,
}

impl StatusInfo {
    pub fn collect(head_tree: &Tree, index: &Tree, working: &WorkspaceSnapshot) -> Self {
        let mut status = StatusInfo::default();

        for entry in index.entries() {
            if entry.is_removed() {
                status.removed.insert(entry.path.clone());
                continue;
            }

            if !Entry::same_content(Some(entry), head_tree.get(&entry.path)) {
                status.staged.insert(entry.path.clone());
            }

            match working.get(&entry.path) {
                None => {
                    status.unstaged.insert(entry.path.clone(), WorkspaceChangeType::Deleted);
                }
                Some(oid) if oid != &entry.oid => {
                    status.unstaged.insert(entry.path.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }

        status.untracked = working
            .keys()
            .filter(|path| !index.get(path).is_some_and(|entry| entry.is_present()))
            .cloned()
            .collect();

        status
    }

    pub fn staged(&self) -> &FileSet {
        &self.staged
    }

    pub fn removed(&self) -> &FileSet {
        &self.removed
    }

    pub fn unstaged(&self) -> &ChangeSet {
        &self.unstaged
    }

    pub fn untracked(&self) -> &FileSet {
        &self.untracked
    }

    /// The sectioned report, each section sorted and followed by a blank line
    pub fn report(&self, branches: &[BranchName], current: &BranchName) -> String {
        let mut report = String::new();

        let _ = writeln!(report, "=== Branches ===");
        for branch in branches {
            let marker = if branch == current { "*" } else { "" };
            let _ = writeln!(report, "{marker}{branch}");
        }

        Self::write_files(&mut report, "Staged Files", &self.staged);
        Self::write_files(&mut report, "Removed Files", &self.removed);

        let _ = writeln!(report, "\n=== Modifications Not Staged For Commit ===");
        for (path, change) in &self.unstaged {
            let _ = writeln!(report, "{} {change}", path.display());
        }

        Self::write_files(&mut report, "Untracked Files", &self.untracked);
        report.push('\n');

        report
    }

    fn write_files(report: &mut String, title: &str, files: &FileSet) {
        let _ = writeln!(report, "\n=== {title} ===");
        for path in files {
            let _ = writeln!(report, "{}", path.display());
        }
    }
}
