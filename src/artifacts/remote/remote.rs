use crate::artifacts::core::error::UserError;
use derive_new::new;
use std::path::{Path, PathBuf};

/// Directory name every repository metadata root must carry
pub const METADATA_DIR: &str = ".gitlet";

const RECORD_KIND: &str = "remote";
const URL_KEY: &str = "url = ";

/// A named second repository root on a reachable filesystem
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Remote {
    name: String,
    /// Path of the remote's metadata root, as the user typed it
    path: PathBuf,
}

impl Remote {
    /// Validate a user-supplied remote: the path must name a `.gitlet` directory
    pub fn try_parse(name: &str, path: &str) -> anyhow::Result<Self> {
        let path = PathBuf::from(path);

        if name.is_empty() || name.contains(['/', '\t', '\n']) {
            return Err(UserError::IncorrectOperands.into());
        }
        if path.file_name().is_none_or(|file_name| file_name != METADATA_DIR) {
            return Err(UserError::IncorrectOperands.into());
        }

        Ok(Remote::new(name.to_string(), path))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Metadata root of the remote, resolving relative paths against the work tree
    pub fn resolve_root(&self, work_tree: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            work_tree.join(&self.path)
        }
    }

    /// Config line: `remote\t<name>\turl = \t<path>`
    pub fn to_record(&self) -> String {
        format!(
            "{RECORD_KIND}\t{}\t{URL_KEY}\t{}",
            self.name,
            self.path.display()
        )
    }

    pub fn parse_record(line: &str) -> Option<Self> {
        let mut fields = line.splitn(4, '\t');
        let (Some(RECORD_KIND), Some(name), Some(URL_KEY), Some(path)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return None;
        };

        Some(Remote::new(name.to_string(), PathBuf::from(path)))
    }
}
