//! Repository configuration
//!
//! `.gitlet/config` is a list of tab-separated records. The only record kind
//! is a remote: `remote\t<name>\turl = \t<path>`.

use crate::artifacts::remote::remote::Remote;
use anyhow::Context;
use derive_new::new;
use std::io::Write;
use std::path::Path;

#[derive(Debug, new)]
pub struct Config {
    path: Box<Path>,
}

impl Config {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn remotes(&self) -> anyhow::Result<Vec<Remote>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read config at {:?}", self.path))?;

        Ok(content.lines().filter_map(Remote::parse_record).collect())
    }

    pub fn find_remote(&self, name: &str) -> anyhow::Result<Option<Remote>> {
        Ok(self
            .remotes()?
            .into_iter()
            .find(|remote| remote.name() == name))
    }

    pub fn add_remote(&self, remote: &Remote) -> anyhow::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open config at {:?}", self.path))?;
        writeln!(file, "{}", remote.to_record())?;

        Ok(())
    }

    /// Drop a remote's record, keeping every other line; returns whether it existed
    pub fn remove_remote(&self, name: &str) -> anyhow::Result<bool> {
        if !self.path.is_file() {
            return Ok(false);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read config at {:?}", self.path))?;
        let mut found = false;
        let kept = content
            .lines()
            .filter(|line| {
                let matches = Remote::parse_record(line).is_some_and(|remote| remote.name() == name);
                found |= matches;
                !matches
            })
            .map(|line| format!("{line}\n"))
            .collect::<String>();

        if found {
            std::fs::write(&self.path, kept)
                .with_context(|| format!("failed to write config at {:?}", self.path))?;
        }

        Ok(found)
    }
}
