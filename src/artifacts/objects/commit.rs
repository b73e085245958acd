//! Commit object
//!
//! Commits represent snapshots of the repository at specific points in time.
//! They contain:
//! - An optional tree object ID (the root commit has none)
//! - An optional parent commit ID
//! - An optional pair of merge parents (current head, merged head)
//! - A timestamp with timezone
//! - The commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! merge <current-sha> <given-sha>
//! date <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::io::BufRead;

/// Message of the commit every repository starts from
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// Environment variable overriding the timestamp of new commits
pub const COMMIT_DATE_ENV: &str = "GITLET_COMMIT_DATE";

/// Human-readable date format shared by `log` and the history log files
pub const READABLE_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

/// Timestamp for a new commit
///
/// Reads `GITLET_COMMIT_DATE` (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`) and falls
/// back to the current local time.
pub fn commit_timestamp() -> DateTime<FixedOffset> {
    std::env::var(COMMIT_DATE_ENV)
        .ok()
        .and_then(|date_str| {
            DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        })
        .unwrap_or_else(|| chrono::Local::now().fixed_offset())
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    tree_oid: Option<ObjectId>,
    parent: Option<ObjectId>,
    /// `(current, given)` heads for a merge commit
    merge_parents: Option<(ObjectId, ObjectId)>,
    timestamp: DateTime<FixedOffset>,
    message: String,
}

impl Commit {
    pub fn new(
        tree_oid: Option<ObjectId>,
        parent: Option<ObjectId>,
        merge_parents: Option<(ObjectId, ObjectId)>,
        timestamp: DateTime<FixedOffset>,
        message: String,
    ) -> Self {
        Commit {
            tree_oid,
            parent,
            merge_parents,
            timestamp,
            message,
        }
    }

    /// The root commit: no tree, no parent, epoch timestamp at +0000
    pub fn initial() -> Self {
        let epoch = DateTime::<chrono::Utc>::UNIX_EPOCH.fixed_offset();
        Commit::new(None, None, None, epoch, INITIAL_COMMIT_MESSAGE.to_string())
    }

    pub fn tree_oid(&self) -> Option<&ObjectId> {
        self.tree_oid.as_ref()
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn merge_parents(&self) -> Option<(&ObjectId, &ObjectId)> {
        self.merge_parents.as_ref().map(|(a, b)| (a, b))
    }

    /// Second parent of a merge commit
    pub fn merged_parent(&self) -> Option<&ObjectId> {
        self.merge_parents.as_ref().map(|(_, given)| given)
    }

    /// Primary parent followed by the merge parents, without duplicates
    pub fn parents(&self) -> Vec<&ObjectId> {
        let mut parents: Vec<&ObjectId> = self.parent.iter().collect();
        if let Some((current, given)) = &self.merge_parents {
            for oid in [current, given] {
                if !parents.contains(&oid) {
                    parents.push(oid);
                }
            }
        }
        parents
    }

    pub fn is_merge(&self) -> bool {
        self.merge_parents.is_some()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// String like "Thu Jan 01 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format(READABLE_DATE_FORMAT).to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![];

        if let Some(tree_oid) = &self.tree_oid {
            lines.push(format!("tree {tree_oid}"));
        }
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        if let Some((current, given)) = &self.merge_parents {
            lines.push(format!("merge {current} {given}"));
        }
        lines.push(format!(
            "date {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));

        lines
    }
}

fn parse_date(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, offset) = value
        .split_once(' ')
        .context("Invalid commit object: invalid date line")?;
    let seconds = seconds
        .parse::<i64>()
        .context("Invalid commit object: invalid timestamp")?;
    let offset = DateTime::parse_from_str(&format!("1970-01-01 00:00:00 {offset}"), "%Y-%m-%d %H:%M:%S %z")
        .context("Invalid commit object: invalid timezone")?
        .offset()
        .to_owned();

    let utc = DateTime::from_timestamp(seconds, 0).context("Invalid commit object: timestamp out of range")?;
    Ok(utc.with_timezone(&offset))
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut lines = self.header_lines();
        lines.push(String::new());
        lines.push(self.message.clone());

        frame(ObjectType::Commit, lines.join("\n").as_bytes())
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)?;

        let (header, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;

        let mut tree_oid = None;
        let mut parent = None;
        let mut merge_parents = None;
        let mut timestamp = None;

        for line in header.lines() {
            let (key, value) = line
                .split_once(' ')
                .with_context(|| format!("Invalid commit object: invalid line {line:?}"))?;
            match key {
                "tree" => tree_oid = Some(ObjectId::try_parse(value.to_string())?),
                "parent" => parent = Some(ObjectId::try_parse(value.to_string())?),
                "merge" => {
                    let (current, given) = value
                        .split_once(' ')
                        .context("Invalid commit object: invalid merge line")?;
                    merge_parents = Some((
                        ObjectId::try_parse(current.to_string())?,
                        ObjectId::try_parse(given.to_string())?,
                    ));
                }
                "date" => timestamp = Some(parse_date(value)?),
                _ => anyhow::bail!("Invalid commit object: unknown header {key:?}"),
            }
        }

        let timestamp = timestamp.context("Invalid commit object: missing date line")?;
        Ok(Commit::new(
            tree_oid,
            parent,
            merge_parents,
            timestamp,
            message.to_string(),
        ))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = self.header_lines();
        lines.push(String::new());
        lines.push(self.message.clone());

        lines.join("\n")
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

    fn reparse(commit: &Commit) -> Commit {
        let mut reader = Cursor::new(commit.serialize().unwrap());
        ObjectType::parse_object_type(&mut reader).unwrap();
        Commit::deserialize(reader).unwrap()
    }

    #[test]
    fn initial_commit_id_is_the_same_everywhere() {
        let first = Commit::initial();
        let second = Commit::initial();

        assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
        assert_eq!(first.tree_oid(), None);
        assert_eq!(first.parent(), None);
        assert_eq!(first.readable_timestamp(), "Thu Jan 01 00:00:00 1970 +0000");
    }

    #[test]
    fn initial_commit_survives_storage() {
        let commit = Commit::initial();

        assert_eq!(reparse(&commit), commit);
    }

    #[test]
    fn merge_commit_keeps_offset_and_multiline_message() {
        let timestamp = DateTime::parse_from_rfc2822("Tue, 1 Jul 2025 10:52:37 +0200").unwrap();
        let commit = Commit::new(
            Some(oid('a')),
            Some(oid('b')),
            Some((oid('b'), oid('c'))),
            timestamp,
            "Merged feature into master.\n\nsecond paragraph".to_string(),
        );

        let parsed = reparse(&commit);

        assert_eq!(parsed, commit);
        assert_eq!(parsed.readable_timestamp(), "Tue Jul 01 10:52:37 2025 +0200");
        assert_eq!(parsed.parents(), vec![&oid('b'), &oid('c')]);
    }

    #[test]
    fn unknown_header_is_rejected() {
        let reader = Cursor::new("author someone\ndate 0 +0000\n\nmsg");

        assert!(Commit::deserialize(reader).is_err());
    }
}
