//! History log records
//!
//! Every mutating command appends one line per event to the history log files
//! (`logs/HEAD`, `logs/heads/<branch>`, `logs/refs/<remote>/<branch>`). The log
//! is a read-side projection of history; nothing consults it for graph
//! correctness.
//!
//! ## Format
//!
//! One tab-separated line per record:
//! `<parent>\t<commit>\t<flag>\t<merge>\t<date>\t<message>`
//!
//! - `flag` is `0` for a commit and `1` for a reference-only event
//! - `merge` is two short ids separated by a space, or empty

use crate::artifacts::objects::commit::{Commit, READABLE_DATE_FORMAT};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Commit,
    Reference,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Commit => "0",
            RecordKind::Reference => "1",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub parent: ObjectId,
    pub commit: ObjectId,
    pub kind: RecordKind,
    /// Short ids of the merge parents, e.g. `1a2b3c4 5d6e7f8`
    pub merge: Option<String>,
    pub date: String,
    pub message: String,
}

impl LogRecord {
    /// Record for a newly created commit
    pub fn for_commit(commit_id: &ObjectId, commit: &Commit) -> Self {
        LogRecord {
            parent: commit.parent().cloned().unwrap_or_else(ObjectId::zero),
            commit: commit_id.clone(),
            kind: RecordKind::Commit,
            merge: commit
                .merge_parents()
                .map(|(current, given)| format!("{} {}", current.to_short_oid(), given.to_short_oid())),
            date: commit.readable_timestamp(),
            message: flatten(commit.message()),
        }
    }

    /// Record for a reference move that creates no commit
    pub fn for_reference(
        previous: Option<&ObjectId>,
        target: &ObjectId,
        timestamp: DateTime<FixedOffset>,
        message: &str,
    ) -> Self {
        LogRecord {
            parent: previous.cloned().unwrap_or_else(ObjectId::zero),
            commit: target.clone(),
            kind: RecordKind::Reference,
            merge: None,
            date: timestamp.format(READABLE_DATE_FORMAT).to_string(),
            message: flatten(message),
        }
    }

    pub fn is_commit(&self) -> bool {
        self.kind == RecordKind::Commit
    }

    pub fn parse(line: &str) -> anyhow::Result<Self> {
        let fields = line.splitn(6, '\t').collect::<Vec<_>>();
        let [parent, commit, kind, merge, date, message] = fields.as_slice() else {
            anyhow::bail!("invalid log record {line:?}");
        };

        let kind = match *kind {
            "0" => RecordKind::Commit,
            "1" => RecordKind::Reference,
            _ => anyhow::bail!("invalid log record flag {kind:?}"),
        };

        Ok(LogRecord {
            parent: ObjectId::try_parse(parent.to_string()).context("invalid log record parent")?,
            commit: ObjectId::try_parse(commit.to_string()).context("invalid log record commit")?,
            kind,
            merge: (!merge.is_empty()).then(|| merge.to_string()),
            date: date.to_string(),
            message: message.to_string(),
        })
    }
}

impl std::fmt::Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.parent,
            self.commit,
            self.kind.as_str(),
            self.merge.as_deref().unwrap_or_default(),
            self.date,
            self.message
        )
    }
}

/// Collapse a message onto one log line
pub fn flatten(message: &str) -> String {
    message.replace(['\r', '\n', '\t'], " ")
}
