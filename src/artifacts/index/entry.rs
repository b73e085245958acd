//! Tree entry representation
//!
//! An entry binds one repository-relative path to a blob id, with a status
//! telling whether the path is present in the snapshot or staged for removal.
//! Committed trees only ever hold present entries; the staging snapshot may
//! also hold removed ones.

use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryStatus {
    Present,
    Removed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Present => "0",
            EntryStatus::Removed => "1",
        }
    }
}

impl TryFrom<&str> for EntryStatus {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "0" => Ok(EntryStatus::Present),
            "1" => Ok(EntryStatus::Removed),
            _ => Err(anyhow::anyhow!("Invalid entry status {value:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, new)]
pub struct Entry {
    pub path: PathBuf,
    pub oid: ObjectId,
    pub status: EntryStatus,
}

impl Entry {
    pub fn present(path: impl Into<PathBuf>, oid: ObjectId) -> Self {
        Entry::new(path.into(), oid, EntryStatus::Present)
    }

    pub fn is_present(&self) -> bool {
        self.status == EntryStatus::Present
    }

    pub fn is_removed(&self) -> bool {
        self.status == EntryStatus::Removed
    }

    /// Entry equality over optional sides: both absent, or same blob and status
    pub fn same_state(left: Option<&Entry>, right: Option<&Entry>) -> bool {
        match (left, right) {
            (None, None) => true,
            (Some(left), Some(right)) => left.oid == right.oid && left.status == right.status,
            _ => false,
        }
    }

    /// Present entries only, so a removal compares equal to absence
    pub fn same_content(left: Option<&Entry>, right: Option<&Entry>) -> bool {
        Self::same_state(
            left.filter(|entry| entry.is_present()),
            right.filter(|entry| entry.is_present()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn oid(c: char) -> ObjectId {
        ObjectId::try_parse(c.to_string().repeat(40)).unwrap()
    }

    #[rstest]
    #[case(None, None, true)]
    #[case(Some(Entry::present("a", oid('1'))), None, false)]
    #[case(None, Some(Entry::present("a", oid('1'))), false)]
    #[case(Some(Entry::present("a", oid('1'))), Some(Entry::present("a", oid('1'))), true)]
    #[case(Some(Entry::present("a", oid('1'))), Some(Entry::present("a", oid('2'))), false)]
    #[case(
        Some(Entry::present("a", oid('1'))),
        Some(Entry::new("a".into(), oid('1'), EntryStatus::Removed)),
        false
    )]
    fn same_state_is_total(
        #[case] left: Option<Entry>,
        #[case] right: Option<Entry>,
        #[case] expected: bool,
    ) {
        assert_eq!(Entry::same_state(left.as_ref(), right.as_ref()), expected);
    }

    #[test]
    fn removed_entry_has_same_content_as_absence() {
        let removed = Entry::new("a".into(), oid('1'), EntryStatus::Removed);

        assert!(Entry::same_content(Some(&removed), None));
    }
}
