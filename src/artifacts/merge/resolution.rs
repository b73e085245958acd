//! Per-path reconciliation of a three-way merge
//!
//! Every path tracked by the ancestor, current or given tree gets one
//! [`Decision`]. Paths decided by [`Decision::LineMerge`] get a fresh blob whose
//! content is produced by [`merge_lines`]. Those blobs are returned alongside
//! the merged tree and are not stored here, so the caller can run the checkout
//! safety check before anything touches the object database.

use crate::artifacts::index::entry::Entry;
use crate::artifacts::merge::line_merge::merge_lines;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Keep the current side's state
    Current,
    /// Take the given side's state
    Given,
    /// Leave the path out of the merged tree
    Drop,
    /// Both sides changed it differently
    LineMerge,
}

/// Decide one path from its blob ids in the ancestor, current and given trees
pub fn decide(
    ancestor: Option<&ObjectId>,
    current: Option<&ObjectId>,
    given: Option<&ObjectId>,
) -> Decision {
    let Some(ancestor) = ancestor else {
        return match (current, given) {
            (None, None) => Decision::Drop,
            (Some(_), None) => Decision::Current,
            (None, Some(_)) => Decision::Given,
            (Some(current), Some(given)) if current == given => Decision::Current,
            (Some(_), Some(_)) => Decision::LineMerge,
        };
    };

    let current_unchanged = current == Some(ancestor);
    let given_unchanged = given == Some(ancestor);

    match (current, given) {
        (None, None) => Decision::Drop,
        (_, None) if current_unchanged => Decision::Drop,
        (None, _) if given_unchanged => Decision::Drop,
        (Some(current), Some(given)) if current == given => Decision::Current,
        _ if current_unchanged => Decision::Given,
        _ if given_unchanged => Decision::Current,
        _ => Decision::LineMerge,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeResolution {
    tree: Tree,
    blobs: Vec<Blob>,
    conflicted: bool,
}

impl MergeResolution {
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Blobs created by line merges, not yet stored
    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    pub fn is_conflicted(&self) -> bool {
        self.conflicted
    }
}

/// Reconcile three committed trees
///
/// `load_blob` reads the content of a blob id from either side of a line merge.
pub fn resolve<F>(
    ancestor: &Tree,
    current: &Tree,
    given: &Tree,
    load_blob: F,
) -> anyhow::Result<MergeResolution>
where
    F: Fn(&ObjectId) -> anyhow::Result<Blob>,
{
    let paths = ancestor
        .present_entries()
        .chain(current.present_entries())
        .chain(given.present_entries())
        .map(|entry| entry.path.clone())
        .collect::<BTreeSet<PathBuf>>();

    let mut tree = Tree::default();
    let mut blobs = Vec::new();
    let mut conflicted = false;

    for path in paths {
        let oid_of = |tree: &Tree| {
            tree.get(&path)
                .filter(|entry| entry.is_present())
                .map(|entry| entry.oid.clone())
        };
        let (ancestor_oid, current_oid, given_oid) = (oid_of(ancestor), oid_of(current), oid_of(given));

        let decision = decide(ancestor_oid.as_ref(), current_oid.as_ref(), given_oid.as_ref());
        tracing::debug!(path = ?path, ?decision, "resolved merge path");

        match decision {
            Decision::Current => {
                if let Some(oid) = current_oid {
                    tree.insert(Entry::present(path, oid));
                }
            }
            Decision::Given => {
                if let Some(oid) = given_oid {
                    tree.insert(Entry::present(path, oid));
                }
            }
            Decision::Drop => {}
            Decision::LineMerge => {
                let current_text = current_oid.as_ref().map(&load_blob).transpose()?.map(|blob| blob.text());
                let given_text = given_oid.as_ref().map(&load_blob).transpose()?.map(|blob| blob.text());

                let merge = merge_lines(current_text.as_deref(), given_text.as_deref());
                conflicted |= merge.is_conflicted();

                let blob = Blob::new(path.clone(), merge.into_text());
                tree.insert(Entry::present(path, blob.object_id()?));
                blobs.push(blob);
            }
        }
    }

    Ok(MergeResolution {
        tree,
        blobs,
        conflicted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;
    use std::path::Path;

    fn oid(c: char) -> ObjectId {
        ObjectId::try_parse(c.to_string().repeat(40)).unwrap()
    }

    #[rstest]
    #[case(None, Some('1'), None, Decision::Current)]
    #[case(None, None, Some('2'), Decision::Given)]
    #[case(None, Some('1'), Some('1'), Decision::Current)]
    #[case(None, Some('1'), Some('2'), Decision::LineMerge)]
    #[case(Some('0'), Some('0'), Some('2'), Decision::Given)]
    #[case(Some('0'), Some('0'), None, Decision::Drop)]
    #[case(Some('0'), Some('1'), Some('0'), Decision::Current)]
    #[case(Some('0'), None, Some('0'), Decision::Drop)]
    #[case(Some('0'), None, None, Decision::Drop)]
    #[case(Some('0'), Some('0'), Some('0'), Decision::Current)]
    #[case(Some('0'), Some('1'), Some('1'), Decision::Current)]
    #[case(Some('0'), Some('1'), Some('2'), Decision::LineMerge)]
    #[case(Some('0'), Some('1'), None, Decision::LineMerge)]
    #[case(Some('0'), None, Some('2'), Decision::LineMerge)]
    fn decisions_follow_the_three_way_rules(
        #[case] ancestor: Option<char>,
        #[case] current: Option<char>,
        #[case] given: Option<char>,
        #[case] expected: Decision,
    ) {
        let (ancestor, current, given) = (ancestor.map(oid), current.map(oid), given.map(oid));

        assert_eq!(decide(ancestor.as_ref(), current.as_ref(), given.as_ref()), expected);
    }

    struct Store(HashMap<ObjectId, Blob>);

    impl Store {
        fn new() -> Self {
            Store(HashMap::new())
        }

        fn put(&mut self, path: &str, content: &str) -> Entry {
            let blob = Blob::new(path, content.to_string());
            let oid = blob.object_id().unwrap();
            self.0.insert(oid.clone(), blob);
            Entry::present(path, oid)
        }

        fn load(&self, oid: &ObjectId) -> anyhow::Result<Blob> {
            self.0
                .get(oid)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("missing blob {oid}"))
        }
    }

    #[test]
    fn both_sides_editing_a_line_conflicts() {
        let mut store = Store::new();
        let ancestor = Tree::from_entries([store.put("a.txt", "x\n")]);
        let current = Tree::from_entries([store.put("a.txt", "z\n")]);
        let given = Tree::from_entries([store.put("a.txt", "y\n")]);

        let resolution = resolve(&ancestor, &current, &given, |oid| store.load(oid)).unwrap();

        assert!(resolution.is_conflicted());
        assert_eq!(resolution.blobs().len(), 1);
        assert_eq!(resolution.blobs()[0].text(), "<<<<<<< HEAD\nz\n=======\ny\n>>>>>>>\n");
        assert_eq!(
            resolution.tree().get(Path::new("a.txt")).map(|entry| &entry.oid),
            Some(&resolution.blobs()[0].object_id().unwrap())
        );
    }

    #[test]
    fn independent_edits_merge_without_conflict() {
        let mut store = Store::new();
        let a = store.put("a.txt", "a\n");
        let b = store.put("b.txt", "b\n");
        let a_edit = store.put("a.txt", "a2\n");
        let c = store.put("c.txt", "c\n");
        let ancestor = Tree::from_entries([a.clone(), b.clone()]);
        let current = Tree::from_entries([a_edit.clone(), b.clone()]);
        let given = Tree::from_entries([a.clone(), c.clone()]);

        let resolution = resolve(&ancestor, &current, &given, |oid| store.load(oid)).unwrap();

        assert!(!resolution.is_conflicted());
        assert!(resolution.blobs().is_empty());
        assert_eq!(resolution.tree(), &Tree::from_entries([a_edit, c]));
    }

    #[test]
    fn resolving_twice_is_deterministic() {
        let mut store = Store::new();
        let ancestor = Tree::from_entries([store.put("a.txt", "1\n2\n")]);
        let current = Tree::from_entries([store.put("a.txt", "1\nc\n")]);
        let given = Tree::from_entries([store.put("a.txt", "g\n2\n")]);

        let first = resolve(&ancestor, &current, &given, |oid| store.load(oid)).unwrap();
        let second = resolve(&ancestor, &current, &given, |oid| store.load(oid)).unwrap();

        assert_eq!(first, second);
    }
}
