use crate::areas::workspace::WorkspaceSnapshot;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Working files that a move from `current` to `target` would clobber
///
/// A file is in the way when the current commit does not track that exact
/// working copy and the target either tracks a different version at the same
/// path, or needs a file where the working tree has a directory of files (or
/// the reverse).
pub fn untracked_in_the_way(
    current: &Tree,
    target: &Tree,
    working: &WorkspaceSnapshot,
) -> Vec<PathBuf> {
    let untracked = |path: &Path, working_oid: &ObjectId| {
        !current
            .get(path)
            .is_some_and(|entry| entry.is_present() && &entry.oid == working_oid)
    };
    let tracks_file = |path: &Path| target.get(path).is_some_and(|entry| entry.is_present());

    let mut in_the_way = BTreeSet::new();

    for target_entry in target.present_entries() {
        if let Some(working_oid) = working.get(&target_entry.path)
            && working_oid != &target_entry.oid
            && untracked(target_entry.path.as_path(), working_oid)
        {
            in_the_way.insert(target_entry.path.clone());
        }

        // a working file sitting where the target needs a directory
        for ancestor in target_entry.path.ancestors().skip(1) {
            if let Some(working_oid) = working.get(ancestor)
                && untracked(ancestor, working_oid)
            {
                in_the_way.insert(ancestor.to_path_buf());
            }
        }
    }

    // working files inside a directory the target replaces with a file
    for (path, working_oid) in working {
        let shadowed = path.ancestors().skip(1).any(tracks_file);
        if shadowed && untracked(path.as_path(), working_oid) {
            in_the_way.insert(path.clone());
        }
    }

    in_the_way.into_iter().collect()
}
