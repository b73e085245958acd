use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

/// Lazy walk along the primary-parent chain, newest first
///
/// Merge parents are side links and are not followed. The walk is finite
/// because the chain ends at the root commit; a fresh walk is created for every
/// traversal.
pub struct CommitWalk<F>
where
    F: Fn(&ObjectId) -> anyhow::Result<Commit>,
{
    load: F,
    next_oid: Option<ObjectId>,
}

impl<F> CommitWalk<F>
where
    F: Fn(&ObjectId) -> anyhow::Result<Commit>,
{
    pub fn new(start: Option<ObjectId>, load: F) -> Self {
        CommitWalk {
            load,
            next_oid: start,
        }
    }
}

impl<F> Iterator for CommitWalk<F>
where
    F: Fn(&ObjectId) -> anyhow::Result<Commit>,
{
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.next_oid.take()?;

        match (self.load)(&oid) {
            Ok(commit) => {
                self.next_oid = commit.parent().cloned();
                Some(Ok((oid, commit)))
            }
            Err(error) => Some(Err(error)),
        }
    }
}
