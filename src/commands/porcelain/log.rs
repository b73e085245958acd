use crate::areas::repository::Repository;
use crate::artifacts::log::commit_walk::CommitWalk;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// History of the checked-out branch along primary parents, newest first
    pub async fn log(&self) -> anyhow::Result<()> {
        self.require_initialized()?;

        let head = self.refs().read_head()?;
        let walk = CommitWalk::new(head, |oid| self.database().load_commit(oid));

        for step in walk {
            let (commit_id, commit) = step?;
            self.display_commit(&commit_id, &commit)?;
        }

        Ok(())
    }

    pub fn display_commit(&self, commit_id: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(writer, "commit {commit_id}")?;
        if let Some((current, given)) = commit.merge_parents() {
            writeln!(
                writer,
                "Merge: {} {}",
                current.to_short_oid(),
                given.to_short_oid()
            )?;
        }
        writeln!(writer, "Date: {}", commit.readable_timestamp())?;
        writeln!(writer, "{}", commit.message())?;
        writeln!(writer)?;

        Ok(())
    }
}
