use crate::areas::repository::Repository;
use crate::artifacts::core::error::UserError;
use crate::artifacts::log::log_record::flatten;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::HashSet;
use std::io::Write;

impl Repository {
    /// Ids of the commits whose message is exactly `message`
    pub async fn find(&self, message: &str) -> anyhow::Result<()> {
        self.require_initialized()?;

        let message = flatten(message);
        let mut seen = HashSet::<ObjectId>::new();
        let matches = self
            .logs()
            .read_head()?
            .into_iter()
            .rev()
            .filter(|record| record.is_commit() && record.message == message)
            .filter(|record| seen.insert(record.commit.clone()))
            .map(|record| record.commit)
            .collect::<Vec<_>>();

        if matches.is_empty() {
            return Err(UserError::NoCommitWithMessage.into());
        }

        for commit_id in matches {
            writeln!(self.writer(), "{commit_id}")?;
        }

        Ok(())
    }
}
