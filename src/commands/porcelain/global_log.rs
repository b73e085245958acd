use crate::areas::repository::Repository;
use crate::artifacts::log::log_record::LogRecord;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::HashSet;
use std::io::Write;

impl Repository {
    /// Every commit recorded in any branch log, newest first
    pub async fn global_log(&self) -> anyhow::Result<()> {
        self.require_initialized()?;

        let mut seen = HashSet::<ObjectId>::new();

        for records in self.logs().read_branch_logs()? {
            for record in records.iter().rev().filter(|record| record.is_commit()) {
                if seen.insert(record.commit.clone()) {
                    self.display_record(record)?;
                }
            }
        }

        Ok(())
    }

    fn display_record(&self, record: &LogRecord) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(writer, "commit {}", record.commit)?;
        if let Some(merge) = &record.merge {
            writeln!(writer, "Merge: {merge}")?;
        }
        writeln!(writer, "Date: {}", record.date)?;
        writeln!(writer, "{}", record.message)?;
        writeln!(writer)?;

        Ok(())
    }
}
