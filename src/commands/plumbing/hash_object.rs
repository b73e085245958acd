use crate::areas::repository::Repository;
use crate::artifacts::core::error::UserError;
use crate::artifacts::objects::object::Object;
use std::io::Write;

impl Repository {
    /// Print a file's path-salted blob id, storing the blob when `write` is set
    pub fn hash_object(&mut self, file: &str, write: bool) -> anyhow::Result<()> {
        if write {
            self.require_initialized()?;
        }

        let path = self.workspace().relative_path(file);
        let blob = self
            .workspace()
            .parse_blob(&path)?
            .ok_or(UserError::FileNotFound)?;

        let object_id = blob.object_id()?;
        writeln!(self.writer(), "{object_id}")?;

        if write {
            self.database().store(&blob)?;
        }

        Ok(())
    }
}
