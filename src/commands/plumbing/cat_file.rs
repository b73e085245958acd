use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Print the payload of a stored object, addressed by a full or unique abbreviated id
    pub fn cat_file(&mut self, object_id: &str) -> anyhow::Result<()> {
        self.require_initialized()?;

        let mut matches = self.database().find_objects_by_prefix(object_id)?;
        let object_id = match matches.len() {
            1 => matches.remove(0),
            0 => anyhow::bail!("object {object_id} not found"),
            _ => anyhow::bail!("object id {object_id} is ambiguous"),
        };

        let object = self
            .database()
            .parse_object(&object_id)?
            .ok_or_else(|| anyhow::anyhow!("object {object_id} not found"))?;

        write!(self.writer(), "{}", object.display())?;

        Ok(())
    }
}
