//! Tag Usage Operations
//!
//! How many files carry each tag.

use crate::domain::{DomainResult, TagFileCount};

pub trait TagUsageOperations {
    /// Every tag in use with its distinct file count, by name.
    /// Tags carried by no file are omitted.
    fn usage(&self) -> DomainResult<Vec<TagFileCount>>;
}

impl TagUsageOperations for super::tag_repo::TagRepository<'_> {
    fn usage(&self) -> DomainResult<Vec<TagFileCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name, COUNT(DISTINCT ft.file_id)
             FROM tag t
             INNER JOIN file_tag ft ON ft.tag_id = t.id
             GROUP BY t.id, t.name
             ORDER BY t.name",
        )?;
        let mut rows = stmt.query([])?;

        let mut usage = Vec::new();
        while let Some(row) = rows.next()? {
            usage.push(TagFileCount {
                id: row.get(0)?,
                name: row.get(1)?,
                file_count: row.get(2)?,
            });
        }
        Ok(usage)
    }
}
