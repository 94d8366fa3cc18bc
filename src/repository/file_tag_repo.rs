//! File-Tag Repository
//!
//! The tag and value side of file-tag associations: the part this crate
//! rewrites when tags are copied, merged or deleted.

use log::debug;
use rusqlite::{params, params_from_iter, Connection};

use crate::domain::{DomainResult, FileId, FileTag, TagId, ValueId};
use super::db::repeat_vars;

pub struct FileTagRepository<'c> {
    conn: &'c Connection,
}

impl<'c> FileTagRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// File-tags carrying `tag_id`
    pub fn by_tag(&self, tag_id: TagId) -> DomainResult<Vec<FileTag>> {
        self.by_tags(&[tag_id])
    }

    /// File-tags carrying any of `tag_ids`
    pub fn by_tags(&self, tag_ids: &[TagId]) -> DomainResult<Vec<FileTag>> {
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT file_id, tag_id, value_id
             FROM file_tag
             WHERE tag_id IN ({})
             ORDER BY file_id, tag_id, value_id",
            repeat_vars(tag_ids.len())
        );
        self.query_file_tags(&sql, params_from_iter(tag_ids))
    }

    /// File-tags qualified by `value_id`
    pub fn by_value(&self, value_id: ValueId) -> DomainResult<Vec<FileTag>> {
        self.query_file_tags(
            "SELECT file_id, tag_id, value_id
             FROM file_tag
             WHERE value_id = ?
             ORDER BY file_id, tag_id",
            params![value_id],
        )
    }

    pub fn count_by_value(&self, value_id: ValueId) -> DomainResult<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(1) FROM file_tag WHERE value_id = ?",
            params![value_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Tag a file. Returns false if the file already had this tag and value.
    pub fn add(&self, file_id: FileId, tag_id: TagId, value_id: ValueId) -> DomainResult<bool> {
        let affected = self.conn.execute(
            "INSERT OR IGNORE INTO file_tag (file_id, tag_id, value_id) VALUES (?, ?, ?)",
            params![file_id, tag_id, value_id],
        )?;
        Ok(affected == 1)
    }

    /// Untag a file. Returns false if there was nothing to remove.
    pub fn delete(&self, file_id: FileId, tag_id: TagId, value_id: ValueId) -> DomainResult<bool> {
        let affected = self.conn.execute(
            "DELETE FROM file_tag WHERE file_id = ? AND tag_id = ? AND value_id = ?",
            params![file_id, tag_id, value_id],
        )?;
        Ok(affected == 1)
    }

    pub fn delete_by_tag(&self, tag_id: TagId) -> DomainResult<usize> {
        let affected = self
            .conn
            .execute("DELETE FROM file_tag WHERE tag_id = ?", params![tag_id])?;
        Ok(affected)
    }

    pub fn delete_by_value(&self, value_id: ValueId) -> DomainResult<usize> {
        let affected = self
            .conn
            .execute("DELETE FROM file_tag WHERE value_id = ?", params![value_id])?;
        Ok(affected)
    }

    /// Give `dest_tag_id` every file (and value) that `source_tag_id` has.
    pub fn copy(&self, source_tag_id: TagId, dest_tag_id: TagId) -> DomainResult<usize> {
        let affected = self.conn.execute(
            "INSERT OR IGNORE INTO file_tag (file_id, tag_id, value_id)
             SELECT file_id, ?2, value_id
             FROM file_tag
             WHERE tag_id = ?1",
            params![source_tag_id, dest_tag_id],
        )?;
        debug!(
            "copied {} file-tag(s) from tag #{} to tag #{}",
            affected, source_tag_id, dest_tag_id
        );
        Ok(affected)
    }

    fn query_file_tags(&self, sql: &str, params: impl rusqlite::Params) -> DomainResult<Vec<FileTag>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;

        let mut file_tags = Vec::new();
        while let Some(row) = rows.next()? {
            file_tags.push(FileTag::new(row.get(0)?, row.get(1)?, row.get(2)?));
        }
        Ok(file_tags)
    }
}
