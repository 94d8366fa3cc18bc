//! Tag Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Tag CRUD operations.
//! Names are validated before every insert and rename.

use log::debug;
use rusqlite::{params, params_from_iter, Connection};

use crate::domain::{validate_tag_name, DomainError, DomainResult, Tag, TagId};
use crate::repository::db::{expect_at_most_one_row, expect_one_row, inserted_id, repeat_vars};
use crate::repository::FileTagRepository;
use crate::repository::traits::{NamedRepository, Repository};

/// SQLite implementation of Tag repository
pub struct TagRepository<'c> {
    pub(super) conn: &'c Connection,
}

impl<'c> TagRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Add a tag
    pub fn insert(&self, name: &str) -> DomainResult<Tag> {
        validate_tag_name(name)?;

        let affected = self
            .conn
            .execute("INSERT INTO tag (name) VALUES (?)", params![name])?;
        expect_one_row("insert tag", affected)?;

        let id = inserted_id(self.conn, "tag")?;
        debug!("added tag #{} '{}'", id, name);
        Ok(Tag::new(id, name))
    }

    /// Rename a tag. The tag must exist.
    pub fn rename(&self, id: TagId, name: &str) -> DomainResult<Tag> {
        validate_tag_name(name)?;

        let affected = self
            .conn
            .execute("UPDATE tag SET name = ? WHERE id = ?", params![name, id])?;
        expect_one_row("rename tag", affected)?;

        debug!("renamed tag #{} to '{}'", id, name);
        Ok(Tag::new(id, name))
    }

    fn query_tags(&self, sql: &str, params: impl rusqlite::Params) -> DomainResult<Vec<Tag>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;

        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(row_to_tag(row)?);
        }
        Ok(tags)
    }
}

impl Repository<Tag> for TagRepository<'_> {
    fn create(&self, entity: &Tag) -> DomainResult<Tag> {
        self.insert(&entity.name)
    }

    fn find_by_id(&self, id: TagId) -> DomainResult<Option<Tag>> {
        let tags = self.query_tags("SELECT id, name FROM tag WHERE id = ?", params![id])?;
        Ok(tags.into_iter().next())
    }

    /// All tags, by name
    fn list(&self) -> DomainResult<Vec<Tag>> {
        self.query_tags("SELECT id, name FROM tag ORDER BY name", [])
    }

    fn update(&self, entity: &Tag) -> DomainResult<Tag> {
        self.rename(entity.id, &entity.name)
    }

    /// Removes the tag's file-tags, then the tag. Refused without touching
    /// anything while implications still reference the tag.
    fn delete(&self, id: TagId) -> DomainResult<()> {
        let edges: u32 = self.conn.query_row(
            "SELECT COUNT(1) FROM implication WHERE tag_id = ?1 OR implied_tag_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        if edges > 0 {
            return Err(DomainError::Conflict(format!(
                "tag #{} is referenced by {} implication(s)",
                id, edges
            )));
        }

        let file_tags = FileTagRepository::new(self.conn).delete_by_tag(id)?;

        let affected = self
            .conn
            .execute("DELETE FROM tag WHERE id = ?", params![id])?;
        expect_at_most_one_row("delete tag", affected)?;

        debug!("deleted tag #{} and {} file-tag(s)", id, file_tags);
        Ok(())
    }
}

impl NamedRepository<Tag> for TagRepository<'_> {
    fn count(&self) -> DomainResult<u32> {
        let count = self
            .conn
            .query_row("SELECT COUNT(1) FROM tag", [], |row| row.get(0))?;
        Ok(count)
    }

    fn find_by_ids(&self, ids: &[TagId]) -> DomainResult<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, name FROM tag WHERE id IN ({}) ORDER BY name",
            repeat_vars(ids.len())
        );
        self.query_tags(&sql, params_from_iter(ids))
    }

    fn find_by_name(&self, name: &str) -> DomainResult<Option<Tag>> {
        let tags = self.query_tags("SELECT id, name FROM tag WHERE name = ?", params![name])?;
        Ok(tags.into_iter().next())
    }

    fn find_by_names(&self, names: &[&str]) -> DomainResult<Vec<Tag>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, name FROM tag WHERE name IN ({}) ORDER BY name",
            repeat_vars(names.len())
        );
        self.query_tags(&sql, params_from_iter(names))
    }
}

/// Convert a database row to Tag
pub(crate) fn row_to_tag(row: &rusqlite::Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}
