//! Value Repository
//!
//! SQLite-backed implementation for tag values. The empty name always
//! resolves to the "no value" sentinel, which is never stored.

use log::debug;
use rusqlite::{params, params_from_iter, Connection};

use crate::domain::{validate_value_name, DomainResult, TagId, Value, ValueId, NO_VALUE};
use super::db::{expect_at_most_one_row, expect_one_row, inserted_id, repeat_vars};
use super::FileTagRepository;
use super::traits::{NamedRepository, Repository};

pub struct ValueRepository<'c> {
    conn: &'c Connection,
}

impl<'c> ValueRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Add a value
    pub fn insert(&self, name: &str) -> DomainResult<Value> {
        validate_value_name(name)?;

        let affected = self
            .conn
            .execute("INSERT INTO value (name) VALUES (?)", params![name])?;
        expect_one_row("insert value", affected)?;

        let id = inserted_id(self.conn, "value")?;
        debug!("added value #{} '{}'", id, name);
        Ok(Value::new(id, name))
    }

    /// Rename a value. The value must exist.
    pub fn rename(&self, id: ValueId, name: &str) -> DomainResult<Value> {
        validate_value_name(name)?;

        let affected = self
            .conn
            .execute("UPDATE value SET name = ? WHERE id = ?", params![name, id])?;
        expect_one_row("rename value", affected)?;

        Ok(Value::new(id, name))
    }

    /// Values used with `tag_id` by at least one file
    pub fn for_tag(&self, tag_id: TagId) -> DomainResult<Vec<Value>> {
        self.query_values(
            "SELECT DISTINCT v.id, v.name
             FROM value v
             INNER JOIN file_tag ft ON ft.value_id = v.id
             WHERE ft.tag_id = ?
             ORDER BY v.name",
            params![tag_id],
        )
    }

    /// Values no file-tag refers to
    pub fn unused(&self) -> DomainResult<Vec<Value>> {
        self.query_values(
            "SELECT id, name
             FROM value
             WHERE id NOT IN (SELECT DISTINCT value_id FROM file_tag)
             ORDER BY name",
            [],
        )
    }

    /// Delete the value if nothing refers to it. The sentinel is left alone.
    /// Returns whether a row was removed.
    pub fn delete_if_unused(&self, id: ValueId) -> DomainResult<bool> {
        if id == NO_VALUE {
            return Ok(false);
        }

        let count: u32 = self.conn.query_row(
            "SELECT COUNT(1) FROM file_tag WHERE value_id = ?",
            params![id],
            |row| row.get(0),
        )?;
        if count > 0 {
            return Ok(false);
        }

        let affected = self
            .conn
            .execute("DELETE FROM value WHERE id = ?", params![id])?;
        expect_at_most_one_row("delete value", affected)?;
        Ok(affected == 1)
    }

    /// Delete those of `ids` that nothing refers to; returns how many went.
    pub fn delete_unused(&self, ids: &[ValueId]) -> DomainResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "DELETE FROM value
             WHERE id IN ({})
             AND id NOT IN (SELECT DISTINCT value_id FROM file_tag)",
            repeat_vars(ids.len())
        );
        let affected = self.conn.execute(&sql, params_from_iter(ids))?;
        debug!("deleted {} unused value(s)", affected);
        Ok(affected)
    }

    fn query_values(&self, sql: &str, params: impl rusqlite::Params) -> DomainResult<Vec<Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;

        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            values.push(Value {
                id: row.get(0)?,
                name: row.get(1)?,
            });
        }
        Ok(values)
    }
}

impl Repository<Value> for ValueRepository<'_> {
    fn create(&self, entity: &Value) -> DomainResult<Value> {
        self.insert(&entity.name)
    }

    fn find_by_id(&self, id: ValueId) -> DomainResult<Option<Value>> {
        let values = self.query_values("SELECT id, name FROM value WHERE id = ?", params![id])?;
        Ok(values.into_iter().next())
    }

    fn list(&self) -> DomainResult<Vec<Value>> {
        self.query_values("SELECT id, name FROM value", [])
    }

    fn update(&self, entity: &Value) -> DomainResult<Value> {
        self.rename(entity.id, &entity.name)
    }

    /// Removes every file-tag carrying the value, then the value
    fn delete(&self, id: ValueId) -> DomainResult<()> {
        let file_tags = FileTagRepository::new(self.conn).delete_by_value(id)?;

        let affected = self
            .conn
            .execute("DELETE FROM value WHERE id = ?", params![id])?;
        expect_at_most_one_row("delete value", affected)?;

        debug!("deleted value #{} and {} file-tag(s)", id, file_tags);
        Ok(())
    }
}

impl NamedRepository<Value> for ValueRepository<'_> {
    fn count(&self) -> DomainResult<u32> {
        let count = self
            .conn
            .query_row("SELECT COUNT(1) FROM value", [], |row| row.get(0))?;
        Ok(count)
    }

    fn find_by_ids(&self, ids: &[ValueId]) -> DomainResult<Vec<Value>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, name FROM value WHERE id IN ({})",
            repeat_vars(ids.len())
        );
        self.query_values(&sql, params_from_iter(ids))
    }

    fn find_by_name(&self, name: &str) -> DomainResult<Option<Value>> {
        if name.is_empty() {
            return Ok(Some(Value::none()));
        }

        let values = self.query_values("SELECT id, name FROM value WHERE name = ?", params![name])?;
        Ok(values.into_iter().next())
    }

    /// The empty name contributes the sentinel, as with `find_by_name`.
    fn find_by_names(&self, names: &[&str]) -> DomainResult<Vec<Value>> {
        let (empty, named): (Vec<&str>, Vec<&str>) = names.iter().copied().partition(|n| n.is_empty());

        let mut values = Vec::new();
        if !empty.is_empty() {
            values.push(Value::none());
        }
        if named.is_empty() {
            return Ok(values);
        }

        let sql = format!(
            "SELECT id, name FROM value WHERE name IN ({})",
            repeat_vars(named.len())
        );
        values.extend(self.query_values(&sql, params_from_iter(named))?);
        Ok(values)
    }
}
