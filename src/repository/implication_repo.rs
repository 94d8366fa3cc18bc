//! Implication Store
//!
//! Directed edges between tags (`implication` table) and the closure
//! resolver used at query time. Edges are tag-id pairs; cycles are allowed.

use std::collections::HashSet;

use log::debug;
use rusqlite::{params, params_from_iter, Connection};

use crate::domain::{DomainError, DomainResult, Implication, Implications, Tag, TagId};
use super::db::{expect_one_row, repeat_vars};

const SELECT_IMPLICATIONS: &str = "SELECT t1.id, t1.name, t2.id, t2.name
     FROM implication i
     INNER JOIN tag t1 ON t1.id = i.tag_id
     INNER JOIN tag t2 ON t2.id = i.implied_tag_id";

/// Which way to walk an edge while resolving a closure
#[derive(Debug, Clone, Copy)]
enum Direction {
    /// implying -> implied
    Forward,
    /// implied -> implying
    Reverse,
}

impl Direction {
    fn seed_column(self) -> &'static str {
        match self {
            Direction::Forward => "i.tag_id",
            Direction::Reverse => "i.implied_tag_id",
        }
    }

    fn next_tag(self, implication: &Implication) -> TagId {
        match self {
            Direction::Forward => implication.implied_tag.id,
            Direction::Reverse => implication.implying_tag.id,
        }
    }
}

pub struct ImplicationStore<'c> {
    conn: &'c Connection,
}

impl<'c> ImplicationStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Every implication in the store
    pub fn all(&self) -> DomainResult<Implications> {
        let sql = format!("{} ORDER BY t1.name, t2.name", SELECT_IMPLICATIONS);
        self.query_implications(&sql, [])
    }

    /// Every edge reachable from `tag_ids`, each exactly once.
    ///
    /// Walks outwards a frontier at a time. An edge already collected (by its
    /// tag-id pair, so duplicate rows count once) contributes nothing to the
    /// next frontier, which is what stops the walk on cycles.
    pub fn for_tags(&self, tag_ids: &[TagId]) -> DomainResult<Implications> {
        self.closure(tag_ids, Direction::Forward)
    }

    /// Every edge from which one of `tag_ids` is reachable: the tags that,
    /// directly or through other tags, imply them.
    pub fn implying(&self, tag_ids: &[TagId]) -> DomainResult<Implications> {
        self.closure(tag_ids, Direction::Reverse)
    }

    /// Add the implication `tag_id -> implied_tag_id`
    pub fn add(&self, tag_id: TagId, implied_tag_id: TagId) -> DomainResult<()> {
        let affected = self.conn.execute(
            "INSERT INTO implication (tag_id, implied_tag_id) VALUES (?, ?)",
            params![tag_id, implied_tag_id],
        )?;
        expect_one_row("insert implication", affected)?;

        debug!("added implication #{} -> #{}", tag_id, implied_tag_id);
        Ok(())
    }

    /// Re-point every edge touching `tag_id`, on either end, at `new_tag_id`.
    /// Edges that would become self-implications on `new_tag_id` are dropped;
    /// self-implications it already had are kept.
    pub fn update_for_tag(&self, tag_id: TagId, new_tag_id: TagId) -> DomainResult<()> {
        if tag_id == new_tag_id {
            return Ok(());
        }

        let dropped = self.conn.execute(
            "DELETE FROM implication
             WHERE (tag_id = ?1 AND implied_tag_id IN (?1, ?2))
                OR (tag_id = ?2 AND implied_tag_id = ?1)",
            params![tag_id, new_tag_id],
        )?;
        let implying = self.conn.execute(
            "UPDATE implication SET tag_id = ?2 WHERE tag_id = ?1",
            params![tag_id, new_tag_id],
        )?;
        let implied = self.conn.execute(
            "UPDATE implication SET implied_tag_id = ?2 WHERE implied_tag_id = ?1",
            params![tag_id, new_tag_id],
        )?;

        debug!(
            "moved implications of #{} to #{}: {} implying, {} implied, {} would-be self-implication(s) dropped",
            tag_id, new_tag_id, implying, implied, dropped
        );
        Ok(())
    }

    /// Remove the implication `tag_id -> implied_tag_id`, including duplicates of it
    pub fn remove(&self, tag_id: TagId, implied_tag_id: TagId) -> DomainResult<()> {
        let affected = self.conn.execute(
            "DELETE FROM implication WHERE tag_id = ? AND implied_tag_id = ?",
            params![tag_id, implied_tag_id],
        )?;
        if affected == 0 {
            return Err(DomainError::NotFound(format!(
                "implication #{} -> #{}",
                tag_id, implied_tag_id
            )));
        }
        Ok(())
    }

    /// Remove every implication with `tag_id` on either end
    pub fn remove_for_tag(&self, tag_id: TagId) -> DomainResult<usize> {
        let affected = self.conn.execute(
            "DELETE FROM implication WHERE tag_id = ?1 OR implied_tag_id = ?1",
            params![tag_id],
        )?;
        Ok(affected)
    }

    fn closure(&self, tag_ids: &[TagId], direction: Direction) -> DomainResult<Implications> {
        let mut resolved = Implications::new();
        let mut seen: HashSet<(TagId, TagId)> = HashSet::new();
        let mut frontier: Vec<TagId> = tag_ids.to_vec();

        while !frontier.is_empty() {
            let direct = self.direct(&frontier, direction)?;

            frontier = Vec::new();
            for implication in direct {
                if seen.insert(implication.key()) {
                    frontier.push(direction.next_tag(&implication));
                    resolved.0.push(implication);
                }
            }
        }

        Ok(resolved)
    }

    /// Edges with one of `tag_ids` on the seed side of `direction`
    fn direct(&self, tag_ids: &[TagId], direction: Direction) -> DomainResult<Implications> {
        let mut ids = tag_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let sql = format!(
            "{} WHERE {} IN ({}) ORDER BY t1.name, t2.name",
            SELECT_IMPLICATIONS,
            direction.seed_column(),
            repeat_vars(ids.len())
        );
        self.query_implications(&sql, params_from_iter(ids))
    }

    fn query_implications(&self, sql: &str, params: impl rusqlite::Params) -> DomainResult<Implications> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;

        let mut implications = Implications::new();
        while let Some(row) = rows.next()? {
            implications.0.push(Implication::new(
                Tag::new(row.get(0)?, row.get::<_, String>(1)?),
                Tag::new(row.get(2)?, row.get::<_, String>(3)?),
            ));
        }
        Ok(implications)
    }
}
