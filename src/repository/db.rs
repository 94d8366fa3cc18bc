//! Database Connection and Setup
//!
//! Manages the SQLite connection, its configuration and schema migrations.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, error};
use rusqlite::{Connection, Transaction};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};
use super::{FileTagRepository, ImplicationStore, TagRepository, ValueRepository};

/// Path that selects an in-memory database
pub const MEMORY_PATH: &str = ":memory:";

/// How to open the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file, or `:memory:`
    pub path: PathBuf,
    /// Reject statements that would leave dangling tag references
    pub enforce_foreign_keys: bool,
    /// How long to wait on a locked database before failing
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(MEMORY_PATH),
            enforce_foreign_keys: true,
            busy_timeout_ms: 5000,
        }
    }
}

impl StoreConfig {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    fn is_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY_PATH
    }
}

/// Owns the connection; repositories borrow it.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open (creating if necessary) and migrate the database described by `config`
    pub fn open(config: &StoreConfig) -> DomainResult<Self> {
        let conn = if config.is_memory() {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = config.path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent).map_err(|e| {
                        DomainError::Config(format!(
                            "could not create '{}': {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
            }
            Connection::open(&config.path)?
        };

        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        conn.execute_batch(if config.enforce_foreign_keys {
            "PRAGMA foreign_keys = ON;"
        } else {
            "PRAGMA foreign_keys = OFF;"
        })?;

        run_migrations(&conn)?;
        debug!("opened tag store at '{}'", config.path.display());

        Ok(Self { conn })
    }

    pub fn open_in_memory() -> DomainResult<Self> {
        Self::open(&StoreConfig::default())
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn tags(&self) -> TagRepository<'_> {
        TagRepository::new(&self.conn)
    }

    pub fn values(&self) -> ValueRepository<'_> {
        ValueRepository::new(&self.conn)
    }

    pub fn file_tags(&self) -> FileTagRepository<'_> {
        FileTagRepository::new(&self.conn)
    }

    pub fn implications(&self) -> ImplicationStore<'_> {
        ImplicationStore::new(&self.conn)
    }

    /// Begin a transaction; it rolls back on drop unless committed.
    pub(crate) fn transaction(&mut self) -> DomainResult<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}

/// Initialize database with path
pub fn init_db(db_path: &Path) -> DomainResult<Store> {
    if db_path.to_str().is_none() {
        return Err(DomainError::Config(format!(
            "invalid database path '{}'",
            db_path.display()
        )));
    }
    Store::open(&StoreConfig::at(db_path))
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS tag (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_tag_name ON tag(name);

        CREATE TABLE IF NOT EXISTS value (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_value_name ON value(name);

        CREATE TABLE IF NOT EXISTS file_tag (
            file_id INTEGER NOT NULL,
            tag_id INTEGER NOT NULL,
            value_id INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (file_id, tag_id, value_id),
            FOREIGN KEY (tag_id) REFERENCES tag(id)
        );
        CREATE INDEX IF NOT EXISTS idx_file_tag_file ON file_tag(file_id);
        CREATE INDEX IF NOT EXISTS idx_file_tag_tag ON file_tag(tag_id);
        CREATE INDEX IF NOT EXISTS idx_file_tag_value ON file_tag(value_id);

        CREATE TABLE IF NOT EXISTS implication (
            tag_id INTEGER NOT NULL,
            implied_tag_id INTEGER NOT NULL,
            FOREIGN KEY (tag_id) REFERENCES tag(id),
            FOREIGN KEY (implied_tag_id) REFERENCES tag(id)
        );
        CREATE INDEX IF NOT EXISTS idx_implication_tag ON implication(tag_id);
        CREATE INDEX IF NOT EXISTS idx_implication_implied ON implication(implied_tag_id);",
    )?;

    Ok(())
}

/// `?, ?, ?` for an `IN (...)` list of `count` parameters. `count` must be non-zero.
pub(crate) fn repeat_vars(count: usize) -> String {
    debug_assert!(count > 0);
    let mut s = "?, ".repeat(count);
    s.truncate(s.len() - 2);
    s
}

/// Id of the row just inserted, as a 32-bit entity id
pub(crate) fn inserted_id(conn: &Connection, entity: &'static str) -> DomainResult<u32> {
    let rowid = conn.last_insert_rowid();
    u32::try_from(rowid).map_err(|_| {
        error!("{} row id {} does not fit a 32-bit id", entity, rowid);
        DomainError::IdOutOfRange { entity, id: rowid }
    })
}

/// Single-row insert/update: anything but one affected row is a broken store.
pub(crate) fn expect_one_row(statement: &'static str, affected: usize) -> DomainResult<()> {
    if affected == 1 {
        return Ok(());
    }
    error!("{}: expected exactly one row to be affected, got {}", statement, affected);
    Err(DomainError::RowCount {
        statement,
        expected: "exactly one",
        affected,
    })
}

/// Delete by primary key: zero rows is fine, more than one is not.
pub(crate) fn expect_at_most_one_row(statement: &'static str, affected: usize) -> DomainResult<()> {
    if affected <= 1 {
        return Ok(());
    }
    error!("{}: expected at most one row to be affected, got {}", statement, affected);
    Err(DomainError::RowCount {
        statement,
        expected: "at most one",
        affected,
    })
}
