//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all domain entities.
//! All entities must have a unique ID and be thread-safe.

use thiserror::Error;

use super::name::NameKind;

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Copy + Eq + std::hash::Hash + Send + Sync;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Error)]
pub enum DomainError {
    /// A tag or value name collides with the query grammar or the VFS.
    #[error("invalid {kind} name: {reason}")]
    InvalidName { kind: NameKind, reason: String },

    /// An operation required an entity that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Failure reported by SQLite, passed through unchanged.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A statement touched a different number of rows than its key allows.
    /// The store or its schema is broken; never swallow this.
    #[error("{statement}: expected {expected} row(s) to be affected, got {affected}")]
    RowCount {
        statement: &'static str,
        expected: &'static str,
        affected: usize,
    },

    /// The entity is still referenced and cannot be removed as asked.
    #[error("conflict: {0}")]
    Conflict(String),

    /// SQLite handed out a row id wider than the 32-bit entity ids.
    #[error("{entity} row id {id} is out of range")]
    IdOutOfRange { entity: &'static str, id: i64 },

    #[error("configuration error: {0}")]
    Config(String),
}

impl DomainError {
    /// True for errors that indicate a defect in the store rather than bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::RowCount { .. })
    }
}
