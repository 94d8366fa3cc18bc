//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations borrow a SQLite connection (or an open transaction).

use crate::domain::{DomainResult, Entity};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type. Lookups that find nothing return `None`
/// rather than an error.
pub trait Repository<T: Entity> {
    /// Create a new entity; the id of `entity` is ignored and assigned by the store
    fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities
    fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity
    fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID, together with the file-tags referencing it
    fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// Extension for entities identified by a unique name
pub trait NamedRepository<T: Entity>: Repository<T> {
    /// Number of stored entities
    fn count(&self) -> DomainResult<u32>;

    /// Entities matching any of `ids`; an empty slice yields an empty result
    fn find_by_ids(&self, ids: &[T::Id]) -> DomainResult<Vec<T>>;

    fn find_by_name(&self, name: &str) -> DomainResult<Option<T>>;

    /// Entities matching any of `names`; an empty slice yields an empty result
    fn find_by_names(&self, names: &[&str]) -> DomainResult<Vec<T>>;
}
