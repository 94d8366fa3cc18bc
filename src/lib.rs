//! Tag store core
//!
//! Layered architecture:
//! - domain: entities and naming rules
//! - repository: SQLite access to tags, values, file-tags and implications
//! - lifecycle: transactional copy, rename, delete and merge

pub mod domain;
pub mod lifecycle;
pub mod repository;

pub use domain::{
    DomainError, DomainResult, FileId, FileTag, Implication, Implications, NameKind, Tag,
    TagFileCount, TagId, Value, ValueId, NO_VALUE,
};
pub use lifecycle::{MergeReport, MergeWarning, TagLifecycleOperations, ValueLifecycleOperations};
pub use repository::{init_db, Store, StoreConfig};
