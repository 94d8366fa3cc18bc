//! Repository Layer
//!
//! Data access abstractions and their SQLite implementations. Repositories
//! borrow a connection, so the same code runs inside a transaction.

mod db;
mod file_tag_repo;
mod implication_repo;
mod traits;
mod value_repo;
pub mod tag;


pub use db::{init_db, Store, StoreConfig, MEMORY_PATH};
pub use file_tag_repo::FileTagRepository;
pub use implication_repo::ImplicationStore;
pub use tag::{TagRepository, TagUsageOperations};
pub use traits::{NamedRepository, Repository};
pub use value_repo::ValueRepository;
