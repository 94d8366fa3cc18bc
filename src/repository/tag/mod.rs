//! Tag Repository Module
//!
//! Tag repository functionality split into specialized sub-modules:
//! - tag_repo: Core CRUD operations, lookups by id and name
//! - tag_usage: File counts per tag

mod tag_repo;
mod tag_usage;

pub use tag_repo::TagRepository;
pub use tag_usage::TagUsageOperations;
