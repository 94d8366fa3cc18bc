//! Domain Layer
//!
//! Contains all domain entities, the naming rules and core abstractions.
//! This layer never touches the database.

mod entity;
mod file_tag;
mod implication;
mod name;
mod tag;
mod value;

pub use entity::{DomainError, DomainResult, Entity};
pub use file_tag::{FileId, FileTag};
pub use implication::{Implication, Implications};
pub use name::{validate, validate_tag_name, validate_value_name, NameKind};
pub use tag::{Tag, TagFileCount, TagId};
pub use value::{Value, ValueId, NO_VALUE};
