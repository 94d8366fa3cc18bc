//! Tag Entity
//!
//! Tags are attached to files for classification and queried by name.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

pub type TagId = u32;

/// A named tag. The id is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier
    pub id: TagId,
    /// Tag name, unique among tags
    pub name: String,
}

impl Tag {
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Entity for Tag {
    type Id = TagId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Number of distinct files carrying a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFileCount {
    pub id: TagId,
    pub name: String,
    pub file_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_creation() {
        let tag = Tag::new(1, "cheese");
        assert_eq!(tag.id(), 1);
        assert_eq!(tag.name, "cheese");
    }

    #[test]
    fn test_tag_serialization_shape() {
        let json = serde_json::to_value(Tag::new(7, "wine")).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 7, "name": "wine" }));
    }
}
