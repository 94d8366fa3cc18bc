//! Value Entity
//!
//! A value qualifies a file-tag (`year=2024`). Id 0 stands for "no value"
//! and is never stored.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

pub type ValueId = u32;

/// The "no value" id carried by unqualified file-tags
pub const NO_VALUE: ValueId = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub id: ValueId,
    pub name: String,
}

impl Value {
    pub fn new(id: ValueId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// The sentinel `{0, ""}`
    pub fn none() -> Self {
        Self::new(NO_VALUE, "")
    }

    pub fn is_none(&self) -> bool {
        self.id == NO_VALUE
    }
}

impl Entity for Value {
    type Id = ValueId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel() {
        let none = Value::none();
        assert!(none.is_none());
        assert_eq!(none.name, "");
        assert!(!Value::new(3, "2024").is_none());
    }
}
