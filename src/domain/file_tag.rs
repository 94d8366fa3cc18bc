//! File-Tag Association
//!
//! Records that a file carries a tag, optionally qualified by a value
//! (`value_id` 0 when unqualified).
//! Files themselves belong to another subsystem; only their ids appear here.

use serde::{Deserialize, Serialize};
use super::{TagId, ValueId};

pub type FileId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileTag {
    pub file_id: FileId,
    pub tag_id: TagId,
    pub value_id: ValueId,
}

impl FileTag {
    pub fn new(file_id: FileId, tag_id: TagId, value_id: ValueId) -> Self {
        Self { file_id, tag_id, value_id }
    }
}
