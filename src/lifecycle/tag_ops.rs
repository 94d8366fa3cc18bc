//! Tag Lifecycle Operations
//!
//! Multi-statement tag operations. Each runs in one transaction: a failing
//! step rolls back everything the operation did.

use log::info;
use rusqlite::Connection;

use crate::domain::{DomainError, DomainResult, Tag, TagId};
use crate::repository::{FileTagRepository, ImplicationStore, Repository, Store, TagRepository};
use super::merge::{merge_within, MergeReport};

pub trait TagLifecycleOperations {
    /// Create `new_name` carrying the same files (and values) as `source_tag_id`
    fn copy_tag(&mut self, source_tag_id: TagId, new_name: &str) -> DomainResult<Tag>;

    /// Rename a tag that must exist
    fn rename_tag(&mut self, tag_id: TagId, new_name: &str) -> DomainResult<Tag>;

    /// Remove a tag with its implications and file-tags. Deleting a tag that
    /// does not exist is not an error.
    fn delete_tag(&mut self, tag_id: TagId) -> DomainResult<()>;

    /// Fold each of `source_names` into `dest_name`; see [`MergeReport`]
    fn merge_tags(&mut self, source_names: &[&str], dest_name: &str) -> DomainResult<MergeReport>;
}

impl TagLifecycleOperations for Store {
    fn copy_tag(&mut self, source_tag_id: TagId, new_name: &str) -> DomainResult<Tag> {
        let tx = self.transaction()?;

        let tags = TagRepository::new(&tx);
        if tags.find_by_id(source_tag_id)?.is_none() {
            return Err(DomainError::NotFound(format!("tag #{}", source_tag_id)));
        }

        let tag = tags.insert(new_name)?;
        let copied = FileTagRepository::new(&tx).copy(source_tag_id, tag.id)?;

        tx.commit()?;
        info!("copied tag #{} to '{}' ({} file-tag(s))", source_tag_id, tag.name, copied);
        Ok(tag)
    }

    fn rename_tag(&mut self, tag_id: TagId, new_name: &str) -> DomainResult<Tag> {
        let tx = self.transaction()?;

        let tags = TagRepository::new(&tx);
        let existing = tags
            .find_by_id(tag_id)?
            .ok_or_else(|| DomainError::NotFound(format!("tag #{}", tag_id)))?;
        let tag = tags.rename(tag_id, new_name)?;

        tx.commit()?;
        info!("renamed tag '{}' to '{}'", existing.name, tag.name);
        Ok(tag)
    }

    fn delete_tag(&mut self, tag_id: TagId) -> DomainResult<()> {
        let tx = self.transaction()?;
        retire_tag(&tx, tag_id)?;
        tx.commit()?;
        Ok(())
    }

    fn merge_tags(&mut self, source_names: &[&str], dest_name: &str) -> DomainResult<MergeReport> {
        let tx = self.transaction()?;
        let report = merge_within(&tx, source_names, dest_name)?;
        tx.commit()?;
        Ok(report)
    }
}

/// Implications first, then the tag with its file-tags, so nothing is left
/// pointing at the tag.
fn retire_tag(conn: &Connection, tag_id: TagId) -> DomainResult<()> {
    let implications = ImplicationStore::new(conn).remove_for_tag(tag_id)?;
    TagRepository::new(conn).delete(tag_id)?;

    info!("deleted tag #{} and {} implication(s)", tag_id, implications);
    Ok(())
}
