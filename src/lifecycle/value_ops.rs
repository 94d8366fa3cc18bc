//! Value Lifecycle Operations

use log::info;

use crate::domain::{DomainError, DomainResult, Value, ValueId, NO_VALUE};
use crate::repository::{Repository, Store, ValueRepository};

pub trait ValueLifecycleOperations {
    /// Rename a value that must exist
    fn rename_value(&mut self, value_id: ValueId, new_name: &str) -> DomainResult<Value>;

    /// Remove a value and every file-tag qualified by it
    fn delete_value(&mut self, value_id: ValueId) -> DomainResult<()>;
}

impl ValueLifecycleOperations for Store {
    fn rename_value(&mut self, value_id: ValueId, new_name: &str) -> DomainResult<Value> {
        if value_id == NO_VALUE {
            return Err(DomainError::NotFound("the empty value cannot be renamed".into()));
        }

        let tx = self.transaction()?;

        let values = ValueRepository::new(&tx);
        values
            .find_by_id(value_id)?
            .ok_or_else(|| DomainError::NotFound(format!("value #{}", value_id)))?;
        let value = values.rename(value_id, new_name)?;

        tx.commit()?;
        Ok(value)
    }

    fn delete_value(&mut self, value_id: ValueId) -> DomainResult<()> {
        let tx = self.transaction()?;
        ValueRepository::new(&tx).delete(value_id)?;
        tx.commit()?;

        info!("deleted value #{}", value_id);
        Ok(())
    }
}
