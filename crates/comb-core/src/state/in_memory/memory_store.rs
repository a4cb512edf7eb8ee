use crate::state::TransactableStorage;
use comb_core_storage::{
    column::Column,
    kv_store::{
        Key,
        KeyValueInspect,
        StorageColumn,
        Value,
        WriteOperation,
    },
    transactional::Changes,
    Error as StorageError,
    Result as StorageResult,
};
use parking_lot::{
    Mutex,
    RwLock,
};
use std::collections::BTreeMap;

/// The store keeps every column in memory. A commit holds the write lock for the
/// whole batch, so readers observe either none or all of its changes.
#[derive(Default, Debug)]
pub struct MemoryStore {
    inner: RwLock<[BTreeMap<Key, Value>; Column::COUNT]>,
    genesis_lock: Mutex<()>,
}

impl MemoryStore {
    /// Returns all entries of the column in key order.
    pub fn iter_all(&self, column: Column) -> Vec<(Key, Value)> {
        self.inner.read()[column.as_usize()]
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl KeyValueInspect for MemoryStore {
    type Column = Column;

    fn get(&self, key: &[u8], column: Column) -> StorageResult<Option<Value>> {
        Ok(self.inner.read()[column.as_usize()].get(key).cloned())
    }
}

impl TransactableStorage for MemoryStore {
    fn commit_changes(&self, changes: Changes) -> StorageResult<()> {
        let changes = changes
            .into_iter()
            .map(|(column, entries)| match usize::try_from(column) {
                Ok(index) if index < Column::COUNT => Ok((index, entries)),
                _ => Err(StorageError::Other(anyhow::anyhow!(
                    "the change set references unknown column {column}"
                ))),
            })
            .collect::<StorageResult<Vec<_>>>()?;

        let mut lock = self.inner.write();
        for (column, entries) in changes {
            for (key, operation) in entries {
                match operation {
                    WriteOperation::Insert(value) => {
                        lock[column].insert(key, value);
                    }
                    WriteOperation::Remove => {
                        lock[column].remove(&key);
                    }
                }
            }
        }
        Ok(())
    }

    fn genesis_lock(&self) -> &Mutex<()> {
        &self.genesis_lock
    }
}
