//! The module to help with tests.

use crate::{
    column::Column,
    kv_store::{
        KeyValueInspect,
        StorageColumn,
        Value,
        WriteOperation,
    },
    transactional::{
        Changes,
        Modifiable,
    },
    Result,
};
use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        Mutex,
    },
};

/// The in-memory storage shared between its clones.
#[derive(Default, Clone, Debug)]
pub struct InMemoryStorage {
    inner: Arc<Mutex<BTreeMap<(u32, Vec<u8>), Value>>>,
}

impl KeyValueInspect for InMemoryStorage {
    type Column = Column;

    fn get(&self, key: &[u8], column: Self::Column) -> Result<Option<Value>> {
        Ok(self
            .inner
            .lock()
            .expect("poisoned")
            .get(&(column.id(), key.to_vec()))
            .cloned())
    }
}

impl Modifiable for InMemoryStorage {
    fn commit_changes(&mut self, changes: Changes) -> Result<()> {
        let mut lock = self.inner.lock().expect("poisoned");
        for (column, entries) in changes {
            for (key, operation) in entries {
                match operation {
                    WriteOperation::Insert(value) => {
                        lock.insert((column, key), value);
                    }
                    WriteOperation::Remove => {
                        lock.remove(&(column, key));
                    }
                }
            }
        }
        Ok(())
    }
}
