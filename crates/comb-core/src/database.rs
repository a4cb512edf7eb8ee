use crate::state::{
    in_memory::memory_store::MemoryStore,
    DataSource,
};
use comb_core_storage::{
    column::Column,
    kv_store::{
        KeyValueInspect,
        Value,
    },
    transactional::{
        Changes,
        IntoTransaction,
        Modifiable,
        StorageTransaction,
    },
    Result as StorageResult,
};
use parking_lot::MutexGuard;
use std::sync::Arc;

pub mod block;
pub mod metadata;
pub mod state;

pub use metadata::{
    ChainConfigs,
    Metadata,
    MetadataKey,
};

/// The writes buffered on top of the [`Database`] until they are committed.
pub type DatabaseTransaction = StorageTransaction<Database>;

/// The chain database. Clones share the same data source.
#[derive(Clone, Debug)]
pub struct Database {
    data: DataSource,
}

impl Database {
    pub fn new(data_source: DataSource) -> Self {
        Self { data: data_source }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    /// Starts a transaction; nothing is visible to other readers before
    /// [`StorageTransaction::commit`].
    pub fn transaction(&self) -> DatabaseTransaction {
        self.clone().into_transaction()
    }

    /// Serializes genesis setup between every handle over the same data source.
    pub(crate) fn lock_genesis(&self) -> MutexGuard<'_, ()> {
        self.data.genesis_lock().lock()
    }
}

impl KeyValueInspect for Database {
    type Column = Column;

    fn get(&self, key: &[u8], column: Column) -> StorageResult<Option<Value>> {
        self.data.get(key, column)
    }
}

impl Modifiable for Database {
    fn commit_changes(&mut self, changes: Changes) -> StorageResult<()> {
        self.data.commit_changes(changes)
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comb_core_storage::{
        structured_storage::{
            StorageAsMut,
            StorageAsRef,
        },
        tables::CanonicalHashes,
    };
    use comb_core_types::{
        BlockHeight,
        Bytes32,
    };

    #[test]
    fn transaction_is_invisible_until_committed() {
        let database = Database::in_memory();
        let mut transaction = database.transaction();
        transaction
            .storage_as_mut::<CanonicalHashes>()
            .insert(&BlockHeight::GENESIS, &Bytes32::from([1; 32]))
            .unwrap();

        assert_eq!(database.canonical_hash(BlockHeight::GENESIS).unwrap(), None);
        transaction.commit().unwrap();
        assert_eq!(
            database
                .storage::<CanonicalHashes>()
                .get(&BlockHeight::GENESIS)
                .unwrap(),
            Some(Bytes32::from([1; 32]))
        );
    }

    #[test]
    fn clones_share_data() {
        let database = Database::in_memory();
        let clone = database.clone();
        let mut transaction = clone.transaction();
        transaction
            .storage_as_mut::<CanonicalHashes>()
            .insert(&BlockHeight::GENESIS, &Bytes32::from([2; 32]))
            .unwrap();
        transaction.commit().unwrap();
        assert!(database.canonical_hash(BlockHeight::GENESIS).unwrap().is_some());
    }
}
