//! The primitives to work with storage in transactional mode.

use crate::{
    column::Column,
    kv_store::{
        KeyValueInspect,
        KeyValueMutate,
        StorageColumn,
        Value,
        WriteOperation,
    },
    Result as StorageResult,
};
use std::collections::BTreeMap;

/// The pending changes of the transaction, grouped by the column id.
pub type Changes = BTreeMap<u32, BTreeMap<Vec<u8>, WriteOperation>>;

/// The storage that can apply a set of changes as one atomic batch:
/// either every change is visible afterwards or none of them.
pub trait Modifiable {
    /// Applies the changes to the storage.
    fn commit_changes(&mut self, changes: Changes) -> StorageResult<()>;
}

/// Creates the transaction on top of the storage.
pub trait IntoTransaction: Sized {
    /// Returns the transaction that buffers all writes until it is committed.
    fn into_transaction(self) -> StorageTransaction<Self>;
}

impl<S> IntoTransaction for S
where
    S: KeyValueInspect<Column = Column>,
{
    fn into_transaction(self) -> StorageTransaction<Self> {
        StorageTransaction::new(self)
    }
}

/// The storage transaction for the `Storage` type. Reads see the pending changes
/// first and fall through to the storage; nothing is written into the storage
/// before [`StorageTransaction::commit`].
#[derive(Debug)]
pub struct StorageTransaction<Storage> {
    storage: Storage,
    changes: Changes,
}

impl<Storage> StorageTransaction<Storage> {
    /// Create a new storage transaction.
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            changes: Default::default(),
        }
    }

    /// Returns the pending changes.
    pub fn changes(&self) -> &Changes {
        &self.changes
    }

    /// Drops the storage and returns the pending changes.
    pub fn into_changes(self) -> Changes {
        self.changes
    }

    /// Returns `true` if the transaction has no pending changes.
    pub fn is_empty(&self) -> bool {
        self.changes.values().all(BTreeMap::is_empty)
    }

    fn pending(&self, key: &[u8], column: Column) -> Option<&WriteOperation> {
        self.changes
            .get(&column.id())
            .and_then(|changes| changes.get(key))
    }
}

impl<Storage> StorageTransaction<Storage>
where
    Storage: Modifiable,
{
    /// Committing of the state consumes `Self` and returns the storage.
    pub fn commit(mut self) -> StorageResult<Storage> {
        let changes = core::mem::take(&mut self.changes);
        self.storage.commit_changes(changes)?;
        Ok(self.storage)
    }
}

impl<Storage> KeyValueInspect for StorageTransaction<Storage>
where
    Storage: KeyValueInspect<Column = Column>,
{
    type Column = Column;

    fn get(&self, key: &[u8], column: Self::Column) -> StorageResult<Option<Value>> {
        match self.pending(key, column) {
            Some(WriteOperation::Insert(value)) => Ok(Some(value.clone())),
            Some(WriteOperation::Remove) => Ok(None),
            None => self.storage.get(key, column),
        }
    }
}

impl<Storage> KeyValueMutate for StorageTransaction<Storage>
where
    Storage: KeyValueInspect<Column = Column>,
{
    fn put(
        &mut self,
        key: &[u8],
        column: Self::Column,
        value: Value,
    ) -> StorageResult<()> {
        self.changes
            .entry(column.id())
            .or_default()
            .insert(key.to_vec(), WriteOperation::Insert(value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8], column: Self::Column) -> StorageResult<()> {
        self.changes
            .entry(column.id())
            .or_default()
            .insert(key.to_vec(), WriteOperation::Remove);
        Ok(())
    }
}

#[cfg(feature = "test-helpers")]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        structured_storage::{
            StorageAsMut,
            StorageAsRef,
        },
        tables::CanonicalHashes,
        test_helpers::InMemoryStorage,
    };
    use comb_core_types::{
        BlockHeight,
        Bytes32,
    };

    #[test]
    fn reads_see_pending_writes_before_commit() {
        let storage = InMemoryStorage::default();
        let mut tx = (&storage).into_transaction();
        let hash = Bytes32::from([7; 32]);

        tx.storage_as_mut::<CanonicalHashes>()
            .insert(&BlockHeight::GENESIS, &hash)
            .unwrap();

        assert_eq!(
            tx.storage::<CanonicalHashes>()
                .get(&BlockHeight::GENESIS)
                .unwrap(),
            Some(hash)
        );
        assert_eq!(
            storage
                .storage::<CanonicalHashes>()
                .get(&BlockHeight::GENESIS)
                .unwrap(),
            None
        );
    }

    #[test]
    fn commit_applies_all_changes() {
        let storage = InMemoryStorage::default();
        let mut tx = storage.clone().into_transaction();
        for height in 0..3u64 {
            tx.storage_as_mut::<CanonicalHashes>()
                .insert(&BlockHeight::new(height), &Bytes32::from([u8::try_from(height).unwrap(); 32]))
                .unwrap();
        }
        tx.commit().unwrap();

        for height in 0..3u64 {
            assert_eq!(
                storage
                    .storage::<CanonicalHashes>()
                    .get(&BlockHeight::new(height))
                    .unwrap(),
                Some(Bytes32::from([u8::try_from(height).unwrap(); 32]))
            );
        }
    }

    #[test]
    fn removal_hides_committed_value() {
        let storage = InMemoryStorage::default();
        let mut tx = storage.clone().into_transaction();
        tx.storage_as_mut::<CanonicalHashes>()
            .insert(&BlockHeight::GENESIS, &Bytes32::zeroed())
            .unwrap();
        tx.commit().unwrap();

        let mut tx = storage.clone().into_transaction();
        tx.storage_as_mut::<CanonicalHashes>()
            .remove(&BlockHeight::GENESIS)
            .unwrap();
        assert!(!tx
            .storage::<CanonicalHashes>()
            .contains_key(&BlockHeight::GENESIS)
            .unwrap());
        assert!(storage
            .storage::<CanonicalHashes>()
            .contains_key(&BlockHeight::GENESIS)
            .unwrap());
    }
}
