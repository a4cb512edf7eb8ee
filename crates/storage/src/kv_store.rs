//! Raw byte-level access to the chain store, one keyspace per [`StorageColumn`].

use crate::Result as StorageResult;
use std::sync::Arc;

/// A raw key inside a column.
pub type Key = Vec<u8>;
/// A raw value. Shared so reads out of the store and out of pending changes don't copy.
pub type Value = Arc<Vec<u8>>;

/// A keyspace of the store.
pub trait StorageColumn: Copy + core::fmt::Debug {
    /// The stable name of the column.
    fn name(&self) -> &'static str;

    /// The dense id of the column, starting at zero.
    fn id(&self) -> u32;

    /// The id as an index into per-column arrays.
    fn as_usize(&self) -> usize {
        usize::try_from(self.id()).unwrap_or(usize::MAX)
    }
}

/// Reading raw values out of the store.
#[impl_tools::autoimpl(for<T: trait> &T, &mut T, Box<T>)]
pub trait KeyValueInspect {
    /// The column type of the store.
    type Column: StorageColumn;

    /// Returns the value under `key`, if any.
    fn get(&self, key: &[u8], column: Self::Column) -> StorageResult<Option<Value>>;

    /// Checks whether `key` holds a value.
    fn exists(&self, key: &[u8], column: Self::Column) -> StorageResult<bool> {
        Ok(self.get(key, column)?.is_some())
    }
}

/// Writing raw values into the store.
#[impl_tools::autoimpl(for<T: trait> &mut T, Box<T>)]
pub trait KeyValueMutate: KeyValueInspect {
    /// Stores `value` under `key`.
    fn put(
        &mut self,
        key: &[u8],
        column: Self::Column,
        value: Value,
    ) -> StorageResult<()>;

    /// Stores `value` and hands back whatever was there before.
    fn replace(
        &mut self,
        key: &[u8],
        column: Self::Column,
        value: Value,
    ) -> StorageResult<Option<Value>> {
        let previous = self.get(key, column)?;
        self.put(key, column, value)?;
        Ok(previous)
    }

    /// Removes `key` from the column.
    fn delete(&mut self, key: &[u8], column: Self::Column) -> StorageResult<()>;
}

/// A pending change to a single key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOperation {
    /// Set the key to the value.
    Insert(Value),
    /// Drop the key.
    Remove,
}
