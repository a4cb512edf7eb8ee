//! Typed access to the key-value store through [`Table`] definitions.

use crate::{
    codec::{
        Decode,
        Encode,
        Encoder,
    },
    column::Column,
    kv_store::{
        KeyValueInspect,
        KeyValueMutate,
    },
    tables::Table,
    Error as StorageError,
    Result as StorageResult,
};
use core::marker::PhantomData;

/// Read-only view of one table.
pub struct StorageRef<'a, S: ?Sized, T> {
    storage: &'a S,
    _table: PhantomData<T>,
}

/// Mutable view of one table.
pub struct StorageMut<'a, S: ?Sized, T> {
    storage: &'a mut S,
    _table: PhantomData<T>,
}

/// Gives read access to the tables of the storage.
pub trait StorageAsRef {
    /// Returns the view of the table `T`.
    fn storage<T: Table>(&self) -> StorageRef<'_, Self, T> {
        StorageRef {
            storage: self,
            _table: PhantomData,
        }
    }
}

/// Gives write access to the tables of the storage.
pub trait StorageAsMut {
    /// Returns the mutable view of the table `T`.
    fn storage_as_mut<T: Table>(&mut self) -> StorageMut<'_, Self, T> {
        StorageMut {
            storage: self,
            _table: PhantomData,
        }
    }
}

impl<S> StorageAsRef for S where S: KeyValueInspect<Column = Column> + ?Sized {}
impl<S> StorageAsMut for S where S: KeyValueMutate<Column = Column> + ?Sized {}

fn get<S, T>(storage: &S, key: &T::Key) -> StorageResult<Option<T::Value>>
where
    S: KeyValueInspect<Column = Column> + ?Sized,
    T: Table,
{
    let key = <T::KeyCodec as Encode<T::Key>>::encode(key);
    storage
        .get(key.as_bytes().as_ref(), T::column())?
        .map(|value| {
            <T::ValueCodec as Decode<T::Value>>::decode_from_value(value)
                .map_err(StorageError::Codec)
        })
        .transpose()
}

fn contains_key<S, T>(storage: &S, key: &T::Key) -> StorageResult<bool>
where
    S: KeyValueInspect<Column = Column> + ?Sized,
    T: Table,
{
    let key = <T::KeyCodec as Encode<T::Key>>::encode(key);
    storage.exists(key.as_bytes().as_ref(), T::column())
}

impl<'a, S, T> StorageRef<'a, S, T>
where
    S: KeyValueInspect<Column = Column> + ?Sized,
    T: Table,
{
    /// Returns the value by the key.
    pub fn get(&self, key: &T::Key) -> StorageResult<Option<T::Value>> {
        get::<S, T>(self.storage, key)
    }

    /// Returns `true` if the table has the entry.
    pub fn contains_key(&self, key: &T::Key) -> StorageResult<bool> {
        contains_key::<S, T>(self.storage, key)
    }
}

impl<'a, S, T> StorageMut<'a, S, T>
where
    S: KeyValueMutate<Column = Column> + ?Sized,
    T: Table,
{
    /// Returns the value by the key.
    pub fn get(&self, key: &T::Key) -> StorageResult<Option<T::Value>> {
        get::<S, T>(self.storage, key)
    }

    /// Returns `true` if the table has the entry.
    pub fn contains_key(&self, key: &T::Key) -> StorageResult<bool> {
        contains_key::<S, T>(self.storage, key)
    }

    /// Inserts the entry and returns `true` if it replaced an existing one.
    pub fn insert(&mut self, key: &T::Key, value: &T::Value) -> StorageResult<bool> {
        let key = <T::KeyCodec as Encode<T::Key>>::encode(key);
        let value = <T::ValueCodec as Encode<T::Value>>::encode_as_value(value);
        let previous = self
            .storage
            .replace(key.as_bytes().as_ref(), T::column(), value)?;
        Ok(previous.is_some())
    }

    /// Removes the entry.
    pub fn remove(&mut self, key: &T::Key) -> StorageResult<()> {
        let key = <T::KeyCodec as Encode<T::Key>>::encode(key);
        self.storage.delete(key.as_bytes().as_ref(), T::column())
    }
}
