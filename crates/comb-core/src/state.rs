use comb_core_storage::{
    column::Column,
    kv_store::KeyValueInspect,
    transactional::Changes,
    Result as StorageResult,
};
use parking_lot::Mutex;
use std::{
    fmt::Debug,
    sync::Arc,
};

pub mod in_memory;

/// A key-value store that applies a whole set of changes atomically.
pub trait TransactableStorage:
    KeyValueInspect<Column = Column> + Debug + Send + Sync
{
    /// Applies all changes or none of them.
    fn commit_changes(&self, changes: Changes) -> StorageResult<()>;

    /// The lock serializing genesis setup. Every handle over this store shares it.
    fn genesis_lock(&self) -> &Mutex<()>;
}

pub type DataSource = Arc<dyn TransactableStorage>;
