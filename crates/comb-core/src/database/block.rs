use crate::database::Database;
use comb_core_storage::{
    structured_storage::StorageAsRef,
    tables::{
        BlockNumbers,
        Blocks,
        CanonicalHashes,
        Receipts,
        TotalDifficulty,
    },
    Result as StorageResult,
};
use comb_core_types::{
    blockchain::{
        block::Block,
        primitives::{
            BlockId,
            Receipts as BlockReceipts,
        },
    },
    BlockHeight,
    U256,
};

impl Database {
    pub fn canonical_hash(&self, height: BlockHeight) -> StorageResult<Option<BlockId>> {
        self.storage::<CanonicalHashes>().get(&height)
    }

    pub fn block(&self, hash: &BlockId) -> StorageResult<Option<Block>> {
        self.storage::<Blocks>().get(hash)
    }

    pub fn block_number(&self, hash: &BlockId) -> StorageResult<Option<BlockHeight>> {
        self.storage::<BlockNumbers>().get(hash)
    }

    pub fn total_difficulty(&self, hash: &BlockId) -> StorageResult<Option<U256>> {
        self.storage::<TotalDifficulty>().get(hash)
    }

    pub fn receipts(&self, hash: &BlockId) -> StorageResult<Option<BlockReceipts>> {
        self.storage::<Receipts>().get(hash)
    }

    /// The number of the current head header, if the head and its number are known.
    pub fn head_number(&self) -> StorageResult<Option<BlockHeight>> {
        match self.head_header_hash()? {
            Some(hash) => self.block_number(&hash),
            None => Ok(None),
        }
    }
}
