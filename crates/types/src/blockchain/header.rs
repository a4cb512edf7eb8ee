//! Block header types

use super::primitives::BlockId;
use crate::{
    crypto::Hasher,
    merkle,
    Address,
    BlockHeight,
    Bytes32,
    U256,
};

/// The header of a block. Everything that identifies a block is committed to by
/// [`BlockHeader::hash`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockHeader {
    pub parent_hash: Bytes32,
    pub coinbase: Address,
    pub state_root: Bytes32,
    pub transactions_root: Bytes32,
    pub receipts_root: Bytes32,
    pub difficulty: U256,
    pub number: BlockHeight,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: Vec<u8>,
    pub mix_hash: Bytes32,
    pub nonce: u64,
}

impl Default for BlockHeader {
    fn default() -> Self {
        Self {
            parent_hash: Bytes32::zeroed(),
            coinbase: Address::zeroed(),
            state_root: merkle::empty_root(),
            transactions_root: merkle::empty_root(),
            receipts_root: merkle::empty_root(),
            difficulty: U256::zero(),
            number: BlockHeight::GENESIS,
            gas_limit: 0,
            gas_used: 0,
            timestamp: 0,
            extra_data: vec![],
            mix_hash: Bytes32::zeroed(),
            nonce: 0,
        }
    }
}

impl BlockHeader {
    /// Hash of the header. The fields are hashed in declaration order, integers
    /// big-endian, the difficulty as a 32-byte word and the extra data prefixed
    /// with its length.
    pub fn hash(&self) -> BlockId {
        let mut difficulty = [0u8; 32];
        self.difficulty.to_big_endian(&mut difficulty);
        let extra_len = u64::try_from(self.extra_data.len()).unwrap_or(u64::MAX);

        Hasher::default()
            .chain(self.parent_hash)
            .chain(self.coinbase)
            .chain(self.state_root)
            .chain(self.transactions_root)
            .chain(self.receipts_root)
            .chain(difficulty)
            .chain(self.number.to_be_bytes())
            .chain(self.gas_limit.to_be_bytes())
            .chain(self.gas_used.to_be_bytes())
            .chain(self.timestamp.to_be_bytes())
            .chain(extra_len.to_be_bytes())
            .chain(&self.extra_data)
            .chain(self.mix_hash)
            .chain(self.nonce.to_be_bytes())
            .finalize()
    }
}
