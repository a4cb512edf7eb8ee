//! Block types

use super::{
    header::BlockHeader,
    primitives::BlockId,
};
use crate::merkle::MerkleRootCalculator;

/// A block: the header and the raw encoded transactions it commits to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    header: BlockHeader,
    transactions: Vec<Vec<u8>>,
}

impl Block {
    /// Creates the block and sets the transactions root of the header.
    pub fn new(mut header: BlockHeader, transactions: Vec<Vec<u8>>) -> Self {
        header.transactions_root =
            MerkleRootCalculator::root_from_iterator(transactions.iter());
        Self {
            header,
            transactions,
        }
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn transactions(&self) -> &[Vec<u8>] {
        &self.transactions
    }

    /// The hash of the header.
    pub fn id(&self) -> BlockId {
        self.header.hash()
    }
}
