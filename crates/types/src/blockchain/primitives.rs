//! Primitive types

use crate::Bytes32;

/// The hash of a block header, the identity of the block.
pub type BlockId = Bytes32;

/// The result of a transaction, produced when the block is executed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Receipt {
    /// The hash of the transaction that produced the receipt.
    pub tx_hash: Bytes32,
    /// `true` if the transaction succeeded.
    pub success: bool,
    /// The gas used by the block up to and including this transaction.
    pub cumulative_gas_used: u64,
}

/// The receipts of all transactions of one block, in transaction order.
pub type Receipts = Vec<Receipt>;
