//! Account state

use crate::{
    crypto::Hasher,
    merkle,
    Bytes32,
    U256,
};

/// The persisted state of one account. Code and storage live in their own tables
/// and are referenced by hash and root.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Account {
    pub balance: U256,
    pub nonce: u64,
    pub code_hash: Bytes32,
    pub storage_root: Bytes32,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            balance: U256::zero(),
            nonce: 0,
            code_hash: empty_code_hash(),
            storage_root: merkle::empty_root(),
        }
    }
}

/// The hash of the empty contract code.
pub fn empty_code_hash() -> Bytes32 {
    Hasher::hash(b"")
}
