//! The module defines the `Column` used by the `comb-core` database.

use crate::kv_store::StorageColumn;

/// Database tables column ids to the corresponding [`crate::tables::Table`].
#[repr(u32)]
#[derive(
    Copy,
    Clone,
    Debug,
    strum_macros::EnumCount,
    strum_macros::IntoStaticStr,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    enum_iterator::Sequence,
    Hash,
)]
pub enum Column {
    /// The column id of metadata about the blockchain: head pointers and the database version.
    Metadata = 0,
    /// See [`CanonicalHashes`](crate::tables::CanonicalHashes)
    CanonicalHashes = 1,
    /// See [`Blocks`](crate::tables::Blocks)
    Blocks = 2,
    /// See [`BlockNumbers`](crate::tables::BlockNumbers)
    BlockNumbers = 3,
    /// See [`TotalDifficulty`](crate::tables::TotalDifficulty)
    TotalDifficulty = 4,
    /// See [`Receipts`](crate::tables::Receipts)
    Receipts = 5,
    /// The chain configuration keyed by the genesis hash, stored as JSON by `comb-core`.
    ChainConfigs = 6,
    /// See [`Accounts`](crate::tables::Accounts)
    Accounts = 7,
    /// See [`ContractsRawCode`](crate::tables::ContractsRawCode)
    ContractsRawCode = 8,
    /// See [`ContractsState`](crate::tables::ContractsState)
    ContractsState = 9,
}

impl Column {
    /// The total count of variants in the enum.
    pub const COUNT: usize = <Self as strum::EnumCount>::COUNT;

    /// Returns the `u32` representation of the `Column`.
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }
}

impl StorageColumn for Column {
    fn name(&self) -> &'static str {
        self.into()
    }

    fn id(&self) -> u32 {
        self.as_u32()
    }
}
