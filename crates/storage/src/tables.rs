//! The module contains definition of storage tables used by default implementation of comb-core.

use crate::{
    codec::{
        postcard::Postcard,
        primitive::Primitive,
        raw::Raw,
        Decode,
        Encode,
    },
    column::Column,
    storage_key::{
        StorageKey,
        StorageKeyCodec,
    },
};
use comb_core_types::{
    blockchain::{
        block::Block,
        primitives::{
            BlockId,
            Receipts as BlockReceipts,
        },
    },
    entities::account::Account,
    Address,
    BlockHeight,
    Bytes32,
    U256,
};

/// The table maps typed keys to typed values inside one [`Column`].
pub trait Table {
    /// The type of the key.
    type Key;
    /// The type of the value.
    type Value;
    /// The codec used to encode the key.
    type KeyCodec: Encode<Self::Key> + Decode<Self::Key>;
    /// The codec used to encode the value.
    type ValueCodec: Encode<Self::Value> + Decode<Self::Value>;

    /// The column where the table stores its entries.
    fn column() -> Column;
}

macro_rules! table {
    ($(#[$meta:meta])* $name:ident, $key:ty => $value:ty, $key_codec:ty, $value_codec:ty) => {
        $(#[$meta])*
        pub struct $name;

        impl Table for $name {
            type Key = $key;
            type Value = $value;
            type KeyCodec = $key_codec;
            type ValueCodec = $value_codec;

            fn column() -> Column {
                Column::$name
            }
        }
    };
}

table!(
    /// The canonical block hash at each height.
    CanonicalHashes, BlockHeight => BlockId, Primitive<8>, Raw
);
table!(
    /// Full blocks by their hash.
    Blocks, BlockId => Block, Raw, Postcard
);
table!(
    /// The height of each stored block by its hash.
    BlockNumbers, BlockId => BlockHeight, Raw, Primitive<8>
);
table!(
    /// The cumulative difficulty of the chain up to and including the block.
    TotalDifficulty, BlockId => U256, Raw, Primitive<32>
);
table!(
    /// The receipts of the block's transactions.
    Receipts, BlockId => BlockReceipts, Raw, Postcard
);
table!(
    /// Account state by address.
    Accounts, Address => Account, Raw, Postcard
);
table!(
    /// Contract bytecode by its code hash.
    ContractsRawCode, Bytes32 => Vec<u8>, Raw, Raw
);
table!(
    /// Contract storage slots.
    ContractsState, StorageKey => Bytes32, StorageKeyCodec, Raw
);
