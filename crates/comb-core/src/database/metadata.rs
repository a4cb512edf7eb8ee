use crate::database::Database;
use comb_core_chain_config::ChainConfig;
use comb_core_storage::{
    codec::{
        json::Json,
        raw::Raw,
    },
    column::Column,
    structured_storage::{
        StorageAsMut,
        StorageAsRef,
    },
    tables::Table,
    Result as StorageResult,
};
use comb_core_types::{
    blockchain::primitives::BlockId,
    Bytes32,
};

/// The well-known keys of the [`Column::Metadata`] column.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    strum_macros::IntoStaticStr,
    strum_macros::EnumString,
)]
pub enum MetadataKey {
    /// The hash of the current head block.
    #[strum(serialize = "LastBlock")]
    HeadBlock,
    /// The hash of the current head header.
    #[strum(serialize = "LastHeader")]
    HeadHeader,
}

impl AsRef<[u8]> for MetadataKey {
    fn as_ref(&self) -> &[u8] {
        let key: &'static str = self.into();
        key.as_bytes()
    }
}

impl TryFrom<&[u8]> for MetadataKey {
    type Error = anyhow::Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(core::str::from_utf8(bytes)?.parse()?)
    }
}

/// The head pointers of the chain.
pub struct Metadata;

impl Table for Metadata {
    type Key = MetadataKey;
    type Value = BlockId;
    type KeyCodec = Raw;
    type ValueCodec = Raw;

    fn column() -> Column {
        Column::Metadata
    }
}

/// The chain configuration by genesis hash, stored as JSON.
pub struct ChainConfigs;

impl Table for ChainConfigs {
    type Key = Bytes32;
    type Value = ChainConfig;
    type KeyCodec = Raw;
    type ValueCodec = Json;

    fn column() -> Column {
        Column::ChainConfigs
    }
}

impl Database {
    pub fn head_block_hash(&self) -> StorageResult<Option<BlockId>> {
        self.storage::<Metadata>().get(&MetadataKey::HeadBlock)
    }

    pub fn head_header_hash(&self) -> StorageResult<Option<BlockId>> {
        self.storage::<Metadata>().get(&MetadataKey::HeadHeader)
    }

    pub fn chain_config(&self, genesis_hash: &BlockId) -> StorageResult<Option<ChainConfig>> {
        self.storage::<ChainConfigs>().get(genesis_hash)
    }

    /// Stores the configuration of the chain with the given genesis in its own
    /// transaction.
    pub fn write_chain_config(
        &self,
        genesis_hash: &BlockId,
        config: &ChainConfig,
    ) -> StorageResult<()> {
        let mut transaction = self.transaction();
        transaction
            .storage_as_mut::<ChainConfigs>()
            .insert(genesis_hash, config)?;
        transaction.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_keys_have_stable_names() {
        assert_eq!(MetadataKey::HeadBlock.as_ref(), b"LastBlock");
        assert_eq!(MetadataKey::HeadHeader.as_ref(), b"LastHeader");
        assert_eq!(
            MetadataKey::try_from(b"LastHeader".as_slice()).unwrap(),
            MetadataKey::HeadHeader
        );
        assert!(MetadataKey::try_from(b"version".as_slice()).is_err());
    }

    #[test]
    fn chain_config_is_read_back() {
        let database = Database::in_memory();
        let genesis_hash = Bytes32::from([9; 32]);
        assert_eq!(database.chain_config(&genesis_hash).unwrap(), None);

        let config = ChainConfig::all_protocol_changes();
        database.write_chain_config(&genesis_hash, &config).unwrap();
        assert_eq!(database.chain_config(&genesis_hash).unwrap(), Some(config));
    }
}
