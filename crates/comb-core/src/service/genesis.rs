use crate::database::{
    ChainConfigs,
    Database,
    DatabaseTransaction,
    Metadata,
    MetadataKey,
};
use comb_core_chain_config::{
    config_or_default,
    ChainConfig,
    ConfigCompatError,
    ForkOrderError,
    Genesis,
    Network,
    StateImage,
    MAINNET_GENESIS_HASH,
};
use comb_core_storage::{
    structured_storage::StorageAsMut,
    tables::{
        Accounts,
        BlockNumbers,
        Blocks,
        CanonicalHashes,
        ContractsRawCode,
        ContractsState,
        Receipts,
        TotalDifficulty,
    },
    Error as StorageError,
    Result as StorageResult,
    StorageKey,
};
use comb_core_types::{
    blockchain::{
        block::Block,
        primitives::BlockId,
    },
    BlockHeight,
    Bytes32,
};
#[cfg(any(test, feature = "test-helpers"))]
use comb_core_types::{
    Address,
    U256,
};

#[derive(Debug, thiserror::Error)]
pub enum GenesisError {
    #[error("genesis has no chain configuration")]
    NoChainConfig,
    #[error("database contains incompatible genesis (have {stored}, new {new})")]
    Mismatch { stored: BlockId, new: BlockId },
    #[error(transparent)]
    IncompatibleConfig(#[from] ConfigCompatError),
    #[error(transparent)]
    InvalidForkOrder(#[from] ForkOrderError),
    #[error("the number of the head header is missing from the database")]
    MissingHeadNumber,
    #[error("can't commit genesis block with number > 0 (got {0})")]
    NonZeroNumber(BlockHeight),
    #[error("failed to commit the genesis block: {0}")]
    Commit(StorageError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A failed setup. Carries the configuration and genesis hash the caller should
/// fall back to.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct SetupError {
    pub config: ChainConfig,
    pub genesis_hash: BlockId,
    #[source]
    pub kind: GenesisError,
}

/// What [`setup_genesis`] did to the database.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenesisAction {
    /// The database was empty and the network's default genesis was committed.
    CommittedDefault(Network),
    /// The database was empty and the supplied genesis was committed.
    CommittedCustom,
    /// The stored genesis and configuration were kept unchanged.
    Loaded,
    /// The stored genesis had no configuration; it was written.
    RecoveredConfig,
    /// The stored configuration was replaced by a compatible one.
    UpdatedConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenesisSetup {
    pub config: ChainConfig,
    pub genesis_hash: BlockId,
    pub action: GenesisAction,
}

/// Writes the genesis block, its state and every chain index pointing at it in a
/// single transaction. Nothing is written when any step fails.
pub fn commit_genesis(genesis: &Genesis, database: &Database) -> Result<Block, GenesisError> {
    let (block, state) = genesis.to_block();
    let number = block.header().number;
    if number != BlockHeight::GENESIS {
        return Err(GenesisError::NonZeroNumber(number))
    }
    let config = genesis
        .config
        .clone()
        .unwrap_or_else(ChainConfig::all_protocol_changes);
    config.check_fork_order()?;

    let mut transaction = database.transaction();
    write_genesis(&mut transaction, &block, &state, &config)
        .map_err(GenesisError::Commit)?;
    transaction.commit().map_err(GenesisError::Commit)?;

    tracing::debug!(
        hash = %block.id(),
        accounts = state.len(),
        "Committed genesis block"
    );
    Ok(block)
}

fn write_genesis(
    transaction: &mut DatabaseTransaction,
    block: &Block,
    state: &StateImage,
    config: &ChainConfig,
) -> StorageResult<()> {
    for (address, account) in state.accounts() {
        transaction
            .storage_as_mut::<Accounts>()
            .insert(address, &account.to_account())?;
        if !account.code.is_empty() {
            transaction
                .storage_as_mut::<ContractsRawCode>()
                .insert(&account.code_hash(), &account.code)?;
        }
        for (slot, value) in &account.storage {
            transaction
                .storage_as_mut::<ContractsState>()
                .insert(&StorageKey::new(*address, slot.to_vec()), value)?;
        }
    }

    let hash = block.id();
    let header = block.header();
    transaction
        .storage_as_mut::<TotalDifficulty>()
        .insert(&hash, &header.difficulty)?;
    transaction.storage_as_mut::<Blocks>().insert(&hash, block)?;
    transaction
        .storage_as_mut::<BlockNumbers>()
        .insert(&hash, &header.number)?;
    transaction
        .storage_as_mut::<Receipts>()
        .insert(&hash, &vec![])?;
    transaction
        .storage_as_mut::<CanonicalHashes>()
        .insert(&header.number, &hash)?;
    transaction
        .storage_as_mut::<Metadata>()
        .insert(&MetadataKey::HeadBlock, &hash)?;
    transaction
        .storage_as_mut::<Metadata>()
        .insert(&MetadataKey::HeadHeader, &hash)?;
    transaction
        .storage_as_mut::<ChainConfigs>()
        .insert(&hash, config)?;
    Ok(())
}

/// Commits the genesis and panics on failure.
#[cfg(any(test, feature = "test-helpers"))]
pub fn must_commit(genesis: &Genesis, database: &Database) -> Block {
    commit_genesis(genesis, database).expect("genesis commit failed")
}

/// Commits a genesis in which `address` holds `balance`.
#[cfg(any(test, feature = "test-helpers"))]
pub fn genesis_block_for_testing(
    database: &Database,
    address: Address,
    balance: U256,
) -> Block {
    let genesis = Genesis {
        alloc: [(
            address,
            comb_core_chain_config::GenesisAccount {
                balance,
                ..Default::default()
            },
        )]
        .into(),
        ..Default::default()
    };
    must_commit(&genesis, database)
}

/// Decides which genesis and chain configuration the node runs with.
///
/// - An empty database gets the supplied genesis, or the main network default.
/// - A supplied genesis must hash to the stored one.
/// - A stored genesis without configuration gets one written.
/// - Without a supplied genesis, a chain other than the main network keeps its
///   stored configuration.
/// - Otherwise the new configuration replaces the stored one if the committed
///   blocks don't depend on the rules it changes. A database still at genesis
///   accepts any new configuration.
///
/// The genesis lock of the database is held for the whole call.
pub fn setup_genesis(
    database: &Database,
    genesis: Option<&Genesis>,
) -> Result<GenesisSetup, SetupError> {
    let _guard = database.lock_genesis();

    if let Some(spec) = genesis {
        if spec.config.is_none() {
            return Err(SetupError {
                config: ChainConfig::all_protocol_changes(),
                genesis_hash: Bytes32::zeroed(),
                kind: GenesisError::NoChainConfig,
            })
        }
    }

    let stored = database
        .canonical_hash(BlockHeight::GENESIS)
        .map_err(|e| SetupError {
            config: config_or_default(genesis, &Bytes32::zeroed()),
            genesis_hash: Bytes32::zeroed(),
            kind: e.into(),
        })?;

    let Some(stored) = stored else {
        return commit_new_genesis(database, genesis)
    };

    if let Some(spec) = genesis {
        let hash = spec.block_hash();
        if hash != stored {
            return Err(SetupError {
                config: config_or_default(genesis, &hash),
                genesis_hash: hash,
                kind: GenesisError::Mismatch { stored, new: hash },
            })
        }
    }

    let new_config = config_or_default(genesis, &stored);
    let fail = |kind: GenesisError| SetupError {
        config: new_config.clone(),
        genesis_hash: stored,
        kind,
    };
    if genesis.is_some() {
        new_config
            .check_fork_order()
            .map_err(|e| fail(e.into()))?;
    }

    let Some(stored_config) = database
        .chain_config(&stored)
        .map_err(|e| fail(e.into()))?
    else {
        tracing::warn!(hash = %stored, "Found genesis block without chain config");
        database
            .write_chain_config(&stored, &new_config)
            .map_err(|e| fail(e.into()))?;
        return Ok(GenesisSetup {
            config: new_config,
            genesis_hash: stored,
            action: GenesisAction::RecoveredConfig,
        })
    };

    // A chain other than the main network changes its rules only through an
    // explicit genesis.
    if genesis.is_none() && stored != MAINNET_GENESIS_HASH {
        return Ok(GenesisSetup {
            config: stored_config,
            genesis_hash: stored,
            action: GenesisAction::Loaded,
        })
    }

    let height = database
        .head_number()
        .map_err(|e| fail(e.into()))?
        .ok_or_else(|| fail(GenesisError::MissingHeadNumber))?;

    if let Err(err) = stored_config.check_compatible(&new_config, height) {
        if height != BlockHeight::GENESIS && err.rewind_to != BlockHeight::GENESIS {
            tracing::warn!(%height, %err, "Incompatible chain config");
            return Err(fail(err.into()))
        }
    }

    if stored_config == new_config {
        return Ok(GenesisSetup {
            config: stored_config,
            genesis_hash: stored,
            action: GenesisAction::Loaded,
        })
    }
    tracing::debug!(hash = %stored, "Writing chain config");
    database
        .write_chain_config(&stored, &new_config)
        .map_err(|e| fail(e.into()))?;
    Ok(GenesisSetup {
        config: new_config,
        genesis_hash: stored,
        action: GenesisAction::UpdatedConfig,
    })
}

fn commit_new_genesis(
    database: &Database,
    genesis: Option<&Genesis>,
) -> Result<GenesisSetup, SetupError> {
    let (spec, action) = match genesis {
        Some(spec) => {
            tracing::info!("Writing custom genesis block");
            (spec, GenesisAction::CommittedCustom)
        }
        None => {
            tracing::info!("Writing default main-net genesis block");
            (
                Network::Mainnet.genesis(),
                GenesisAction::CommittedDefault(Network::Mainnet),
            )
        }
    };
    let config = spec
        .config
        .clone()
        .unwrap_or_else(ChainConfig::all_protocol_changes);

    match commit_genesis(spec, database) {
        Ok(block) => Ok(GenesisSetup {
            config,
            genesis_hash: block.id(),
            action,
        }),
        Err(kind) => Err(SetupError {
            config,
            genesis_hash: spec.block_hash(),
            kind,
        }),
    }
}
