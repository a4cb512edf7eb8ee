use crate::{
    ChainConfig,
    CliqueConfig,
    Genesis,
    GenesisAlloc,
    PpowConfig,
};
use comb_core_types::{
    BlockHeight,
    Bytes32,
};
use once_cell::sync::Lazy;
use std::{
    fmt,
    str::FromStr,
};

pub const MAINNET_GENESIS_HASH: Bytes32 = Bytes32::new([
    0x00, 0xc4, 0x3d, 0xfb, 0x1e, 0x2c, 0xb9, 0x8e, 0xe4, 0x2e, 0x51, 0x03, 0xb7, 0xd0,
    0xff, 0x32, 0x54, 0xbb, 0x5a, 0x6e, 0x69, 0x7d, 0xa0, 0xee, 0x9d, 0xe7, 0x6a, 0xcb,
    0x54, 0xb9, 0x9a, 0x47,
]);

pub const TESTNET_GENESIS_HASH: Bytes32 = Bytes32::new([
    0x61, 0x8f, 0x66, 0x8a, 0x0e, 0x7b, 0x22, 0x1b, 0xec, 0x93, 0x6c, 0xdd, 0x81, 0xf0,
    0x33, 0x01, 0xc4, 0x5e, 0x47, 0x46, 0x52, 0x25, 0xbe, 0x35, 0x72, 0x62, 0x0d, 0x1f,
    0x82, 0xc3, 0x30, 0x11,
]);

pub const INTERNAL_GENESIS_HASH: Bytes32 = Bytes32::new([
    0x1d, 0x42, 0x99, 0x2e, 0xa4, 0xcd, 0xe7, 0xc8, 0x76, 0xf8, 0x6c, 0xa4, 0x2e, 0xac,
    0x2e, 0xd4, 0x70, 0x89, 0xc7, 0x8b, 0xa2, 0xa7, 0x47, 0xbb, 0x14, 0x0e, 0x7e, 0xa4,
    0xf2, 0x34, 0x94, 0xb4,
]);

pub const PLUTO_GENESIS_HASH: Bytes32 = Bytes32::new([
    0x1b, 0x90, 0x07, 0xb1, 0x71, 0x13, 0x88, 0xbe, 0xf1, 0xfb, 0x39, 0x3a, 0x56, 0xbe,
    0xd4, 0xab, 0x63, 0xb8, 0xec, 0xd6, 0x63, 0xbb, 0x32, 0x42, 0x24, 0x0d, 0x97, 0x6a,
    0x46, 0x7f, 0xcc, 0xef,
]);

pub const DEV_GENESIS_HASH: Bytes32 = Bytes32::new([
    0x45, 0x16, 0x19, 0x14, 0x42, 0xec, 0x5c, 0xad, 0x5d, 0x33, 0x1e, 0x57, 0xb3, 0x58,
    0x1a, 0xe7, 0xec, 0xba, 0x75, 0x75, 0xf4, 0x2a, 0xc0, 0x7a, 0x23, 0x01, 0x4e, 0x98,
    0x65, 0xf1, 0x2e, 0x94,
]);

const PLUTO_EXTRA_DATA: &str = "0000000000000000000000000000000000000000000000000000000000000000e8ffc3d0c02c0bfc39b139fa49e2c5475f0000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000";
const DEV_EXTRA_DATA: &str = "9da26fc2e1d6ad9fdd46138906b0104ae68a65d8";

/// The built-in networks with a default genesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
    Internal,
    Pluto,
    Dev,
}

fn prealloc(json: &str) -> GenesisAlloc {
    serde_json::from_str(json).expect("built-in genesis alloc is valid JSON")
}

fn hex_resource(hex: &str) -> Vec<u8> {
    hex::decode(hex).expect("built-in extra data is valid hex")
}

fn ppow_forks(
    chain_id: u64,
    homestead: u64,
    eip150: u64,
    eip155: u64,
    eip158: u64,
    byzantium: u64,
) -> ChainConfig {
    ChainConfig {
        chain_id,
        homestead_block: Some(BlockHeight::new(homestead)),
        eip150_block: Some(BlockHeight::new(eip150)),
        eip155_block: Some(BlockHeight::new(eip155)),
        eip158_block: Some(BlockHeight::new(eip158)),
        byzantium_block: Some(BlockHeight::new(byzantium)),
        ppow: Some(PpowConfig::default()),
        ..Default::default()
    }
}

static MAINNET_CONFIG: Lazy<ChainConfig> = Lazy::new(|| ppow_forks(1, 0, 0, 0, 0, 0));
static TESTNET_CONFIG: Lazy<ChainConfig> =
    Lazy::new(|| ppow_forks(3, 0, 0, 10, 10, 1_700_000));
static INTERNAL_CONFIG: Lazy<ChainConfig> =
    Lazy::new(|| ppow_forks(4, 1, 2, 3, 3, 1_035_301));
static PLUTO_CONFIG: Lazy<ChainConfig> = Lazy::new(|| ChainConfig {
    chain_id: 20,
    homestead_block: Some(BlockHeight::GENESIS),
    eip150_block: Some(BlockHeight::GENESIS),
    eip155_block: Some(BlockHeight::GENESIS),
    eip158_block: Some(BlockHeight::GENESIS),
    byzantium_block: Some(BlockHeight::GENESIS),
    clique: Some(CliqueConfig {
        period: 1,
        epoch: 30_000,
    }),
    ..Default::default()
});
static DEV_CONFIG: Lazy<ChainConfig> = Lazy::new(ChainConfig::all_protocol_changes);

static MAINNET_GENESIS: Lazy<Genesis> = Lazy::new(|| Genesis {
    config: Some(MAINNET_CONFIG.clone()),
    nonce: 98,
    extra_data: b"comb-mainnet".to_vec(),
    gas_limit: 0x2fefd8,
    difficulty: Some(1_048_576u64.into()),
    alloc: prealloc(include_str!("../../resources/mainnet_alloc.json")),
    ..Default::default()
});

static TESTNET_GENESIS: Lazy<Genesis> = Lazy::new(|| Genesis {
    config: Some(TESTNET_CONFIG.clone()),
    nonce: 28,
    extra_data: b"comb-testnet".to_vec(),
    gas_limit: 0x2fefd8,
    difficulty: Some(1_048_576u64.into()),
    alloc: prealloc(include_str!("../../resources/testnet_alloc.json")),
    ..Default::default()
});

// The internal network shares the test network's allocations.
static INTERNAL_GENESIS: Lazy<Genesis> = Lazy::new(|| Genesis {
    config: Some(INTERNAL_CONFIG.clone()),
    nonce: 20,
    extra_data: b"comb-internal".to_vec(),
    gas_limit: 0x2fefd8,
    difficulty: Some(1u64.into()),
    alloc: TESTNET_GENESIS.alloc.clone(),
    ..Default::default()
});

static PLUTO_GENESIS: Lazy<Genesis> = Lazy::new(|| Genesis {
    config: Some(PLUTO_CONFIG.clone()),
    timestamp: 0x59f83144,
    extra_data: hex_resource(PLUTO_EXTRA_DATA),
    gas_limit: 0x47b760,
    difficulty: Some(1u64.into()),
    alloc: prealloc(include_str!("../../resources/pluto_alloc.json")),
    ..Default::default()
});

static DEV_GENESIS: Lazy<Genesis> = Lazy::new(|| Genesis {
    config: Some(DEV_CONFIG.clone()),
    nonce: 42,
    extra_data: hex_resource(DEV_EXTRA_DATA),
    gas_limit: 4_712_388,
    difficulty: Some(1u64.into()),
    alloc: prealloc(include_str!("../../resources/dev_alloc.json")),
    ..Default::default()
});

impl Network {
    pub const ALL: [Network; 5] = [
        Network::Mainnet,
        Network::Testnet,
        Network::Internal,
        Network::Pluto,
        Network::Dev,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Internal => "internal",
            Network::Pluto => "pluto",
            Network::Dev => "dev",
        }
    }

    /// The default genesis specification of the network. Parsed on first use.
    pub fn genesis(&self) -> &'static Genesis {
        match self {
            Network::Mainnet => &MAINNET_GENESIS,
            Network::Testnet => &TESTNET_GENESIS,
            Network::Internal => &INTERNAL_GENESIS,
            Network::Pluto => &PLUTO_GENESIS,
            Network::Dev => &DEV_GENESIS,
        }
    }

    pub fn chain_config(&self) -> &'static ChainConfig {
        match self {
            Network::Mainnet => &MAINNET_CONFIG,
            Network::Testnet => &TESTNET_CONFIG,
            Network::Internal => &INTERNAL_CONFIG,
            Network::Pluto => &PLUTO_CONFIG,
            Network::Dev => &DEV_CONFIG,
        }
    }

    /// The hash of the network's default genesis block.
    pub fn genesis_hash(&self) -> Bytes32 {
        match self {
            Network::Mainnet => MAINNET_GENESIS_HASH,
            Network::Testnet => TESTNET_GENESIS_HASH,
            Network::Internal => INTERNAL_GENESIS_HASH,
            Network::Pluto => PLUTO_GENESIS_HASH,
            Network::Dev => DEV_GENESIS_HASH,
        }
    }

    /// The network whose default genesis has the given hash.
    pub fn from_genesis_hash(hash: &Bytes32) -> Option<Network> {
        Self::ALL
            .into_iter()
            .find(|network| &network.genesis_hash() == hash)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown network `{0}`")]
pub struct UnknownNetwork(pub String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|network| network.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownNetwork(s.to_string()))
    }
}

/// The configuration to use for a genesis whose configuration isn't available:
/// the genesis's own configuration when there is one, the built-in configuration
/// when the hash belongs to a built-in network, otherwise every protocol change.
pub fn config_or_default(genesis: Option<&Genesis>, genesis_hash: &Bytes32) -> ChainConfig {
    if let Some(config) = genesis.and_then(|genesis| genesis.config.as_ref()) {
        return config.clone()
    }
    match Network::from_genesis_hash(genesis_hash) {
        Some(network) => {
            tracing::debug!(%network, "Using the built-in chain config");
            network.chain_config().clone()
        }
        None => {
            tracing::debug!(
                hash = %genesis_hash,
                "Unknown genesis, enabling every protocol change"
            );
            ChainConfig::all_protocol_changes()
        }
    }
}
