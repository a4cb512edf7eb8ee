use crate::{
    serialization::{
        HexOrDecimal,
        HexType,
        StorageWord,
    },
    ChainConfig,
    Network,
};
use comb_core_types::{
    Address,
    Bytes32,
    U256,
};
use serde::{
    Deserialize,
    Serialize,
};
use serde_with::{
    serde_as,
    skip_serializing_none,
};
use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{
        Path,
        PathBuf,
    },
    str::FromStr,
};

/// The initial balances, code and storage, keyed by account address.
pub type GenesisAlloc = BTreeMap<Address, GenesisAccount>;

/// An account allocated in the genesis state.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenesisAccount {
    #[serde_as(as = "HexType")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code: Vec<u8>,
    #[serde_as(as = "BTreeMap<StorageWord, StorageWord>")]
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub storage: BTreeMap<Bytes32, Bytes32>,
    #[serde_as(as = "HexOrDecimal")]
    pub balance: U256,
    #[serde_as(as = "HexOrDecimal")]
    #[serde(default, skip_serializing_if = "is_zero")]
    pub nonce: u64,
    /// Only meaningful for test fixtures.
    #[serde_as(as = "Option<HexType>")]
    pub secret_key: Option<Vec<u8>>,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

/// The declarative description of a chain's first block and state.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Genesis {
    pub config: Option<ChainConfig>,
    #[serde_as(as = "HexOrDecimal")]
    #[serde(default)]
    pub nonce: u64,
    #[serde_as(as = "HexOrDecimal")]
    #[serde(default)]
    pub timestamp: u64,
    #[serde_as(as = "HexType")]
    #[serde(default)]
    pub extra_data: Vec<u8>,
    #[serde_as(as = "HexOrDecimal")]
    #[serde(default)]
    pub gas_limit: u64,
    #[serde_as(as = "Option<HexOrDecimal>")]
    pub difficulty: Option<U256>,
    #[serde(default)]
    pub mix_hash: Bytes32,
    #[serde(default)]
    pub coinbase: Address,
    pub alloc: GenesisAlloc,

    // Only used by consensus test fixtures.
    #[serde_as(as = "HexOrDecimal")]
    #[serde(default)]
    pub number: u64,
    #[serde_as(as = "HexOrDecimal")]
    #[serde(default)]
    pub gas_used: u64,
    #[serde(default)]
    pub parent_hash: Bytes32,
}

impl Genesis {
    /// Reads the genesis specification from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read(path).map_err(|e| {
            let context = match e.kind() {
                ErrorKind::NotFound => {
                    format!("genesis file `{}` doesn't exist", path.display())
                }
                _ => format!("failed to read genesis file `{}`", path.display()),
            };
            anyhow::Error::new(e).context(context)
        })?;
        Self::from_json(&contents).map_err(|e| {
            e.context(format!("invalid genesis in file `{}`", path.display()))
        })
    }

    pub fn from_json(bytes: &[u8]) -> anyhow::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl FromStr for Genesis {
    type Err = anyhow::Error;

    /// Accepts the name of a built-in network or the path of a genesis JSON file.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Network>() {
            Ok(network) => Ok(network.genesis().clone()),
            Err(_) => Self::load_from_file(PathBuf::from(s)),
        }
    }
}
