use comb_core_types::{
    BlockHeight,
    Bytes32,
};
use serde::{
    Deserialize,
    Serialize,
};
use serde_with::skip_serializing_none;
use std::{
    io::ErrorKind,
    path::PathBuf,
    str::FromStr,
};

use super::Network;

/// Proof-of-work engine parameters. Currently carries no settings.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct EthashConfig {}

/// Proof-of-authority engine parameters.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CliqueConfig {
    /// Seconds between blocks.
    pub period: u64,
    /// Blocks after which votes are reset and a checkpoint is made.
    pub epoch: u64,
}

/// Parameters of the Comb proof-of-work variant. Currently carries no settings.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PpowConfig {}

/// The consensus engine selected by a chain configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsensusEngine {
    Ethash(EthashConfig),
    Clique(CliqueConfig),
    Ppow(PpowConfig),
}

/// The protocol rules of a chain: the activation height of every fork and the
/// chain identifier. A fork set to `None` is never activated.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    #[serde(default)]
    pub chain_id: u64,
    pub homestead_block: Option<BlockHeight>,
    pub dao_fork_block: Option<BlockHeight>,
    #[serde(default)]
    pub dao_fork_support: bool,
    pub eip150_block: Option<BlockHeight>,
    /// The hash of the EIP-150 block, used by light clients for header pinning.
    pub eip150_hash: Option<Bytes32>,
    pub eip155_block: Option<BlockHeight>,
    pub eip158_block: Option<BlockHeight>,
    pub byzantium_block: Option<BlockHeight>,
    pub ethash: Option<EthashConfig>,
    pub clique: Option<CliqueConfig>,
    pub ppow: Option<PpowConfig>,
}

/// A fork scheduled at a lower height than the fork preceding it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unsupported fork ordering: {fork} enabled at {height}, but {previous} enabled at {previous_height}"
)]
pub struct ForkOrderError {
    pub fork: &'static str,
    pub height: BlockHeight,
    pub previous: &'static str,
    pub previous_height: BlockHeight,
}

pub(crate) fn is_forked(fork: Option<BlockHeight>, head: BlockHeight) -> bool {
    fork.map_or(false, |fork| fork <= head)
}

impl ChainConfig {
    /// Every fork active from genesis, with the proof-of-work engine. Used when a
    /// configuration is missing and no network default applies.
    pub fn all_protocol_changes() -> Self {
        Self {
            chain_id: 1337,
            homestead_block: Some(BlockHeight::GENESIS),
            dao_fork_block: None,
            dao_fork_support: false,
            eip150_block: Some(BlockHeight::GENESIS),
            eip150_hash: Some(Bytes32::zeroed()),
            eip155_block: Some(BlockHeight::GENESIS),
            eip158_block: Some(BlockHeight::GENESIS),
            byzantium_block: Some(BlockHeight::GENESIS),
            ethash: Some(EthashConfig::default()),
            clique: None,
            ppow: None,
        }
    }

    /// The consensus engine, if one is configured. Ethash wins over clique which
    /// wins over ppow when several are present.
    pub fn engine(&self) -> Option<ConsensusEngine> {
        if let Some(ethash) = &self.ethash {
            Some(ConsensusEngine::Ethash(ethash.clone()))
        } else if let Some(clique) = &self.clique {
            Some(ConsensusEngine::Clique(clique.clone()))
        } else {
            self.ppow.clone().map(ConsensusEngine::Ppow)
        }
    }

    pub fn is_homestead(&self, height: BlockHeight) -> bool {
        is_forked(self.homestead_block, height)
    }

    pub fn is_dao_fork(&self, height: BlockHeight) -> bool {
        is_forked(self.dao_fork_block, height)
    }

    pub fn is_eip150(&self, height: BlockHeight) -> bool {
        is_forked(self.eip150_block, height)
    }

    pub fn is_eip155(&self, height: BlockHeight) -> bool {
        is_forked(self.eip155_block, height)
    }

    pub fn is_eip158(&self, height: BlockHeight) -> bool {
        is_forked(self.eip158_block, height)
    }

    pub fn is_byzantium(&self, height: BlockHeight) -> bool {
        is_forked(self.byzantium_block, height)
    }

    /// The mainline forks in activation order. The DAO fork is optional and
    /// stands outside the ordering.
    pub(crate) fn ordered_forks(&self) -> [(&'static str, Option<BlockHeight>); 5] {
        [
            ("homesteadBlock", self.homestead_block),
            ("eip150Block", self.eip150_block),
            ("eip155Block", self.eip155_block),
            ("eip158Block", self.eip158_block),
            ("byzantiumBlock", self.byzantium_block),
        ]
    }

    /// Checks that scheduled forks never activate before the forks preceding them.
    /// Unscheduled forks are skipped.
    pub fn check_fork_order(&self) -> Result<(), ForkOrderError> {
        let mut previous: Option<(&'static str, BlockHeight)> = None;
        for (fork, height) in self.ordered_forks() {
            let Some(height) = height else { continue };
            if let Some((previous, previous_height)) = previous {
                if height < previous_height {
                    return Err(ForkOrderError {
                        fork,
                        height,
                        previous,
                        previous_height,
                    })
                }
            }
            previous = Some((fork, height));
        }
        Ok(())
    }
}

impl FromStr for ChainConfig {
    type Err = anyhow::Error;

    /// Accepts the name of a built-in network or the path of a JSON file holding
    /// a configuration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(network) = s.parse::<Network>() {
            return Ok(network.chain_config().clone())
        }
        let path = PathBuf::from(s);
        let contents = std::fs::read(&path).map_err(|e| {
            let context = match e.kind() {
                ErrorKind::NotFound => format!(
                    "chain config file `{s}` doesn't exist and isn't a built-in network"
                ),
                _ => format!("failed to read chain config file `{s}`"),
            };
            anyhow::Error::new(e).context(context)
        })?;
        serde_json::from_slice(&contents).map_err(|e| {
            anyhow::Error::new(e)
                .context(format!("invalid chain config in file `{}`", path.display()))
        })
    }
}
