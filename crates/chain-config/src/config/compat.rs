use super::{
    chain::is_forked,
    ChainConfig,
};
use comb_core_types::BlockHeight;

fn describe(height: &Option<BlockHeight>) -> String {
    height.map_or_else(|| "nil".to_string(), |height| height.to_string())
}

/// A configuration change that rewrites rules already applied to committed blocks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "mismatching {what} in database (have {}, want {}, rewind to {rewind_to})",
    describe(.stored),
    describe(.new)
)]
pub struct ConfigCompatError {
    /// The rule that differs.
    pub what: &'static str,
    /// Activation height in the persisted configuration.
    pub stored: Option<BlockHeight>,
    /// Activation height in the new configuration.
    pub new: Option<BlockHeight>,
    /// The height the chain must be rolled back to before the new configuration applies.
    pub rewind_to: BlockHeight,
}

impl ConfigCompatError {
    fn new(
        what: &'static str,
        stored: Option<BlockHeight>,
        new: Option<BlockHeight>,
    ) -> Self {
        let rewind_to = match (stored, new) {
            (Some(stored), Some(new)) => stored.min(new),
            (Some(height), None) | (None, Some(height)) => height,
            (None, None) => BlockHeight::GENESIS,
        };
        Self {
            what,
            stored,
            new,
            rewind_to,
        }
    }
}

fn fork_incompatible(
    stored: Option<BlockHeight>,
    new: Option<BlockHeight>,
    head: BlockHeight,
) -> bool {
    (is_forked(stored, head) || is_forked(new, head)) && stored != new
}

impl ChainConfig {
    /// Checks whether the chain at `head` may switch from `self` to `new`. Every
    /// conflicting rule is inspected and the one requiring the deepest rewind is
    /// reported.
    pub fn check_compatible(
        &self,
        new: &ChainConfig,
        head: BlockHeight,
    ) -> Result<(), ConfigCompatError> {
        let forks = [
            ("Homestead fork block", self.homestead_block, new.homestead_block),
            ("DAO fork block", self.dao_fork_block, new.dao_fork_block),
            ("EIP150 fork block", self.eip150_block, new.eip150_block),
            ("EIP155 fork block", self.eip155_block, new.eip155_block),
            ("EIP158 fork block", self.eip158_block, new.eip158_block),
            ("Byzantium fork block", self.byzantium_block, new.byzantium_block),
        ];

        let mut conflicts: Vec<ConfigCompatError> = forks
            .into_iter()
            .filter(|(_, stored, new)| fork_incompatible(*stored, *new, head))
            .map(|(what, stored, new)| ConfigCompatError::new(what, stored, new))
            .collect();

        if self.is_dao_fork(head) && self.dao_fork_support != new.dao_fork_support {
            conflicts.push(ConfigCompatError::new(
                "DAO fork support flag",
                self.dao_fork_block,
                new.dao_fork_block,
            ));
        }
        if self.is_eip158(head) && self.chain_id != new.chain_id {
            conflicts.push(ConfigCompatError::new(
                "EIP158 chain ID",
                self.eip158_block,
                self.eip158_block,
            ));
        }

        // `min_by_key` keeps the first of equal elements.
        match conflicts.into_iter().min_by_key(|conflict| conflict.rewind_to) {
            Some(conflict) => Err(conflict),
            None => Ok(()),
        }
    }
}
