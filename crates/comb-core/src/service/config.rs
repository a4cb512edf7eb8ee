use comb_core_chain_config::{
    Genesis,
    Network,
};

#[derive(Clone, Debug, Default)]
pub struct Config {
    /// The built-in network to start from when no explicit genesis is given.
    pub network: Option<Network>,
    /// The explicit genesis specification. Takes precedence over `network`.
    pub genesis: Option<Genesis>,
}

impl Config {
    pub fn local_node() -> Self {
        Self {
            network: Some(Network::Dev),
            genesis: None,
        }
    }

    /// The genesis specification handed to the reconciler. `None` selects the
    /// main network default for an empty database and keeps whatever is stored otherwise.
    pub fn genesis_spec(&self) -> Option<Genesis> {
        self.genesis
            .clone()
            .or_else(|| self.network.map(|network| network.genesis().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_genesis_wins_over_network() {
        let genesis = Genesis {
            nonce: 7,
            ..Default::default()
        };
        let config = Config {
            network: Some(Network::Testnet),
            genesis: Some(genesis.clone()),
        };
        assert_eq!(config.genesis_spec(), Some(genesis));
    }

    #[test]
    fn local_node_uses_dev_network() {
        assert_eq!(
            Config::local_node().genesis_spec().as_ref(),
            Some(Network::Dev.genesis())
        );
        assert_eq!(Config::default().genesis_spec(), None);
    }
}
