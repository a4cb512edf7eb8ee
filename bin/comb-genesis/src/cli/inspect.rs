use clap::Parser;
use comb_core_chain_config::{
    Genesis,
    Network,
};
use serde_json::json;

/// Build a genesis block and print its header.
#[derive(Debug, Clone, Parser)]
pub struct Command {
    /// A built-in network name or the path of a genesis JSON file.
    #[arg(name = "GENESIS")]
    pub genesis: Genesis,
}

pub fn exec(command: Command) -> anyhow::Result<serde_json::Value> {
    let (block, state) = command.genesis.to_block();
    let header = block.header();
    let hash = block.id();
    tracing::debug!(%hash, accounts = state.len(), "Built genesis block");

    Ok(json!({
        "network": Network::from_genesis_hash(&hash).map(|network| network.name()),
        "hash": hash.to_string(),
        "number": header.number.as_u64(),
        "parent_hash": header.parent_hash.to_string(),
        "coinbase": header.coinbase.to_string(),
        "state_root": header.state_root.to_string(),
        "difficulty": header.difficulty.to_string(),
        "gas_limit": header.gas_limit,
        "gas_used": header.gas_used,
        "timestamp": header.timestamp,
        "nonce": header.nonce,
        "extra_data": format!("0x{}", hex::encode(&header.extra_data)),
        "mix_hash": header.mix_hash.to_string(),
        "accounts": state.len(),
        "config": command.genesis.config,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use test_case::test_case;

    #[test_case(Network::Mainnet)]
    #[test_case(Network::Testnet)]
    #[test_case(Network::Dev)]
    fn built_in_networks_report_their_hash(network: Network) {
        let report = exec(Command {
            genesis: network.genesis().clone(),
        })
        .unwrap();
        assert_eq!(report["hash"], network.genesis_hash().to_string());
        assert_eq!(report["network"], network.name());
        assert_eq!(report["number"], 0);
    }

    #[test]
    fn custom_file_is_not_a_known_network() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"config": {"chainId": 7}, "gasLimit": "0x10", "alloc": {}}"#)
            .unwrap();
        let genesis: Genesis = file.path().to_str().unwrap().parse().unwrap();

        let report = exec(Command { genesis }).unwrap();
        assert_eq!(report["network"], serde_json::Value::Null);
        assert_eq!(report["gas_limit"], 16);
        assert_eq!(report["accounts"], 0);
        assert_eq!(report["config"]["chainId"], 7);
    }
}
