use clap::Parser;
use comb_core_chain_config::ChainConfig;
use comb_core_types::BlockHeight;
use comb_vm::{
    PrecompileSet,
    ReservedAddresses,
};
use serde_json::json;

/// List the native contracts in force at a height.
#[derive(Debug, Clone, Parser)]
pub struct Command {
    /// The chain configuration: a network name or a JSON file.
    #[arg(long = "chain", default_value = "mainnet")]
    pub chain: ChainConfig,

    #[arg(long = "height", default_value_t = 0)]
    pub height: u64,

    /// Also list every reserved address with the reason it is reserved.
    #[arg(long = "reserved")]
    pub reserved: bool,
}

pub fn exec(command: Command) -> anyhow::Result<serde_json::Value> {
    let set = PrecompileSet::active(&command.chain, BlockHeight::new(command.height));
    let contracts: Vec<_> = set
        .contracts()
        .iter()
        .map(|(address, contract)| {
            json!({
                "address": address.to_string(),
                "name": contract.name(),
            })
        })
        .collect();

    let mut report = json!({
        "set": set.to_string(),
        "height": command.height,
        "contracts": contracts,
    });
    if command.reserved {
        let reserved: Vec<_> = ReservedAddresses::all()
            .iter()
            .map(|(address, reservation)| {
                json!({
                    "address": address.to_string(),
                    "reservation": format!("{reservation:?}"),
                })
            })
            .collect();
        report["reserved"] = serde_json::Value::Array(reserved);
    }
    Ok(report)
}
