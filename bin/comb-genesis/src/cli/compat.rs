use clap::Parser;
use comb_core_chain_config::ChainConfig;
use comb_core_types::BlockHeight;
use serde_json::json;

/// Check whether a chain at a given height may switch to a new configuration.
#[derive(Debug, Clone, Parser)]
pub struct Command {
    /// The configuration the chain runs with: a network name or a JSON file.
    #[arg(name = "STORED")]
    pub stored: ChainConfig,

    /// The configuration to switch to: a network name or a JSON file.
    #[arg(name = "NEW")]
    pub new: ChainConfig,

    /// The height of the chain head.
    #[arg(long = "height", default_value_t = 0)]
    pub height: u64,
}

pub fn exec(command: Command) -> anyhow::Result<serde_json::Value> {
    let height = BlockHeight::new(command.height);
    let report = match command.stored.check_compatible(&command.new, height) {
        Ok(()) => json!({
            "compatible": true,
            "height": height.as_u64(),
        }),
        Err(err) => {
            tracing::debug!(%err, "Configurations are incompatible");
            json!({
                "compatible": false,
                "height": height.as_u64(),
                "what": err.what,
                "stored": err.stored.map(|height| height.as_u64()),
                "new": err.new.map(|height| height.as_u64()),
                "rewind_to": err.rewind_to.as_u64(),
                "message": err.to_string(),
            })
        }
    };
    Ok(report)
}
