use anyhow::Context;
use clap::Parser;
use comb_core::{
    database::Database,
    service::{
        genesis::{
            commit_genesis,
            setup_genesis,
            GenesisAction,
        },
        Config,
    },
};
use comb_core_chain_config::{
    Genesis,
    Network,
};
use serde_json::json;

/// Run genesis setup against a fresh in-memory database.
#[derive(Debug, Clone, Parser)]
pub struct Command {
    /// The genesis to set up: a network name or a JSON file. Without it and without
    /// `--network` the stored genesis is kept, or the main network default is written.
    #[arg(long = "genesis")]
    pub genesis: Option<Genesis>,

    /// The built-in network to start from. Ignored when `--genesis` is given.
    #[arg(long = "network")]
    pub network: Option<Network>,

    /// A genesis committed to the database before setup runs, standing in for an
    /// existing chain.
    #[arg(long = "preload")]
    pub preload: Option<Genesis>,
}

fn describe(action: GenesisAction) -> String {
    match action {
        GenesisAction::CommittedDefault(network) => format!("committed {network} default"),
        GenesisAction::CommittedCustom => "committed custom genesis".to_string(),
        GenesisAction::Loaded => "loaded stored genesis".to_string(),
        GenesisAction::RecoveredConfig => "recovered missing chain config".to_string(),
        GenesisAction::UpdatedConfig => "updated chain config".to_string(),
    }
}

pub fn exec(command: Command) -> anyhow::Result<serde_json::Value> {
    let database = Database::in_memory();
    if let Some(preload) = &command.preload {
        let block = commit_genesis(preload, &database)
            .context("failed to preload the database")?;
        tracing::info!(hash = %block.id(), "Preloaded genesis");
    }

    let config = Config {
        network: command.network,
        genesis: command.genesis,
    };
    let report = match setup_genesis(&database, config.genesis_spec().as_ref()) {
        Ok(setup) => json!({
            "ok": true,
            "action": describe(setup.action),
            "genesis_hash": setup.genesis_hash.to_string(),
            "config": setup.config,
        }),
        Err(err) => {
            tracing::error!(%err, "Genesis setup failed");
            json!({
                "ok": false,
                "error": err.to_string(),
                "genesis_hash": err.genesis_hash.to_string(),
                "config": err.config,
            })
        }
    };
    Ok(report)
}
