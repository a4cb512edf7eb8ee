use anyhow::Context;
use clap::Parser;
use std::{
    env,
    str::FromStr,
};
use tracing_subscriber::{
    filter::EnvFilter,
    layer::SubscriberExt,
    registry,
    Layer,
};

pub mod compat;
pub mod init;
pub mod inspect;
pub mod precompiles;

#[derive(Parser, Debug)]
#[clap(
    name = "comb-genesis",
    about = "Inspect Comb genesis specifications and reconcile them with a chain database",
    version,
    rename_all = "kebab-case"
)]
pub struct Opt {
    #[clap(subcommand)]
    command: Comb,
}

#[derive(Debug, Parser)]
pub enum Comb {
    Inspect(inspect::Command),
    Compat(compat::Command),
    Init(init::Command),
    Precompiles(precompiles::Command),
}

pub const LOG_FILTER: &str = "RUST_LOG";
pub const HUMAN_LOGGING: &str = "HUMAN_LOGGING";

pub fn init_logging() -> anyhow::Result<()> {
    let filter = match env::var_os(LOG_FILTER) {
        Some(_) => EnvFilter::try_from_default_env()
            .with_context(|| format!("Invalid `{LOG_FILTER}` provided"))?,
        None => EnvFilter::new("info"),
    };

    let human_logging = match env::var(HUMAN_LOGGING) {
        Ok(value) => bool::from_str(&value).with_context(|| {
            format!("Expected `true` or `false` to be provided for `{HUMAN_LOGGING}`")
        })?,
        Err(_) => true,
    };

    let layer = tracing_subscriber::fmt::Layer::default().with_writer(std::io::stderr);
    let fmt = if human_logging {
        layer.with_ansi(true).with_level(true).boxed()
    } else {
        layer.with_ansi(false).with_level(true).json().boxed()
    };

    let subscriber = registry::Registry::default().with(filter).with(fmt);
    tracing::subscriber::set_global_default(subscriber)
        .context("setting global default failed")?;
    Ok(())
}

/// Runs a parsed command and returns the report printed to stdout.
pub fn exec(command: Comb) -> anyhow::Result<serde_json::Value> {
    match command {
        Comb::Inspect(command) => inspect::exec(command),
        Comb::Compat(command) => compat::exec(command),
        Comb::Init(command) => init::exec(command),
        Comb::Precompiles(command) => precompiles::exec(command),
    }
}

pub fn run_cli() -> anyhow::Result<()> {
    init_logging()?;
    let opt = match Opt::try_parse() {
        Ok(opt) => opt,
        // Prints the error and exits.
        Err(e) => e.exit(),
    };
    let report = exec(opt.command)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
