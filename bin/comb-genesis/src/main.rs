use comb_genesis::cli;

fn main() -> anyhow::Result<()> {
    cli::run_cli()
}
