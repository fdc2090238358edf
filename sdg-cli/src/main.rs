//! SDG CLI - command line tool for processing DSM2 South Delta gate output.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "sdg-cli",
    version,
    about = "DSM2 South Delta gate data toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: sdg_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    sdg_cmd::run(cli.command)
}
