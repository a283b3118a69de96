//! WSD CLI - inspect and export watershed ET dashboard data from the command line.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "wsd-cli",
    version,
    about = "Watershed ET dashboard data toolkit"
)]
struct Cli {
    /// Dashboard configuration (watersheds.json)
    #[arg(short = 'c', long, default_value = "fixtures/watersheds.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: wsd_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    wsd_cmd::run(&cli.config, cli.command)
}
