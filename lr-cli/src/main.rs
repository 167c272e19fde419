//! limb-rescue - browse, graph and export limb perfusion readings.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "limb-rescue",
    version,
    about = "Limb perfusion waveform toolkit"
)]
struct Cli {
    #[command(flatten)]
    connection: lr_cmd::Connection,

    #[command(subcommand)]
    command: lr_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Running {:?}", cli.command);
    lr_cmd::run(cli.connection, cli.command).await
}
