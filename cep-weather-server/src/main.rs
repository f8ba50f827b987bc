//! Binary entry point for `cep-weather`.

use cep_weather_server::{cli, telemetry};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
