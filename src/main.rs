//! Entrypoint of the deploy scripts

use clap::Parser;
use farming_deploy::{chain::RpcChainClient, cli::Cli, config::NetworkConfig, errors::ScriptError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = NetworkConfig::for_network(&cli.network)?;
    let client = RpcChainClient::connect(&cli.rpc_url, &cli.priv_key, cli.artifacts_dir)?;

    cli.command.run(&cfg, &client, cli.addresses_dir).await
}
