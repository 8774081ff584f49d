//! Definitions of the CLI arguments for the deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    chain::RpcChainClient,
    commands,
    config::NetworkConfig,
    constants::{DEFAULT_ADDRESSES_DIR, DEFAULT_ARTIFACTS_DIR, VERIFY_COOLDOWN},
    errors::ScriptError,
    explorer::EtherscanApi,
    storage::FsStore,
    verifier::FixedInterval,
};

/// The command line interface for the deploy scripts
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer account
    #[arg(short = 'p', long, env = "DEPLOYER_PRIVATE_KEY")]
    pub priv_key: String,
    /// HTTP URL of the RPC endpoint to deploy through
    #[arg(short = 'r', long, env = "RPC_URL")]
    pub rpc_url: String,
    /// Name of the target network (bsc, bscTestnet, hardhat, localhost)
    #[arg(short = 'n', long)]
    pub network: String,
    /// Directory holding the compiled contract artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,
    /// Directory the per-network address books are written to
    #[arg(long, default_value = DEFAULT_ADDRESSES_DIR)]
    pub addresses_dir: PathBuf,
    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The deploy script command to run
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the full farming suite, wire it up and record the addresses
    DeployAll(DeployAllArgs),
    /// Deploy a standalone farming contract
    DeployFarming,
}

#[derive(Args)]
pub struct DeployAllArgs {
    /// Deploy the core contracts behind upgradeable proxies
    #[arg(short = 'u', long)]
    pub upgradeable: bool,
    /// URL of the block-explorer verification API; verification is skipped
    /// when unset
    #[arg(long, env = "VERIFIER_API_URL")]
    pub verifier_url: Option<String>,
    /// API key for the block-explorer verification API
    #[arg(long, env = "VERIFIER_API_KEY")]
    pub verifier_api_key: Option<String>,
}

impl Command {
    /// Runs the command
    pub async fn run(
        self,
        cfg: &NetworkConfig,
        client: &RpcChainClient,
        addresses_dir: PathBuf,
    ) -> Result<(), ScriptError> {
        match self {
            Command::DeployAll(args) => {
                let store = FsStore::new(addresses_dir);
                let verifier = args.verifier_url.map(|url| {
                    EtherscanApi::new(url, args.verifier_api_key.unwrap_or_default())
                });
                let gate = FixedInterval::new(VERIFY_COOLDOWN);

                commands::deploy_all(
                    cfg,
                    args.upgradeable,
                    client,
                    &store,
                    verifier.as_ref(),
                    &gate,
                )
                .await?;
                Ok(())
            }
            Command::DeployFarming => commands::deploy_farming(client).await,
        }
    }
}
