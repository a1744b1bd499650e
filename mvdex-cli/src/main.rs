//! Minimum Viable DEX tooling
//!
//! Deploys the `Balloons` token and its exchange to an Ethereum node and
//! renders the exchange's event stream.

mod commands;
mod config;
mod shutdown;

use clap::{Parser, Subcommand};
use config::ConfigLoader;
use mvdex_core::contracts::EXCHANGE_CONTRACT;
use shutdown::spawn_shutdown_watch;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Minimum Viable DEX - deploy and observe a minimal ETH/token exchange
#[derive(Parser, Debug)]
#[command(name = "mvdex")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./mvdex.toml", global = true)]
    config: PathBuf,

    /// Override the node JSON-RPC endpoint
    #[arg(long, env = "MVDEX_RPC_URL", global = true)]
    rpc_url: Option<Url>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deploy the token and exchange, resuming an interrupted run
    Deploy {
        /// Ignore the stored checkpoint and start over
        #[arg(long)]
        fresh: bool,
    },

    /// Render the events of a deployed contract
    Events {
        /// Event name (EthToTokenSwap, TokenToEthSwap, LiquidityProvided, LiquidityRemoved)
        #[arg(short, long)]
        event: String,

        /// Contract name in the deployment registry
        #[arg(long, default_value = EXCHANGE_CONTRACT)]
        contract: String,

        /// First block to read events from
        #[arg(long, default_value_t = 1)]
        start_block: u64,

        /// Render the current events once and exit
        #[arg(long)]
        once: bool,
    },

    /// Print the page header
    Header,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    if let Command::Header = args.command {
        commands::header();
        return Ok(());
    }

    let config_loader = ConfigLoader::new(&args.config, args.rpc_url);
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::debug!("Configuration loaded from {:?}", args.config);

    let result = match args.command {
        Command::Deploy { fresh } => commands::deploy(loaded_config, fresh).await,
        Command::Events {
            event,
            contract,
            start_block,
            once,
        } => {
            let shutdown_rx = spawn_shutdown_watch();
            commands::events(loaded_config, event, contract, start_block, once, shutdown_rx).await
        }
        Command::Header => Ok(()),
    };

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Logs go to stderr so rendered output on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
