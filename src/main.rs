use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shared_wallet::config::{self, Config};
use shared_wallet::core::{AllowanceAction, BalanceAction, OwnershipAction, TransferAction};
use shared_wallet::infrastructure::{connect, AlloyChainClient, ChainClient, ProviderConfig};
use shared_wallet::modules::{
    ActionOutcome, AllowanceRunner, BalanceRunner, Deployer, EventMonitor, OwnershipRunner,
    StdoutSink, TransfersRunner,
};

/// Grace period between a shutdown signal and a forced exit.
const SHUTDOWN_FALLBACK: Duration = Duration::from_secs(3);

#[derive(Debug, Parser)]
#[command(name = "wallet", version, about = "Shared wallet contract client")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Hex private key of the signing account
    #[arg(short = 'k', long = "private-key", global = true)]
    private_key: Option<String>,

    /// Contract address (overrides contract.address)
    #[arg(short = 'c', long = "contract", global = true)]
    contract: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Deploy a new shared wallet contract
    Deploy,
    /// Print contract events as JSON lines until interrupted
    Monitor,
    /// Run contract methods
    Run {
        #[command(subcommand)]
        runner: RunCommand,
    },
}

#[derive(Debug, Subcommand)]
enum RunCommand {
    /// Change or read the allowance of a beneficiary
    Allowance {
        /// set, get, increase or reduce
        #[arg(long)]
        action: String,
        #[arg(short = 't', long = "target", default_value = "")]
        target: String,
        /// Amount in ether
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        amount: i64,
    },
    /// Balance of an address or of the contract
    Balance {
        /// address or contract
        #[arg(long, alias = "of")]
        action: String,
        #[arg(short = 't', long = "target", default_value = "")]
        target: String,
    },
    /// Read or transfer contract ownership
    Ownership {
        /// get or transfer
        #[arg(long)]
        action: String,
        #[arg(short = 't', long = "target", default_value = "")]
        target: String,
    },
    /// Send funds from the contract or fund it
    Transfer {
        /// send or receive
        #[arg(long)]
        action: String,
        #[arg(short = 't', long = "target", default_value = "")]
        target: String,
        /// Amount in ether
        #[arg(long, allow_negative_numbers = true)]
        amount: i64,
    },
}

impl RunCommand {
    /// Reject unknown actions before dialing the node.
    fn check_action(&self) -> shared_wallet::core::Result<()> {
        match self {
            RunCommand::Allowance { action, .. } => action.parse::<AllowanceAction>().map(drop),
            RunCommand::Balance { action, .. } => action.parse::<BalanceAction>().map(drop),
            RunCommand::Ownership { action, .. } => action.parse::<OwnershipAction>().map(drop),
            RunCommand::Transfer { action, .. } => action.parse::<TransferAction>().map(drop),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(forward_shutdown(shutdown_tx));

    match run(args, shutdown_rx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Flip the shutdown flag on Ctrl-C or SIGTERM, then force an exit if the
/// process is still alive after the grace period.
async fn forward_shutdown(shutdown: watch::Sender<bool>) {
    wait_for_signal().await;
    info!("closing application");
    shutdown.send_replace(true);
    tokio::time::sleep(SHUTDOWN_FALLBACK).await;
    warn!("fallback exit");
    std::process::exit(1);
}

/// Resolves on Ctrl-C or SIGTERM. Never resolves if no handler can be installed.
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(%err, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(%err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

async fn run(args: Args, shutdown: watch::Receiver<bool>) -> Result<()> {
    let mut config = config::load(args.config.as_deref())?;
    config.apply_overrides(args.private_key, args.contract);
    config.validate()?;

    match args.command {
        Command::Deploy => {
            let client = dial(&config, &config.blockchain.http).await?;
            let address = cancellable(shutdown, Deployer::new(config.tx_settings()).deploy(&client))
                .await??;
            println!("Contract deployed at address {address}");
        }
        Command::Monitor => {
            let client: Arc<dyn ChainClient> = Arc::new(dial(&config, &config.blockchain.ws).await?);
            let monitor = EventMonitor::new(client, Arc::new(StdoutSink));
            monitor.start(&config.contract.address, shutdown).await?;
        }
        Command::Run { runner } => {
            runner.check_action()?;
            let client = dial(&config, &config.blockchain.ws).await?;
            let outcome = cancellable(shutdown, run_action(&config, &client, runner)).await??;
            println!("{outcome}");
        }
    }
    Ok(())
}

async fn run_action(
    config: &Config,
    client: &AlloyChainClient,
    command: RunCommand,
) -> shared_wallet::core::Result<ActionOutcome> {
    let settings = config.tx_settings();
    match command {
        RunCommand::Allowance {
            action,
            target,
            amount,
        } => {
            AllowanceRunner::new(settings)
                .run(client, &action, &target, amount)
                .await
        }
        RunCommand::Balance { action, target } => {
            BalanceRunner::new(settings).run(client, &action, &target).await
        }
        RunCommand::Ownership { action, target } => {
            OwnershipRunner::new(settings).run(client, &action, &target).await
        }
        RunCommand::Transfer {
            action,
            target,
            amount,
        } => {
            TransfersRunner::new(settings)
                .run(client, &action, &target, amount)
                .await
        }
    }
}

async fn dial(config: &Config, url: &str) -> Result<AlloyChainClient> {
    connect(ProviderConfig::from_url(url), config.dial_timeout())
        .await
        .with_context(|| format!("connecting to {url}"))
}

/// Run `operation` unless the shutdown flag is raised first.
async fn cancellable<T>(
    mut shutdown: watch::Receiver<bool>,
    operation: impl std::future::Future<Output = T>,
) -> Result<T> {
    let stop = async move {
        if shutdown.wait_for(|stop| *stop).await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    tokio::select! {
        output = operation => Ok(output),
        _ = stop => anyhow::bail!("interrupted"),
    }
}
