//! opn-farmer - randomized multi-wallet swap bot for the OPN testnet

use alloy::signers::local::PrivateKeySigner;
use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinError;
use tracing_subscriber::{fmt, EnvFilter};

use opn_farmer::adapters::cli::{self, Command, QuoteCmd, RunCmd, StatusCmd, StdinPrompt};
use opn_farmer::adapters::evm::{ClientOptions, EvmChainClient, EvmConnector};
use opn_farmer::adapters::files::{load_private_keys, load_proxies};
use opn_farmer::application::{
    EngineSettings, FleetConfig, FleetError, FleetScheduler, ScheduleSettings, SwapExecutor,
    WalletCycleScheduler,
};
use opn_farmer::config::{load_or_default, Config};
use opn_farmer::domain::{display_units, parse_swap_count, to_base_units, SwapDirection};
use opn_farmer::ports::ChainConnector;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (RPC_URL override goes here)
    dotenvy::dotenv().ok();

    let app = cli::init();

    let config_path = match &app.command {
        Command::Run(cmd) => cmd.config.clone(),
        Command::Status(cmd) => cmd.config.clone(),
        Command::Quote(cmd) => cmd.config.clone(),
    };
    let config = load_or_default(config_path.as_deref()).context("Failed to load configuration")?;

    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Run(cmd) => run_command(cmd, config).await,
        Command::Status(cmd) => status_command(cmd, config).await,
        Command::Quote(cmd) => quote_command(cmd, config).await,
    }
}

/// Flags win over the configured level; RUST_LOG wins over both
fn init_logging(verbose: bool, debug: bool, default_level: &str) -> Result<()> {
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        default_level
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

fn client_options(config: &Config) -> ClientOptions {
    ClientOptions {
        request_timeout: Duration::from_secs(config.network.request_timeout_secs),
        receipt_timeout: Duration::from_secs(config.network.receipt_timeout_secs),
    }
}

fn build_connector(config: &Config) -> Result<EvmConnector> {
    let keys_path = config.files.private_keys_path();
    let signers = load_private_keys(&keys_path)
        .with_context(|| format!("Failed to load wallets from {}", keys_path.display()))?;

    EvmConnector::new(&config.network.get_rpc_url(), signers, client_options(config))
        .context("Failed to create chain client")
}

async fn run_command(cmd: RunCmd, config: Config) -> Result<()> {
    let connector = build_connector(&config)?;
    let proxies = load_proxies(config.files.proxies_path());

    tracing::info!(
        "Loaded: {} wallets, {} proxies",
        connector.wallet_count(),
        proxies.len()
    );
    if !proxies.is_empty() && proxies.len() != connector.wallet_count() {
        tracing::warn!("Cycling proxies");
    }

    let schedule = ScheduleSettings::from(&config);
    let mut fleet_config = FleetConfig::new(proxies);
    if let Some(answer) = cmd.swaps.as_deref() {
        let count = parse_swap_count(answer, schedule.default_swap_count, schedule.max_swap_count);
        fleet_config = fleet_config.with_swap_count(count);
    }

    let mut fleet = FleetScheduler::new(
        Arc::new(connector),
        Arc::new(StdinPrompt),
        SwapExecutor::new(EngineSettings::from(&config)),
        config.swap_pairs(),
        schedule,
        StdRng::from_entropy(),
    );

    tracing::info!("Bot ready on chain {} - press Ctrl+C to stop", config.network.chain_id);

    let max_cycles = cmd.cycles;
    let handle = tokio::spawn(async move { fleet.run(&mut fleet_config, max_cycles).await });

    tokio::select! {
        joined = handle => fleet_exit(joined),
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Shutting down...");
            Ok(())
        }
    }
}

/// Map the fleet task's end onto the process result. A panic inside the
/// task arrives here as a `JoinError`.
fn fleet_exit(joined: Result<Result<u64, FleetError>, JoinError>) -> Result<()> {
    match joined {
        Ok(Ok(cycles)) => {
            tracing::info!("Stopped after {} cycles", cycles);
            Ok(())
        }
        Ok(Err(e)) => Err(e).context("Fleet stopped"),
        Err(e) => {
            tracing::error!("Crash: {}", e);
            bail!("Fleet task failed: {}", e)
        }
    }
}

async fn status_command(_cmd: StatusCmd, config: Config) -> Result<()> {
    let connector = build_connector(&config)?;
    let proxies = FleetConfig::new(load_proxies(config.files.proxies_path()));

    let executor = SwapExecutor::new(EngineSettings::from(&config));
    let pairs = config.swap_pairs();
    let schedule = ScheduleSettings::from(&config);
    let scheduler = WalletCycleScheduler::new(&executor, &pairs, &schedule);

    for index in 0..connector.wallet_count() {
        let chain = connector.connect(index, proxies.proxy_for(index))?;
        match scheduler.snapshot(chain.as_ref()).await {
            Ok(snapshot) => {
                println!("Wallet {}: {}", index + 1, snapshot.address);
                println!("  OPN: {}", snapshot.native_display());
                for token in snapshot.tokens.values() {
                    println!("  {}: {}", token.symbol, token.display());
                }
            }
            Err(e) => println!("Wallet {}: unavailable ({})", index + 1, e),
        }
    }

    Ok(())
}

async fn quote_command(cmd: QuoteCmd, config: Config) -> Result<()> {
    let pairs = config.swap_pairs();
    let Some(pair) = pairs
        .iter()
        .find(|p| p.symbol.eq_ignore_ascii_case(&cmd.symbol))
    else {
        bail!(
            "Unknown symbol '{}'; configured pairs: {}",
            cmd.symbol,
            pairs.iter().map(|p| p.symbol.as_str()).collect::<Vec<_>>().join(", ")
        );
    };

    let (direction, decimals_in, decimals_out, symbol_out) = if cmd.reverse {
        (SwapDirection::Reverse, pair.decimals, 18, "OPN")
    } else {
        (SwapDirection::Forward, 18, pair.decimals, pair.symbol.as_str())
    };
    let amount_in = to_base_units(cmd.amount, decimals_in);

    let rpc_url: url::Url = config
        .network
        .get_rpc_url()
        .parse()
        .context("Invalid RPC URL")?;
    // Read-only: any key will do
    let chain = EvmChainClient::new(&rpc_url, PrivateKeySigner::random(), None, &client_options(&config))?;

    let executor = SwapExecutor::new(EngineSettings::from(&config));
    let quote = executor
        .quoter()
        .quote(&chain, amount_in, pair, direction)
        .await
        .context("Quote failed")?;

    println!("Quote ({}) {} -> {}", direction, cmd.amount, symbol_out);
    println!("  Amount out:  {} {}", display_units(quote.amount_out, decimals_out), symbol_out);
    println!("  Liquidity:   {:?}", quote.sufficiency);

    Ok(())
}
