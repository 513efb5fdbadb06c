//! CLI Commands
//!
//! Argument definitions for the opn-farmer binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// opn-farmer - randomized multi-wallet swap bot for the OPN testnet
#[derive(Parser, Debug)]
#[command(
    name = "opn-farmer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Randomized multi-wallet swap bot for the OPN testnet",
    long_about = "opn-farmer runs a configurable number of randomized native -> token swaps \
                  for every wallet, swaps part of each touched token back to native, then \
                  rests and repeats the whole fleet indefinitely."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the swap loop over every wallet
    Run(RunCmd),

    /// Show native and token balances for every wallet
    Status(StatusCmd),

    /// Quote one pair through the router
    Quote(QuoteCmd),
}

/// Start the swap loop
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Path to configuration file (defaults to ./config.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Forward swaps per wallet; skips the interactive prompt
    #[arg(short, long, value_name = "N")]
    pub swaps: Option<String>,

    /// Stop after this many fleet cycles (default: run forever)
    #[arg(long, value_name = "N")]
    pub cycles: Option<u64>,
}

/// Show wallet balances
#[derive(Parser, Debug)]
pub struct StatusCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Quote a swap
#[derive(Parser, Debug)]
pub struct QuoteCmd {
    /// Token symbol from the configured pairs (e.g. OPNT)
    #[arg(value_name = "SYMBOL")]
    pub symbol: String,

    /// Amount in (native units, or token units with --reverse)
    #[arg(value_name = "AMOUNT")]
    pub amount: f64,

    /// Quote token -> native instead of native -> token
    #[arg(short, long)]
    pub reverse: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
