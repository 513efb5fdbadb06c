//! opn-farmer - randomized multi-wallet swap bot library
//!
//! Runs randomized native -> token swaps and partial token -> native
//! reversals for a list of wallets against one DEX router on the OPN testnet.
//!
//! # Modules
//!
//! - `domain`: Core value types and policies (sizing, slippage, gas, outcomes)
//! - `ports`: Trait abstractions (ChainPort, ChainConnector, SwapCountPrompt)
//! - `adapters`: External implementations (alloy EVM client, files, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Swap executor and wallet / fleet schedulers

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
