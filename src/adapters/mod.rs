//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - EVM: alloy JSON-RPC client, signing and contract bindings
//! - Files: private key and proxy lists
//! - CLI: Command-line arguments and the swap count prompt

pub mod evm;
pub mod files;
pub mod cli;

pub use evm::{ClientOptions, EvmChainClient, EvmConnector};
pub use files::{load_private_keys, load_proxies, CredentialError};
pub use cli::{CliApp, StdinPrompt};
