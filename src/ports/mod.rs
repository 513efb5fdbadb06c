//! Ports Layer - Trait definitions for external dependencies
//!
//! Following hexagonal architecture, these traits abstract:
//! - The chain endpoint (balances, fees, nonces, router reads, broadcast)
//! - Per-wallet client construction (with proxy rotation)
//! - The interactive swap count prompt

pub mod chain;
pub mod prompt;
pub mod mocks;

pub use chain::{ChainConnector, ChainError, ChainPort, ReceiptSummary, TxDescriptor};
pub use prompt::SwapCountPrompt;
