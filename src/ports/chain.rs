//! Chain Port
//!
//! Interface to one blockchain endpoint bound to one signing wallet. All
//! remote failures are classified into `ChainError` here, at the boundary,
//! so callers never inspect free-text messages.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::FailureReason;

/// JSON-RPC error code used by geth-style nodes for execution reverts
pub const EXECUTION_REVERTED_CODE: i64 = 3;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("Execution reverted: {0}")]
    Reverted(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Nonce conflict: {0}")]
    NonceConflict(String),
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Timed out waiting for receipt of {0}")]
    Timeout(String),
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ChainError {
    /// Classify a JSON-RPC error payload returned by the node
    pub fn from_rpc_payload(code: i64, message: &str) -> Self {
        let lower = message.to_lowercase();

        if code == EXECUTION_REVERTED_CODE || lower.contains("execution reverted") {
            ChainError::Reverted(message.to_string())
        } else if lower.contains("insufficient funds") || lower.contains("insufficient balance") {
            ChainError::InsufficientFunds(message.to_string())
        } else if lower.contains("nonce") {
            ChainError::NonceConflict(message.to_string())
        } else {
            ChainError::Rejected(format!("{} (code {})", message, code))
        }
    }

    /// Only liquidity/funds-class failures are worth another attempt with
    /// looser parameters
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChainError::Reverted(_) | ChainError::InsufficientFunds(_))
    }

    pub fn is_nonce_conflict(&self) -> bool {
        matches!(self, ChainError::NonceConflict(_))
    }

    pub fn failure_reason(&self) -> FailureReason {
        match self {
            ChainError::Reverted(_) => FailureReason::Reverted,
            ChainError::InsufficientFunds(_) => FailureReason::InsufficientFunds,
            ChainError::NonceConflict(_) => FailureReason::NonceConflict,
            ChainError::Rejected(_) => FailureReason::Rejected,
            ChainError::Transport(_) => FailureReason::Transport,
            ChainError::Timeout(_) => FailureReason::Timeout,
            ChainError::Decode(_) => FailureReason::Decode,
        }
    }
}

/// Submission-ready legacy transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxDescriptor {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub nonce: u64,
    pub chain_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub tx_hash: TxHash,
    pub success: bool,
    pub gas_used: u64,
    pub block_number: Option<u64>,
    pub log_count: usize,
}

/// One chain endpoint with a bound signer
#[async_trait]
pub trait ChainPort: Send + Sync {
    /// Address of the bound signer
    fn address(&self) -> Address;

    async fn native_balance(&self, owner: Address) -> Result<U256, ChainError>;

    /// Legacy gas price reported by the node, `None` if unavailable
    async fn gas_price(&self) -> Result<Option<u128>, ChainError>;

    /// Transaction count including pending transactions
    async fn pending_nonce(&self, owner: Address) -> Result<u64, ChainError>;

    /// Router `getAmountsOut`
    async fn amounts_out(
        &self,
        router: Address,
        amount_in: U256,
        path: &[Address],
    ) -> Result<Vec<U256>, ChainError>;

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ChainError>;

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, ChainError>;

    async fn token_decimals(&self, token: Address) -> Result<u8, ChainError>;

    /// Sign with the bound signer and broadcast
    async fn send_transaction(&self, tx: &TxDescriptor) -> Result<TxHash, ChainError>;

    /// Wait for one confirmation
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptSummary, ChainError>;
}

/// Builds a chain client for a wallet, optionally routed through a proxy
pub trait ChainConnector: Send + Sync {
    fn wallet_count(&self) -> usize;

    fn connect(
        &self,
        wallet_index: usize,
        proxy: Option<&str>,
    ) -> Result<Arc<dyn ChainPort>, ChainError>;
}
