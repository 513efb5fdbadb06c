//! Wallet Balance Snapshot
//!
//! Immutable view of a wallet's balances at one point in time. A refresh
//! produces a new snapshot; snapshots are never edited in place.

use alloy::primitives::{utils::format_units, Address, U256};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance {
    pub symbol: String,
    pub balance: U256,
    pub decimals: u8,
}

impl TokenBalance {
    pub fn display(&self) -> String {
        display_units(self.balance, self.decimals)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSnapshot {
    pub address: Address,
    pub native: U256,
    /// Only tokens with a positive balance
    pub tokens: BTreeMap<Address, TokenBalance>,
}

impl BalanceSnapshot {
    pub fn new(address: Address, native: U256) -> Self {
        Self {
            address,
            native,
            tokens: BTreeMap::new(),
        }
    }

    pub fn with_token(mut self, token: Address, balance: TokenBalance) -> Self {
        if !balance.balance.is_zero() {
            self.tokens.insert(token, balance);
        }
        self
    }

    pub fn token_balance(&self, token: &Address) -> U256 {
        self.tokens
            .get(token)
            .map(|t| t.balance)
            .unwrap_or(U256::ZERO)
    }

    pub fn has_tokens(&self) -> bool {
        !self.tokens.is_empty()
    }

    pub fn native_display(&self) -> String {
        display_units(self.native, 18)
    }

    /// Short address for log lines
    pub fn short_address(&self) -> String {
        let full = self.address.to_string();
        format!("{}...", &full[..10])
    }
}

/// Human readable amount, falls back to raw base units
pub fn display_units(amount: U256, decimals: u8) -> String {
    format_units(amount, decimals).unwrap_or_else(|_| amount.to_string())
}
