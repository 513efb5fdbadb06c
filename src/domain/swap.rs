//! Swap Types
//!
//! Value types shared by every layer of the swap engine: the static pair
//! set, a single swap attempt, and the tagged outcome handed back to the
//! schedulers.

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum on-chain submissions for one swap (first try + one retry)
pub const DEFAULT_MAX_ATTEMPTS: u8 = 2;

/// Direction of a swap relative to the native currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
    /// Native currency -> token
    Forward,
    /// Token -> native currency
    Reverse,
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapDirection::Forward => write!(f, "forward"),
            SwapDirection::Reverse => write!(f, "reverse"),
        }
    }
}

/// A non-native token eligible for forward swaps. Fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPair {
    /// Token contract address
    pub output: Address,
    /// Display symbol
    pub symbol: String,
    /// Token decimals
    pub decimals: u8,
}

impl SwapPair {
    pub fn new(output: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            output,
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Router path for the given direction, routed through the wrapped native token
    pub fn path(&self, direction: SwapDirection, wrapped_native: Address) -> Vec<Address> {
        match direction {
            SwapDirection::Forward => vec![wrapped_native, self.output],
            SwapDirection::Reverse => vec![self.output, wrapped_native],
        }
    }
}

/// One swap attempt. Rebuilt for every attempt and discarded once the outcome is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub direction: SwapDirection,
    pub amount_in: U256,
    pub pair: SwapPair,
    /// Zero-based attempt number
    pub attempt: u8,
}

impl SwapRequest {
    pub fn new(direction: SwapDirection, amount_in: U256, pair: SwapPair) -> Self {
        Self {
            direction,
            amount_in,
            pair,
            attempt: 0,
        }
    }

    /// Same swap, next attempt
    pub fn retry(&self) -> Self {
        Self {
            attempt: self.attempt.saturating_add(1),
            ..self.clone()
        }
    }
}

/// Step of the swap state machine an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapStage {
    Sizing,
    Quoting,
    Approving,
    Building,
    Submitting,
    Confirming,
}

impl fmt::Display for SwapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SwapStage::Sizing => "sizing",
            SwapStage::Quoting => "quoting",
            SwapStage::Approving => "approving",
            SwapStage::Building => "building",
            SwapStage::Submitting => "submitting",
            SwapStage::Confirming => "confirming",
        };
        write!(f, "{}", name)
    }
}

/// Why a swap ended as Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Router quoted zero output
    ZeroLiquidity,
    /// Native balance below the forward-swap minimum
    InsufficientBalance,
    /// Token approval could not be completed
    ApprovalFailed,
    /// Node reported an execution revert before mining
    Reverted,
    /// Node reported insufficient funds for value + gas
    InsufficientFunds,
    /// Nonce rejected by the node
    NonceConflict,
    /// Request refused as malformed
    Rejected,
    /// Network / transport failure
    Transport,
    /// No receipt within the confirmation timeout
    Timeout,
    /// Unexpected response shape
    Decode,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureReason::ZeroLiquidity => "zero liquidity",
            FailureReason::InsufficientBalance => "insufficient balance",
            FailureReason::ApprovalFailed => "approval failed",
            FailureReason::Reverted => "execution reverted",
            FailureReason::InsufficientFunds => "insufficient funds",
            FailureReason::NonceConflict => "nonce conflict",
            FailureReason::Rejected => "request rejected",
            FailureReason::Transport => "transport error",
            FailureReason::Timeout => "confirmation timeout",
            FailureReason::Decode => "decode error",
        };
        write!(f, "{}", text)
    }
}

/// Terminal result of one swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    Succeeded {
        tx_hash: TxHash,
        gas_used: u64,
        block_number: Option<u64>,
    },
    /// Mined but reverted on every attempt
    Reverted { gas_used: u64 },
    Failed {
        reason: FailureReason,
        stage: SwapStage,
    },
}

impl SwapOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SwapOutcome::Succeeded { .. })
    }

    pub fn failed(reason: FailureReason, stage: SwapStage) -> Self {
        SwapOutcome::Failed { reason, stage }
    }
}

impl fmt::Display for SwapOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapOutcome::Succeeded {
                tx_hash,
                gas_used,
                block_number,
            } => match block_number {
                Some(block) => write!(f, "Succeeded {} (gas {}, block {})", tx_hash, gas_used, block),
                None => write!(f, "Succeeded {} (gas {})", tx_hash, gas_used),
            },
            SwapOutcome::Reverted { gas_used } => write!(f, "Reverted (gas wasted {})", gas_used),
            SwapOutcome::Failed { reason, stage } => write!(f, "Failed while {}: {}", stage, reason),
        }
    }
}

/// Outcome plus how many swap transactions were broadcast to reach it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReport {
    pub outcome: SwapOutcome,
    pub submissions: u8,
}

impl SwapReport {
    pub fn new(outcome: SwapOutcome, submissions: u8) -> Self {
        Self { outcome, submissions }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const WRAPPED: Address = address!("Bc022C9dEb5AF250A526321d16Ef52E39b4DBD84");
    const TOKEN: Address = address!("2aEc1Db9197Ff284011A6A1d0752AD03F5782B0d");

    #[test]
    fn test_path_by_direction() {
        let pair = SwapPair::new(TOKEN, "OPNT", 18);
        assert_eq!(pair.path(SwapDirection::Forward, WRAPPED), vec![WRAPPED, TOKEN]);
        assert_eq!(pair.path(SwapDirection::Reverse, WRAPPED), vec![TOKEN, WRAPPED]);
    }

    #[test]
    fn test_retry_increments_attempt() {
        let request = SwapRequest::new(
            SwapDirection::Forward,
            U256::from(1_000u64),
            SwapPair::new(TOKEN, "OPNT", 18),
        );
        assert_eq!(request.attempt, 0);

        let retry = request.retry();
        assert_eq!(retry.attempt, 1);
        assert_eq!(retry.amount_in, request.amount_in);
    }

    #[test]
    fn test_outcome_display() {
        let outcome = SwapOutcome::failed(FailureReason::ZeroLiquidity, SwapStage::Quoting);
        assert_eq!(outcome.to_string(), "Failed while quoting: zero liquidity");
        assert!(!outcome.is_success());

        let outcome = SwapOutcome::Reverted { gas_used: 21_000 };
        assert!(outcome.to_string().contains("21000"));
    }
}
