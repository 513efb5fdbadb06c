//! Liquidity Sufficiency
//!
//! Classifies a router quote against a minimum-output threshold. The
//! thresholds are deliberately low so that thin testnet pools still trade.

use alloy::primitives::U256;

use super::swap::SwapDirection;

/// Forward minimum output (~0.000001 of an 18-decimal token)
pub const DEFAULT_MIN_LIQUIDITY_OUT: u128 = 1_000_000_000_000;

/// Reverse minimum output, in native base units.
/// Tunable: kept at the forward threshold / 100.
pub const DEFAULT_REVERSE_MIN_LIQUIDITY_OUT: u128 = DEFAULT_MIN_LIQUIDITY_OUT / 100;

/// Quote classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sufficiency {
    /// Nothing comes out: abort, more slippage cannot help
    Zero,
    /// Positive but under the threshold: proceed, flagged
    Low,
    Adequate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityThresholds {
    pub forward: U256,
    pub reverse: U256,
}

impl Default for LiquidityThresholds {
    fn default() -> Self {
        Self {
            forward: U256::from(DEFAULT_MIN_LIQUIDITY_OUT),
            reverse: U256::from(DEFAULT_REVERSE_MIN_LIQUIDITY_OUT),
        }
    }
}

impl LiquidityThresholds {
    pub fn for_direction(&self, direction: SwapDirection) -> U256 {
        match direction {
            SwapDirection::Forward => self.forward,
            SwapDirection::Reverse => self.reverse,
        }
    }

    pub fn classify(&self, amount_out: U256, direction: SwapDirection) -> Sufficiency {
        if amount_out.is_zero() {
            Sufficiency::Zero
        } else if amount_out < self.for_direction(direction) {
            Sufficiency::Low
        } else {
            Sufficiency::Adequate
        }
    }
}
