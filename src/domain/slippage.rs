//! Slippage Policy
//!
//! Minimum acceptable output expressed in thousandths of the quote. The
//! first attempt keeps 95% of the quoted amount; a retry after a revert
//! accepts as little as 50%.

use alloy::primitives::U256;

pub const FIRST_ATTEMPT_FACTOR: u16 = 950;
pub const RETRY_FACTOR: u16 = 500;
pub const FACTOR_SCALE: u16 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlippagePolicy {
    pub first_attempt: u16,
    pub retry: u16,
}

impl Default for SlippagePolicy {
    fn default() -> Self {
        Self {
            first_attempt: FIRST_ATTEMPT_FACTOR,
            retry: RETRY_FACTOR,
        }
    }
}

impl SlippagePolicy {
    /// Factor (per mille) for a zero-based attempt number
    pub fn factor_for(&self, attempt: u8) -> u16 {
        if attempt == 0 {
            self.first_attempt
        } else {
            self.retry
        }
    }

    /// `amount_out * factor / 1000`
    pub fn amount_out_min(&self, amount_out: U256, attempt: u8) -> U256 {
        amount_out * U256::from(self.factor_for(attempt)) / U256::from(FACTOR_SCALE)
    }
}
