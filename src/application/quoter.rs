//! Swap Quoter
//!
//! Reads the router's expected output and classifies it against the
//! direction's liquidity threshold.

use alloy::primitives::{Address, U256};

use crate::domain::{LiquidityThresholds, Sufficiency, SwapDirection, SwapPair};
use crate::ports::{ChainError, ChainPort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub amount_out: U256,
    pub sufficiency: Sufficiency,
}

#[derive(Debug, Clone, Copy)]
pub struct SwapQuoter {
    router: Address,
    wrapped_native: Address,
    thresholds: LiquidityThresholds,
}

impl SwapQuoter {
    pub fn new(router: Address, wrapped_native: Address, thresholds: LiquidityThresholds) -> Self {
        Self {
            router,
            wrapped_native,
            thresholds,
        }
    }

    pub async fn quote(
        &self,
        chain: &dyn ChainPort,
        amount_in: U256,
        pair: &SwapPair,
        direction: SwapDirection,
    ) -> Result<Quote, ChainError> {
        let path = pair.path(direction, self.wrapped_native);
        let amounts = chain.amounts_out(self.router, amount_in, &path).await?;
        let amount_out = *amounts
            .last()
            .ok_or_else(|| ChainError::Decode("router returned no amounts".to_string()))?;

        Ok(Quote {
            amount_out,
            sufficiency: self.thresholds.classify(amount_out, direction),
        })
    }
}
