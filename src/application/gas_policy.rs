//! Gas Policy
//!
//! Derives the legacy gas price for every transaction from the node's
//! reported price, clamped into the configured window.

use crate::domain::GasBounds;
use crate::ports::ChainPort;

#[derive(Debug, Clone, Copy)]
pub struct GasPolicy {
    bounds: GasBounds,
}

impl GasPolicy {
    pub fn new(bounds: GasBounds) -> Self {
        Self { bounds }
    }

    /// Current bounded gas price. A failed query returns the ceiling without retrying.
    pub async fn price(&self, chain: &dyn ChainPort) -> u128 {
        match chain.gas_price().await {
            Ok(observed) => self.bounds.clamp(observed),
            Err(e) => {
                tracing::debug!("Gas price query failed, using ceiling: {}", e);
                self.bounds.fallback()
            }
        }
    }

    /// Fixed price for approvals
    pub fn approval_price(&self) -> u128 {
        self.bounds.max
    }
}
