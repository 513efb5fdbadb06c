//! Gas Price Bounds
//!
//! Clamps an observed network gas price into a fixed window. A price under
//! the floor is treated as bad data and replaced by the ceiling rather
//! than raised to the floor.

pub const GWEI: u128 = 1_000_000_000;

pub const DEFAULT_BASE_GAS_PRICE: u128 = 11 * GWEI;
pub const DEFAULT_MIN_GAS_PRICE: u128 = 10 * GWEI;
pub const DEFAULT_MAX_GAS_PRICE: u128 = 15 * GWEI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasBounds {
    /// Used when the node reports no gas price
    pub base: u128,
    pub min: u128,
    pub max: u128,
}

impl Default for GasBounds {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_GAS_PRICE,
            min: DEFAULT_MIN_GAS_PRICE,
            max: DEFAULT_MAX_GAS_PRICE,
        }
    }
}

impl GasBounds {
    pub fn clamp(&self, observed: Option<u128>) -> u128 {
        let price = observed.unwrap_or(self.base);
        if price < self.min || price > self.max {
            self.max
        } else {
            price
        }
    }

    /// Price used when fee data cannot be fetched at all
    pub fn fallback(&self) -> u128 {
        self.max
    }
}
