//! Swap Sizing
//!
//! Randomized swap amounts drawn as a percentage of an observed balance.
//! Sizing is never price-driven and never a fixed absolute amount, except
//! for the forward floor that keeps tiny wallets above network dust.

use alloy::primitives::U256;
use rand::Rng;

/// Forward swaps use 1% of native balance
pub const DEFAULT_FORWARD_PERCENT: f64 = 0.01;

/// Forward swaps vary by +/-0.5%
pub const DEFAULT_FORWARD_TOLERANCE: f64 = 0.005;

/// Smallest forward swap, in native units
pub const DEFAULT_FORWARD_FLOOR: f64 = 0.001;

/// Native balance required before a forward swap is attempted
pub const DEFAULT_MIN_NATIVE_BALANCE: f64 = 0.002;

/// Reverse swaps use 10% of the token balance
pub const DEFAULT_REVERSE_PERCENT: f64 = 0.10;

/// Reverse swaps vary by +/-5%
pub const DEFAULT_REVERSE_TOLERANCE: f64 = 0.05;

/// Token amounts at or below this (in token units) are dust
pub const DEFAULT_DUST_THRESHOLD: f64 = 0.000_001;

/// Percentages are applied with nine decimal digits of precision
const PERCENT_SCALE: u64 = 1_000_000_000;

/// Uniform draw around a base percentage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentRange {
    pub base: f64,
    pub tolerance: f64,
}

impl PercentRange {
    pub fn new(base: f64, tolerance: f64) -> Self {
        Self { base, tolerance }
    }

    pub fn low(&self) -> f64 {
        self.base - self.tolerance
    }

    pub fn high(&self) -> f64 {
        self.base + self.tolerance
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.low()..=self.high())
    }

    pub fn contains(&self, percent: f64) -> bool {
        percent >= self.low() && percent <= self.high()
    }
}

/// A sized swap input together with the share of balance it represents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizedAmount {
    pub amount: U256,
    pub percent: f64,
    /// True when the forward floor replaced the drawn amount
    pub floored: bool,
}

/// Forward sizing parameters, all in native base units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardSizing {
    pub range: PercentRange,
    pub floor: U256,
    pub min_balance: U256,
}

impl Default for ForwardSizing {
    fn default() -> Self {
        Self {
            range: PercentRange::new(DEFAULT_FORWARD_PERCENT, DEFAULT_FORWARD_TOLERANCE),
            floor: to_base_units(DEFAULT_FORWARD_FLOOR, 18),
            min_balance: to_base_units(DEFAULT_MIN_NATIVE_BALANCE, 18),
        }
    }
}

impl ForwardSizing {
    /// Whether a wallet holding `balance` may start a forward swap
    pub fn can_afford(&self, balance: U256) -> bool {
        balance >= self.min_balance
    }

    /// Draw a forward amount from `balance`.
    ///
    /// Returns `None` when the balance is zero or smaller than the floor,
    /// so the result is always positive and never above the balance.
    pub fn size<R: Rng + ?Sized>(&self, balance: U256, rng: &mut R) -> Option<SizedAmount> {
        if balance.is_zero() {
            return None;
        }

        let percent = self.range.draw(rng);
        let amount = apply_percent(balance, percent);

        if amount < self.floor {
            if self.floor > balance {
                return None;
            }
            return Some(SizedAmount {
                amount: self.floor,
                percent: ratio(self.floor, balance),
                floored: true,
            });
        }

        Some(SizedAmount {
            amount,
            percent,
            floored: false,
        })
    }
}

/// Reverse sizing parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverseSizing {
    pub range: PercentRange,
    /// Dust threshold in token units (not base units)
    pub dust: f64,
}

impl Default for ReverseSizing {
    fn default() -> Self {
        Self {
            range: PercentRange::new(DEFAULT_REVERSE_PERCENT, DEFAULT_REVERSE_TOLERANCE),
            dust: DEFAULT_DUST_THRESHOLD,
        }
    }
}

impl ReverseSizing {
    pub fn dust_units(&self, decimals: u8) -> U256 {
        to_base_units(self.dust, decimals)
    }

    /// Whether a token balance is worth reversing at all
    pub fn above_dust(&self, balance: U256, decimals: u8) -> bool {
        balance > self.dust_units(decimals)
    }

    /// Draw a reverse amount from a token balance. `None` means no-op.
    pub fn size<R: Rng + ?Sized>(
        &self,
        balance: U256,
        decimals: u8,
        rng: &mut R,
    ) -> Option<SizedAmount> {
        let percent = self.range.draw(rng);
        let amount = apply_percent(balance, percent);

        if amount <= self.dust_units(decimals) {
            return None;
        }

        Some(SizedAmount {
            amount,
            percent,
            floored: false,
        })
    }
}

/// `balance * percent`, truncated toward zero
pub fn apply_percent(balance: U256, percent: f64) -> U256 {
    if percent <= 0.0 {
        return U256::ZERO;
    }
    let scaled = (percent * PERCENT_SCALE as f64).round() as u64;
    balance * U256::from(scaled) / U256::from(PERCENT_SCALE)
}

/// Convert a decimal token amount into base units (nine fractional digits kept)
pub fn to_base_units(value: f64, decimals: u8) -> U256 {
    if value <= 0.0 {
        return U256::ZERO;
    }
    let scaled = U256::from((value * PERCENT_SCALE as f64).round() as u128);
    let ten = U256::from(10u8);
    if decimals >= 9 {
        scaled * ten.pow(U256::from(decimals - 9))
    } else {
        scaled / ten.pow(U256::from(9 - decimals))
    }
}

fn ratio(part: U256, whole: U256) -> f64 {
    let part: f64 = part.to_string().parse().unwrap_or(0.0);
    let whole: f64 = whole.to_string().parse().unwrap_or(f64::MAX);
    part / whole
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ether(value: f64) -> U256 {
        to_base_units(value, 18)
    }

    #[test]
    fn test_to_base_units() {
        assert_eq!(to_base_units(1.0, 18), U256::from(10u64).pow(U256::from(18)));
        assert_eq!(to_base_units(0.001, 18), U256::from(1_000_000_000_000_000u64));
        assert_eq!(to_base_units(0.000_001, 18), U256::from(1_000_000_000_000u64));
        assert_eq!(to_base_units(1.5, 6), U256::from(1_500_000u64));
        assert_eq!(to_base_units(0.0, 18), U256::ZERO);
    }

    #[test]
    fn test_apply_percent() {
        assert_eq!(apply_percent(ether(1.0), 0.01), ether(0.01));
        assert_eq!(apply_percent(U256::from(1_000u64), 0.5), U256::from(500u64));
        assert_eq!(apply_percent(ether(1.0), 0.0), U256::ZERO);
    }

    #[test]
    fn test_forward_draws_stay_in_range() {
        let sizing = ForwardSizing::default();
        let balance = ether(1.0);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let sized = sizing.size(balance, &mut rng).unwrap();
            assert!(!sized.floored);
            assert!(sized.amount >= apply_percent(balance, 0.005));
            assert!(sized.amount <= apply_percent(balance, 0.015));
            assert!(sizing.range.contains(sized.percent));
        }
    }

    #[test]
    fn test_forward_floor_applies_to_small_balances() {
        let sizing = ForwardSizing::default();
        // 1.5% of 0.05 is 0.00075 < floor
        let balance = ether(0.05);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..100 {
            let sized = sizing.size(balance, &mut rng).unwrap();
            assert!(sized.floored);
            assert_eq!(sized.amount, ether(0.001));
            assert_relative_eq!(sized.percent, 0.02, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_forward_never_exceeds_balance() {
        let sizing = ForwardSizing::default();
        let mut rng = StdRng::seed_from_u64(3);

        assert!(sizing.size(U256::ZERO, &mut rng).is_none());
        // Floor larger than the balance: nothing to swap
        assert!(sizing.size(ether(0.0005), &mut rng).is_none());
    }

    #[test]
    fn test_can_afford() {
        let sizing = ForwardSizing::default();
        assert!(!sizing.can_afford(ether(0.0019)));
        assert!(sizing.can_afford(ether(0.002)));
    }

    #[test]
    fn test_reverse_draws_stay_in_range() {
        let sizing = ReverseSizing::default();
        let balance = ether(250.0);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..500 {
            let sized = sizing.size(balance, 18, &mut rng).unwrap();
            assert!(sized.amount >= apply_percent(balance, 0.05));
            assert!(sized.amount <= apply_percent(balance, 0.15));
            assert!(sized.amount <= balance);
        }
    }

    #[test]
    fn test_reverse_dust_is_noop() {
        let sizing = ReverseSizing::default();
        let mut rng = StdRng::seed_from_u64(5);

        // 15% of 0.000005 is below the 0.000001 dust line
        assert!(sizing.size(ether(0.000_005), 18, &mut rng).is_none());
        assert!(!sizing.above_dust(ether(0.000_001), 18));
        assert!(sizing.above_dust(ether(0.000_002), 18));
    }
}
